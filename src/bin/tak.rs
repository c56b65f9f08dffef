use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tak::{
    adapter::{build_adapter, dispatch_payment},
    config::{init_config_file, AppConfig},
    logging::init_logging,
    model::Deal,
    TakClient,
};

#[derive(Parser)]
#[command(name = "tak")]
#[command(about = "Command-line client for the TAK agent coordination API")]
struct Args {
    #[arg(short, long, default_value = "tak.toml")]
    config: PathBuf,

    #[arg(long, env = "TAK_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "TAK_API_KEY")]
    api_key: Option<String>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file and exit
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Check API health
    Health,
    #[command(subcommand)]
    Agents(AgentsCmd),
    #[command(subcommand)]
    Services(ServicesCmd),
    #[command(subcommand)]
    Requests(RequestsCmd),
    #[command(subcommand)]
    Offers(OffersCmd),
    #[command(subcommand)]
    Deals(DealsCmd),
    #[command(subcommand)]
    Messages(MessagesCmd),
    /// Run a deal record through the configured MCP adapter
    Pay {
        /// Deal JSON, inline or @path
        #[arg(long)]
        deal: String,
    },
}

#[derive(Subcommand)]
enum AgentsCmd {
    List,
    Get { id: String },
    /// JSON inline or @path
    Create { data: String },
}

#[derive(Subcommand)]
enum ServicesCmd {
    List {
        #[arg(long)]
        agent: Option<String>,
    },
    Create { data: String },
}

#[derive(Subcommand)]
enum RequestsCmd {
    List,
    Get { id: String },
    Create { data: String },
    Offers { id: String },
}

#[derive(Subcommand)]
enum OffersCmd {
    List,
    Get { id: String },
    Create { data: String },
    Accept { id: String },
    Reject { id: String },
}

#[derive(Subcommand)]
enum DealsCmd {
    List,
    Get { id: String },
    Create { data: String },
    Approve { id: String },
    Reject { id: String },
    Execute { id: String },
    Cancel { id: String },
}

#[derive(Subcommand)]
enum MessagesCmd {
    List { deal_id: String },
    Send { deal_id: String, data: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::Init { force } = args.command {
        init_config_file(&args.config, force)?;
        println!("Wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = if args.config.exists() {
        AppConfig::load_with_env_overrides(&args.config)?
    } else {
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        config
    };
    if let Some(base_url) = args.base_url {
        config.client.base_url = base_url;
    }
    if let Some(api_key) = args.api_key {
        config.client.api_key = Some(api_key);
    }

    init_logging(&config.logging, args.verbose);
    config.validate_client()?;

    let client = TakClient::from_config(&config.client)?;

    let output = match args.command {
        Command::Init { .. } => return Ok(()),
        Command::Health => client.health().await?,
        Command::Agents(cmd) => match cmd {
            AgentsCmd::List => client.get_agents().await?,
            AgentsCmd::Get { id } => client.get_agent(&id).await?,
            AgentsCmd::Create { data } => client.create_agent(&read_json(&data)?).await?,
        },
        Command::Services(cmd) => match cmd {
            ServicesCmd::List { agent: Some(agent) } => client.get_services_by_agent(&agent).await?,
            ServicesCmd::List { agent: None } => client.get_services().await?,
            ServicesCmd::Create { data } => client.create_service(&read_json(&data)?).await?,
        },
        Command::Requests(cmd) => match cmd {
            RequestsCmd::List => client.get_requests().await?,
            RequestsCmd::Get { id } => client.get_request(&id).await?,
            RequestsCmd::Create { data } => client.create_request(&read_json(&data)?).await?,
            RequestsCmd::Offers { id } => client.get_request_offers(&id).await?,
        },
        Command::Offers(cmd) => match cmd {
            OffersCmd::List => client.get_offers().await?,
            OffersCmd::Get { id } => client.get_offer(&id).await?,
            OffersCmd::Create { data } => client.create_offer(&read_json(&data)?).await?,
            OffersCmd::Accept { id } => client.accept_offer(&id).await?,
            OffersCmd::Reject { id } => client.reject_offer(&id).await?,
        },
        Command::Deals(cmd) => match cmd {
            DealsCmd::List => client.get_deals().await?,
            DealsCmd::Get { id } => client.get_deal(&id).await?,
            DealsCmd::Create { data } => client.create_deal(&read_json(&data)?).await?,
            DealsCmd::Approve { id } => client.approve_deal(&id).await?,
            DealsCmd::Reject { id } => client.reject_deal(&id).await?,
            DealsCmd::Execute { id } => client.execute_deal(&id).await?,
            DealsCmd::Cancel { id } => client.cancel_deal(&id).await?,
        },
        Command::Messages(cmd) => match cmd {
            MessagesCmd::List { deal_id } => client.get_messages(&deal_id).await?,
            MessagesCmd::Send { deal_id, data } => client.send_message(&deal_id, &read_json(&data)?).await?,
        },
        Command::Pay { deal } => {
            let deal = Deal::from_value(read_json(&deal)?)?;
            config.validate_adapter()?;
            let adapter = build_adapter(&config.adapter)?;
            let receipt = dispatch_payment(adapter.as_ref(), &deal).await?;
            serde_json::json!({ "deal_id": deal.id, "receipt": receipt, "adapter": adapter.name() })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parses `input` as JSON, reading it from a file when prefixed with `@`.
fn read_json(input: &str) -> Result<Value> {
    let text = match input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => input.to_string(),
    };
    serde_json::from_str(&text).context("input is not valid JSON")
}
