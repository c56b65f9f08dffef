//! Walks one deal through a running TAK server.
//!
//! 1. Register a buyer and a provider agent
//! 2. Publish a request and answer it with an offer
//! 3. Accept the offer and open a deal
//! 4. Exchange a message and approve the deal
//! 5. Execute payment through the mock MCP adapter
//!
//! Run against a local server: `cargo run --example deal_flow -- http://localhost:3000`

use serde_json::json;
use tak::{adapter::dispatch_payment, Deal, MockMcpAdapter, Result, TakClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let base_url = std::env::args().nth(1).unwrap_or_else(|| "http://localhost:3000".to_string());
    let tak = TakClient::new(base_url, std::env::var("TAK_API_KEY").ok());

    println!("TAK deal flow demo");
    println!("==================\n");

    println!("0. Health: {}", tak.health().await?);

    println!("1. Registering agents...");
    let buyer = tak.create_agent(&json!({ "name": "ResearchBot", "role": "buyer" })).await?;
    let provider = tak
        .create_agent(&json!({ "name": "TranslateBot", "role": "provider" }))
        .await?;
    let buyer_id = id_of(&buyer);
    let provider_id = id_of(&provider);
    println!("   buyer={} provider={}\n", buyer_id, provider_id);

    println!("2. Publishing request...");
    let request = tak
        .create_request(&json!({
            "agent_id": buyer_id,
            "service_query": "translate 10 pages EN->DE",
            "max_price_nano": 5_000_000_000u64
        }))
        .await?;
    let request_id = id_of(&request);

    let offer = tak
        .create_offer(&json!({
            "request_id": request_id,
            "agent_id": provider_id,
            "price_nano": 4_000_000_000u64
        }))
        .await?;
    let offer_id = id_of(&offer);
    println!("   request={} offer={}\n", request_id, offer_id);

    println!("3. Accepting offer and opening deal...");
    tak.accept_offer(&offer_id).await?;
    let deal = tak
        .create_deal(&json!({ "request_id": request_id, "offer_id": offer_id }))
        .await?;
    let deal_id = id_of(&deal);
    println!("   deal={}\n", deal_id);

    println!("4. Negotiation message and approval...");
    tak.send_message(&deal_id, &json!({ "sender_id": buyer_id, "content": "Delivery by Friday?" }))
        .await?;
    let approved = tak.approve_deal(&deal_id).await?;
    println!("   messages: {}", tak.get_messages(&deal_id).await?);

    println!("5. Executing payment (mock adapter)...");
    let deal = Deal::from_value(approved)?;
    let adapter = MockMcpAdapter::new();
    match dispatch_payment(&adapter, &deal).await {
        Ok(receipt) => println!("   receipt: {}", receipt),
        Err(e) => println!("   payment failed: {}", e),
    }

    Ok(())
}

fn id_of(record: &serde_json::Value) -> String {
    record
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
