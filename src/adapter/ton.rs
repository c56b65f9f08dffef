//! TON production adapter.
//!
//! Stub: configuration and deal validation are real, transaction signing and
//! submission are not wired to a TON RPC yet, so every payment fails.

use super::McpAdapter;
use crate::{
    config::TonConfig,
    error::{Result, TakError},
    model::Deal,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

const NAME: &str = "TonMcpAdapter";

/// The transfer the adapter would submit for a deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TonTransfer {
    pub to: String,
    pub amount_nano: u64,
    pub payload: TransferPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferPayload {
    pub deal_id: String,
    pub service: Option<String>,
    pub approval_timestamp: i64,
}

#[derive(Clone)]
pub struct TonMcpAdapter {
    rpc_url: String,
    api_key: String,
    wallet_address: String,
}

impl fmt::Debug for TonMcpAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TonMcpAdapter")
            .field("rpc_url", &self.rpc_url)
            .field("api_key", &"<redacted>")
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

impl TonMcpAdapter {
    pub fn new(config: TonConfig) -> Result<Self> {
        let missing = || {
            TakError::Config(
                "[TAK] TonMcpAdapter: Missing required configuration. \
                 Set TON_RPC_URL, TON_API_KEY, TON_WALLET_ADDRESS in environment or pass to constructor."
                    .to_string(),
            )
        };
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let adapter = Self {
            rpc_url: non_empty(config.rpc_url).ok_or_else(missing)?,
            api_key: non_empty(config.api_key).ok_or_else(missing)?,
            wallet_address: non_empty(config.wallet_address).ok_or_else(missing)?,
        };

        tracing::info!(rpc_url = %adapter.rpc_url, "MCP adapter: TonMcpAdapter (production, TON enabled)");
        Ok(adapter)
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    /// Describes the transfer for `deal`: provider as destination, quoted
    /// price in nanoTON, deal id as payload reference.
    pub fn build_transfer(&self, deal: &Deal) -> Result<TonTransfer> {
        let amount_nano = deal.price_nano.filter(|p| *p > 0);
        let provider = deal.provider_id.as_deref().filter(|p| !p.is_empty());

        let (Some(amount_nano), Some(provider)) = (amount_nano, provider) else {
            return Err(TakError::InvalidDeal(format!(
                "[{}] Invalid deal structure for execution",
                NAME
            )));
        };

        Ok(TonTransfer {
            to: provider.to_string(),
            amount_nano,
            payload: TransferPayload {
                deal_id: deal.id.clone(),
                service: deal.service_query.clone(),
                approval_timestamp: Utc::now().timestamp_millis(),
            },
        })
    }

    async fn submit(&self, transfer: &TonTransfer) -> Result<String> {
        tracing::debug!(
            rpc_url = %self.rpc_url,
            from = %self.wallet_address,
            to = %transfer.to,
            api_key_set = !self.api_key.is_empty(),
            "submitting TON transfer"
        );
        // TODO: sign with the wallet key and POST to rpc_url with api_key, then poll for the transaction hash.
        Err(TakError::NotImplemented(format!(
            "[{}] TON MCP not configured. This is a stub adapter. Extend with actual TON RPC calls.",
            NAME
        )))
    }
}

#[async_trait]
impl McpAdapter for TonMcpAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn execute_payment(&self, deal: &Deal) -> Result<String> {
        let outcome = match self.build_transfer(deal) {
            Ok(transfer) => {
                tracing::info!(
                    deal_id = %deal.id,
                    amount_nano = transfer.amount_nano,
                    to = %transfer.to,
                    "Executing TON deal"
                );
                self.submit(&transfer).await
            }
            Err(e) => Err(e),
        };

        outcome.map_err(|e| {
            tracing::error!(deal_id = %deal.id, error = %e, "TON execution failed");
            TakError::Adapter(format!("[{}] Failed to execute deal: {}", NAME, e))
        })
    }
}
