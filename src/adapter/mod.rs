//! MCP adapters: pluggable payment execution for approved deals.
//!
//! TAK only coordinates. Once a deal is approved, moving funds is delegated to
//! an [`McpAdapter`], which returns a receipt hash for the deal record. TAK
//! never holds funds, never signs transactions and never checks balances.
//!
//! - [`UnimplementedAdapter`] rejects everything (the bare trait behaviour).
//! - [`MockMcpAdapter`] returns fake receipts for development.
//! - [`TonMcpAdapter`] is the TON production stub; it validates its inputs
//!   and then refuses to submit.

use crate::{
    config::{AdapterConfig, AdapterKind},
    error::{Result, TakError},
    model::{Deal, DEAL_STATUS_APPROVED},
};
use async_trait::async_trait;

pub mod mock;
pub mod ton;

pub use mock::MockMcpAdapter;
pub use ton::{TonMcpAdapter, TonTransfer};

/// Executes the payment for a deal on an external settlement backend.
///
/// Implementations transfer funds from payer to payee and return a receipt
/// hash, or fail. The default `execute_payment` always fails, so a type that
/// only implements `name` behaves as an unimplemented backend.
#[async_trait]
pub trait McpAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute_payment(&self, deal: &Deal) -> Result<String> {
        Err(TakError::NotImplemented(format!(
            "{}.execute_payment() is not implemented (deal {}).\n\
             Implement McpAdapter::execute_payment for your MCP backend.\n\
             Example: struct TonMcpAdapter; impl McpAdapter for TonMcpAdapter {{ ... }}",
            self.name(),
            deal.id
        )))
    }
}

/// Adapter with no backend; every payment is rejected.
#[derive(Debug, Default, Clone)]
pub struct UnimplementedAdapter;

#[async_trait]
impl McpAdapter for UnimplementedAdapter {
    fn name(&self) -> &'static str {
        "McpAdapter"
    }
}

/// Hands an approved deal to `adapter` and returns the receipt.
///
/// Deals carrying any status other than `approved` are refused before the
/// adapter is called. A deal with no status is passed through.
pub async fn dispatch_payment(adapter: &dyn McpAdapter, deal: &Deal) -> Result<String> {
    if let Some(status) = deal.status.as_deref() {
        if status != DEAL_STATUS_APPROVED {
            return Err(TakError::InvalidDeal(format!(
                "deal {} is '{}', expected '{}'",
                deal.id, status, DEAL_STATUS_APPROVED
            )));
        }
    }

    tracing::info!(deal_id = %deal.id, adapter = adapter.name(), "executing payment");

    match adapter.execute_payment(deal).await {
        Ok(receipt) => {
            tracing::info!(deal_id = %deal.id, receipt = %receipt, "payment executed");
            Ok(receipt)
        }
        Err(e) => {
            tracing::error!(deal_id = %deal.id, adapter = adapter.name(), error = %e, "payment failed");
            Err(e)
        }
    }
}

/// Builds the adapter selected by configuration.
pub fn build_adapter(config: &AdapterConfig) -> Result<Box<dyn McpAdapter>> {
    let adapter: Box<dyn McpAdapter> = match config.kind {
        AdapterKind::None => Box::new(UnimplementedAdapter),
        AdapterKind::Mock => Box::new(MockMcpAdapter::new()),
        AdapterKind::Ton => Box::new(TonMcpAdapter::new(config.ton.clone().with_env_fallback())?),
    };

    tracing::info!(adapter = adapter.name(), "MCP adapter configured");
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        Backend {}

        #[async_trait]
        impl McpAdapter for Backend {
            fn name(&self) -> &'static str;
            async fn execute_payment(&self, deal: &Deal) -> Result<String>;
        }
    }

    fn approved_deal() -> Deal {
        let mut deal = Deal::new("deal_42");
        deal.status = Some("approved".into());
        deal.price_nano = Some(2_000_000_000);
        deal.provider_id = Some("agent_seller".into());
        deal
    }

    #[tokio::test]
    async fn unimplemented_adapter_always_rejects() {
        let err = UnimplementedAdapter.execute_payment(&approved_deal()).await.unwrap_err();
        assert!(matches!(err, TakError::NotImplemented(_)));
        assert!(err.to_string().contains("not implemented"));
        assert!(err.to_string().contains("deal_42"));
    }

    #[tokio::test]
    async fn dispatch_refuses_unapproved_deals() {
        let mut adapter = MockBackend::new();
        adapter.expect_name().return_const("backend");
        adapter.expect_execute_payment().never();

        let mut deal = approved_deal();
        deal.status = Some("pending".into());

        let err = dispatch_payment(&adapter, &deal).await.unwrap_err();
        assert!(matches!(err, TakError::InvalidDeal(_)));
    }

    #[tokio::test]
    async fn dispatch_returns_receipt() {
        let mut adapter = MockBackend::new();
        adapter.expect_name().return_const("backend");
        adapter
            .expect_execute_payment()
            .withf(|deal| deal.id == "deal_42")
            .times(1)
            .returning(|_| Ok("receipt_abc".to_string()));

        let receipt = dispatch_payment(&adapter, &approved_deal()).await.unwrap();
        assert_eq!(receipt, "receipt_abc");
    }

    #[tokio::test]
    async fn dispatch_propagates_adapter_failure() {
        let err = dispatch_payment(&UnimplementedAdapter, &approved_deal())
            .await
            .unwrap_err();
        assert!(matches!(err, TakError::NotImplemented(_)));
    }

    #[test]
    fn build_adapter_follows_kind() {
        let mut config = AdapterConfig::default();
        assert_eq!(build_adapter(&config).unwrap().name(), "MockMcpAdapter");

        config.kind = AdapterKind::None;
        assert_eq!(build_adapter(&config).unwrap().name(), "McpAdapter");

        config.kind = AdapterKind::Ton;
        config.ton.rpc_url = Some("https://toncenter.com/api/v2".into());
        config.ton.api_key = Some("key".into());
        config.ton.wallet_address = Some("EQ-wallet".into());
        assert_eq!(build_adapter(&config).unwrap().name(), "TonMcpAdapter");
    }
}
