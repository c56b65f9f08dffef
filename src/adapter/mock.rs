use super::McpAdapter;
use crate::{error::Result, model::Deal};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Development adapter: records nothing on-chain and hands back a fake receipt.
#[derive(Debug, Default)]
pub struct MockMcpAdapter {
    executions: AtomicU64,
}

impl MockMcpAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payments executed so far.
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl McpAdapter for MockMcpAdapter {
    fn name(&self) -> &'static str {
        "MockMcpAdapter"
    }

    async fn execute_payment(&self, deal: &Deal) -> Result<String> {
        let seq = self.executions.fetch_add(1, Ordering::SeqCst);

        let mut hasher = Sha256::new();
        hasher.update(deal.id.as_bytes());
        hasher.update(seq.to_be_bytes());
        let receipt = format!("mock_{}", hex::encode(hasher.finalize()));

        tracing::info!(
            deal_id = %deal.id,
            amount_nano = ?deal.settlement_amount(),
            "Processing mock MCP payment"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_distinct_receipts() {
        let adapter = MockMcpAdapter::new();
        let deal = Deal::new("deal_1");

        let first = adapter.execute_payment(&deal).await.unwrap();
        let second = adapter.execute_payment(&deal).await.unwrap();

        assert!(first.starts_with("mock_"));
        assert_eq!(first.len(), "mock_".len() + 64);
        assert_ne!(first, second);
        assert_eq!(adapter.executions(), 2);
    }
}
