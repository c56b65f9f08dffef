use serde_json::json;
use tak::{
    adapter::{build_adapter, dispatch_payment},
    config::{AdapterConfig, AdapterKind, TonConfig},
    Deal, McpAdapter, MockMcpAdapter, TakError, TonMcpAdapter, UnimplementedAdapter,
};

fn approved_deal() -> Deal {
    Deal::from_value(json!({
        "id": "deal_100",
        "status": "approved",
        "request_id": "req_1",
        "offer_id": "offer_1",
        "provider_id": "agent_provider",
        "price_nano": 1_250_000_000u64,
        "service_query": "summarise 3 papers"
    }))
    .unwrap()
}

fn ton_config() -> TonConfig {
    TonConfig {
        rpc_url: Some("https://toncenter.com/api/v2/jsonRPC".to_string()),
        api_key: Some("ton-key".to_string()),
        wallet_address: Some("EQ-executor".to_string()),
    }
}

/// Backend that only names itself and relies on the trait default.
struct BareBackend;

impl McpAdapter for BareBackend {
    fn name(&self) -> &'static str {
        "BareBackend"
    }
}

#[tokio::test]
async fn test_default_execute_payment_always_rejects() {
    let err = BareBackend.execute_payment(&approved_deal()).await.unwrap_err();

    assert!(matches!(err, TakError::NotImplemented(_)));
    assert!(err.to_string().starts_with("BareBackend.execute_payment() is not implemented"));
}

#[tokio::test]
async fn test_stub_adapters_reject_every_deal() {
    let ton = TonMcpAdapter::new(ton_config()).unwrap();
    let adapters: Vec<Box<dyn McpAdapter>> = vec![Box::new(UnimplementedAdapter), Box::new(ton)];

    for adapter in &adapters {
        for _ in 0..3 {
            assert!(dispatch_payment(adapter.as_ref(), &approved_deal()).await.is_err());
        }
    }
}

#[tokio::test]
async fn test_mock_adapter_settles_approved_deal() {
    let adapter = MockMcpAdapter::new();

    let receipt = dispatch_payment(&adapter, &approved_deal()).await.unwrap();

    assert!(receipt.starts_with("mock_"));
    assert_eq!(adapter.executions(), 1);
}

#[tokio::test]
async fn test_rejected_deal_never_reaches_adapter() {
    let adapter = MockMcpAdapter::new();
    let mut deal = approved_deal();
    deal.status = Some("rejected".to_string());

    let err = dispatch_payment(&adapter, &deal).await.unwrap_err();

    assert!(matches!(err, TakError::InvalidDeal(_)));
    assert_eq!(adapter.executions(), 0);
}

#[tokio::test]
async fn test_ton_adapter_wraps_failure() {
    let adapter = build_adapter(&AdapterConfig {
        kind: AdapterKind::Ton,
        ton: ton_config(),
    })
    .unwrap();

    let err = adapter.execute_payment(&approved_deal()).await.unwrap_err();
    let msg = err.to_string();

    assert!(msg.starts_with("[TonMcpAdapter] Failed to execute deal:"));
    assert!(msg.contains("TON MCP not configured"));
}

#[test]
fn test_ton_adapter_refuses_incomplete_config() {
    let err = TonMcpAdapter::new(TonConfig {
        rpc_url: Some("https://toncenter.com/api/v2/jsonRPC".to_string()),
        api_key: None,
        wallet_address: Some("EQ-executor".to_string()),
    })
    .unwrap_err();

    assert!(matches!(err, TakError::Config(_)));
}
