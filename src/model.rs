use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Status values the SDK writes to an offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
        }
    }
}

/// Transitions the server exposes under `/api/deals/{id}/{action}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DealAction {
    Approve,
    Reject,
    Execute,
    Cancel,
}

impl DealAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealAction::Approve => "approve",
            DealAction::Reject => "reject",
            DealAction::Execute => "execute",
            DealAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for DealAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loose view over a deal record as handed to payment adapters.
///
/// The server owns the shape of deals; only `id` is required here and
/// anything not named below is kept in `extra`. Ids may arrive as strings or
/// numbers and are normalised to strings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Deal {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id", skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id", skip_serializing_if = "Option::is_none")]
    pub payer_agent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id", skip_serializing_if = "Option::is_none")]
    pub payee_agent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_nano: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_nano: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_query: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn id_from_value<E: de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("expected a string or numeric id, got {}", other))),
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_from_value(value).map(Some),
    }
}

pub const DEAL_STATUS_APPROVED: &str = "approved";

impl Deal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_approved(&self) -> bool {
        self.status.as_deref() == Some(DEAL_STATUS_APPROVED)
    }

    /// Amount to settle, preferring the explicit payment amount over the quoted price.
    pub fn settlement_amount(&self) -> Option<u64> {
        self.amount_nano.or(self.price_nano)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deal_keeps_unknown_fields() {
        let deal = Deal::from_value(json!({
            "id": "deal_1",
            "status": "approved",
            "price_nano": 1_500_000_000u64,
            "provider_id": "agent_seller",
            "currency": "TON"
        }))
        .unwrap();

        assert!(deal.is_approved());
        assert_eq!(deal.settlement_amount(), Some(1_500_000_000));
        assert_eq!(deal.extra.get("currency"), Some(&json!("TON")));
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let deal = Deal::from_value(json!({
            "id": 17,
            "request_id": 4,
            "offer_id": "offer_9",
            "provider_id": 12,
            "payer_agent_id": null,
            "price_nano": 100
        }))
        .unwrap();

        assert_eq!(deal.id, "17");
        assert_eq!(deal.request_id.as_deref(), Some("4"));
        assert_eq!(deal.offer_id.as_deref(), Some("offer_9"));
        assert_eq!(deal.provider_id.as_deref(), Some("12"));
        assert!(deal.payer_agent_id.is_none());
        assert!(deal.payee_agent_id.is_none());
        assert!(deal.extra.is_empty());
    }

    #[test]
    fn object_id_is_rejected() {
        assert!(Deal::from_value(json!({ "id": { "nested": 1 } })).is_err());
    }

    #[test]
    fn deal_requires_id() {
        assert!(Deal::from_value(json!({ "status": "approved" })).is_err());
    }

    #[test]
    fn amount_takes_precedence_over_price() {
        let mut deal = Deal::new("deal_2");
        deal.price_nano = Some(10);
        deal.amount_nano = Some(7);
        assert_eq!(deal.settlement_amount(), Some(7));
        assert!(!deal.is_approved());
    }

    #[test]
    fn actions_map_to_path_segments() {
        assert_eq!(DealAction::Approve.to_string(), "approve");
        assert_eq!(DealAction::Cancel.as_str(), "cancel");
        assert_eq!(OfferStatus::Rejected.as_str(), "rejected");
    }
}
