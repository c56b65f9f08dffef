//! REST client for the TAK coordination API.
//!
//! Payloads are forwarded as opaque JSON. Every POST/PUT body is stamped with
//! the client's schema version and an idempotency key before it leaves.

use crate::{
    config::{ClientConfig, DEFAULT_BASE_URL, SCHEMA_VERSION},
    error::{Result, TakError},
    idempotency,
    model::{DealAction, OfferStatus},
};
use reqwest::{header, Client, Method, Response};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TakClient {
    base_url: String,
    api_key: Option<String>,
    schema_version: String,
    client: Client,
}

impl Default for TakClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

impl TakClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_http_client(base_url, api_key, Client::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("tak/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let mut client = Self::with_http_client(config.base_url.clone(), config.api_key.clone(), http);
        client.schema_version = config.schema_version.clone();
        Ok(client)
    }

    pub fn with_http_client(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(&base_url).to_string(),
            api_key,
            schema_version: SCHEMA_VERSION.to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Sends one request and returns the decoded JSON response.
    ///
    /// A body must serialize to a JSON object; on POST and PUT it gets
    /// `schema_version` overwritten and `idempotency_key` filled in when the
    /// caller left it out.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(body) = body {
            let body = self.stamp_body(&method, path, body)?;
            builder = builder.body(serde_json::to_vec(&body)?);
        }

        tracing::debug!(method = %method, path = %path, "sending TAK request");

        let response = builder.send().await?;
        Self::decode(response).await
    }

    fn stamp_body(&self, method: &Method, path: &str, body: Value) -> Result<Value> {
        let mut body = match body {
            Value::Object(map) => map,
            other => {
                return Err(TakError::InvalidInput(format!(
                    "request body must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        if *method == Method::POST || *method == Method::PUT {
            body.insert("schema_version".to_string(), Value::String(self.schema_version.clone()));

            let has_key = body.get("idempotency_key").map_or(false, |v| !is_blank(v));
            if !has_key {
                let key = idempotency::generate_key(idempotency::prefix_for_path(path));
                body.insert("idempotency_key".to_string(), Value::String(key));
            }
        }

        Ok(Value::Object(body))
    }

    async fn decode(response: Response) -> Result<Value> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(error_text))
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());

            tracing::warn!(status = status.as_u16(), error = %message, "TAK request failed");
            return Err(TakError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, &[], None).await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(serde_json::to_value(data)?)).await
    }

    async fn put<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(serde_json::to_value(data)?)).await
    }

    // Agents

    pub async fn get_agents(&self) -> Result<Value> {
        self.get("/api/agents").await
    }

    pub async fn get_agent(&self, agent_id: &str) -> Result<Value> {
        self.get(&format!("/api/agents/{}", agent_id)).await
    }

    pub async fn create_agent<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.post("/api/agents", data).await
    }

    // Services

    pub async fn get_services(&self) -> Result<Value> {
        self.get("/api/services").await
    }

    pub async fn get_services_by_agent(&self, agent_id: &str) -> Result<Value> {
        self.request(Method::GET, "/api/services", &[("agent_id", agent_id)], None)
            .await
    }

    pub async fn create_service<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.post("/api/services", data).await
    }

    // Requests

    pub async fn get_requests(&self) -> Result<Value> {
        self.get("/api/requests").await
    }

    pub async fn get_request(&self, request_id: &str) -> Result<Value> {
        self.get(&format!("/api/requests/{}", request_id)).await
    }

    pub async fn create_request<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.post("/api/requests", data).await
    }

    pub async fn get_request_offers(&self, request_id: &str) -> Result<Value> {
        self.get(&format!("/api/requests/{}/offers", request_id)).await
    }

    // Offers

    pub async fn get_offers(&self) -> Result<Value> {
        self.get("/api/offers").await
    }

    pub async fn get_offer(&self, offer_id: &str) -> Result<Value> {
        self.get(&format!("/api/offers/{}", offer_id)).await
    }

    pub async fn create_offer<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.post("/api/offers", data).await
    }

    pub async fn set_offer_status(&self, offer_id: &str, status: OfferStatus) -> Result<Value> {
        self.put(&format!("/api/offers/{}", offer_id), &json!({ "status": status.as_str() }))
            .await
    }

    pub async fn accept_offer(&self, offer_id: &str) -> Result<Value> {
        self.set_offer_status(offer_id, OfferStatus::Accepted).await
    }

    pub async fn reject_offer(&self, offer_id: &str) -> Result<Value> {
        self.set_offer_status(offer_id, OfferStatus::Rejected).await
    }

    // Deals

    pub async fn get_deals(&self) -> Result<Value> {
        self.get("/api/deals").await
    }

    pub async fn get_deal(&self, deal_id: &str) -> Result<Value> {
        self.get(&format!("/api/deals/{}", deal_id)).await
    }

    pub async fn create_deal<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.post("/api/deals", data).await
    }

    pub async fn deal_action(&self, deal_id: &str, action: DealAction) -> Result<Value> {
        self.post(&format!("/api/deals/{}/{}", deal_id, action), &json!({}))
            .await
    }

    pub async fn approve_deal(&self, deal_id: &str) -> Result<Value> {
        self.deal_action(deal_id, DealAction::Approve).await
    }

    pub async fn reject_deal(&self, deal_id: &str) -> Result<Value> {
        self.deal_action(deal_id, DealAction::Reject).await
    }

    pub async fn execute_deal(&self, deal_id: &str) -> Result<Value> {
        self.deal_action(deal_id, DealAction::Execute).await
    }

    pub async fn cancel_deal(&self, deal_id: &str) -> Result<Value> {
        self.deal_action(deal_id, DealAction::Cancel).await
    }

    // Messages

    pub async fn get_messages(&self, deal_id: &str) -> Result<Value> {
        self.get(&format!("/api/deals/{}/messages", deal_id)).await
    }

    pub async fn send_message<T: Serialize + ?Sized>(&self, deal_id: &str, data: &T) -> Result<Value> {
        self.post(&format!("/api/deals/{}/messages", deal_id), data).await
    }

    // Health

    pub async fn health(&self) -> Result<Value> {
        self.get("/health").await
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Null, `false`, `0` and `""` all count as "no key supplied".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
