//! Panel protocol client.
//!
//! Every logical operation maps onto one wire primitive: a form-encoded HTTP
//! POST to the provider's base URL carrying the API `key` and an `action`
//! discriminator. Responses are JSON whose shape depends on the action — or,
//! on bad days, an HTML maintenance page from the provider's reverse proxy.
//!
//! The client performs no retries: one call is one request. Callers that
//! want to survive individual failures (the synchronizer) do so at their own
//! granularity.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use serde_json::Value;

use crate::errors::PanelError;
use crate::models::provider::Provider;
use crate::models::remote::{value_string, Balance, RemoteOrder, RemoteService};
use crate::panel::mock;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum raw-body length carried in a `Malformed` error.
const SNIPPET_LEN: usize = 160;

/// Whether the client talks to a live panel or serves the built-in fixture
/// catalog. Always chosen explicitly at construction; never inferred deeper
/// in the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

impl Mode {
    /// Mock when the URL or key carries a test-credential marker
    /// ("test" covers "testing").
    pub fn detect(api_url: &str, api_key: &str) -> Mode {
        if api_url.to_lowercase().contains("test") || api_key.to_lowercase().contains("test") {
            Mode::Mock
        } else {
            Mode::Live
        }
    }
}

pub struct PanelClient {
    api_url: String,
    api_key: String,
    mode: Mode,
    http: reqwest::Client,
}

impl PanelClient {
    pub fn new(api_url: &str, api_key: &str, mode: Mode) -> Result<Self, PanelError> {
        if api_url.trim().is_empty() {
            return Err(PanelError::Configuration("api_url is empty".into()));
        }
        if api_key.trim().is_empty() {
            return Err(PanelError::Configuration("api_key is empty".into()));
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| PanelError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.trim().to_string(),
            api_key: api_key.trim().to_string(),
            mode,
            http,
        })
    }

    /// Client for a stored provider record. `mode_override` forces a mode
    /// (config-driven); otherwise test credentials are auto-detected.
    pub fn for_provider(provider: &Provider, mode_override: Option<Mode>) -> Result<Self, PanelError> {
        let mode =
            mode_override.unwrap_or_else(|| Mode::detect(&provider.api_url, &provider.api_key));
        Self::new(&provider.api_url, &provider.api_key, mode)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    // ── Operations ────────────────────────────────────────────

    /// `action=services` — the provider's full sellable catalog. Records
    /// without a usable service id are dropped here; everything else is the
    /// discovery layer's problem.
    pub async fn services(&self) -> Result<Vec<RemoteService>, PanelError> {
        if self.mode == Mode::Mock {
            return Ok(mock::sample_services());
        }

        let raw = self.call("services", &[]).await?;
        let items = match &raw {
            Value::Array(items) => items.as_slice(),
            // Some panels wrap the list in an envelope.
            other => other
                .get("services")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or_else(|| malformed("services response is not an array", &raw.to_string()))?,
        };

        let mut services = Vec::with_capacity(items.len());
        for item in items {
            match RemoteService::from_value(item) {
                Some(svc) => services.push(svc),
                None => tracing::debug!(record = %item, "dropping service record without id"),
            }
        }

        tracing::info!(url = %self.api_url, count = services.len(), "fetched provider services");
        Ok(services)
    }

    /// `action=balance` — account balance and currency.
    pub async fn balance(&self) -> Result<Balance, PanelError> {
        if self.mode == Mode::Mock {
            return Ok(mock::sample_balance());
        }

        let raw = self.call("balance", &[]).await?;
        Ok(Balance::from_value(&raw))
    }

    /// `action=add` — place an order. Returns the provider's order id.
    pub async fn add_order(
        &self,
        service_id: &str,
        link: &str,
        quantity: Option<u64>,
        extra: &[(String, String)],
    ) -> Result<String, PanelError> {
        if self.mode == Mode::Mock {
            // Mock ids are random on purpose: callers must not assume anything
            // about their shape beyond being non-empty.
            return Ok(rand::thread_rng().gen_range(100_000..1_000_000u64).to_string());
        }

        let mut params: Vec<(&str, String)> = vec![
            ("service", service_id.to_string()),
            ("link", link.to_string()),
        ];
        if let Some(q) = quantity {
            params.push(("quantity", q.to_string()));
        }
        for (k, v) in extra {
            params.push((k.as_str(), v.clone()));
        }

        let raw = self.call("add", &params).await?;
        raw.get("order")
            .and_then(value_string)
            .ok_or_else(|| malformed("add response missing order id", &raw.to_string()))
    }

    /// `action=status` for a single order.
    pub async fn order_status(&self, order_id: &str) -> Result<RemoteOrder, PanelError> {
        if self.mode == Mode::Mock {
            return Ok(mock::sample_order(order_id));
        }

        let raw = self.call("status", &[("order", order_id.to_string())]).await?;
        Ok(RemoteOrder::from_value(order_id, &raw))
    }

    /// `action=status` for a batch. The protocol mandates comma-joined ids in
    /// one request; the response is a map keyed by order id.
    pub async fn multi_order_status(
        &self,
        order_ids: &[String],
    ) -> Result<BTreeMap<String, RemoteOrder>, PanelError> {
        if self.mode == Mode::Mock {
            return Ok(order_ids
                .iter()
                .map(|id| (id.clone(), mock::sample_order(id)))
                .collect());
        }

        let joined = order_ids.join(",");
        let raw = self.call("status", &[("orders", joined)]).await?;
        let map = raw
            .as_object()
            .ok_or_else(|| malformed("batch status response is not an object", &raw.to_string()))?;

        Ok(map
            .iter()
            .map(|(id, v)| (id.clone(), RemoteOrder::from_value(id, v)))
            .collect())
    }

    /// `action=refill` — the ack shape is provider-defined, so it is relayed
    /// as raw JSON.
    pub async fn refill_order(&self, order_id: &str) -> Result<Value, PanelError> {
        if self.mode == Mode::Mock {
            return Ok(serde_json::json!({ "refill": order_id }));
        }

        self.call("refill", &[("order", order_id.to_string())]).await
    }

    // ── Wire primitive ────────────────────────────────────────

    async fn call(&self, action: &str, params: &[(&str, String)]) -> Result<Value, PanelError> {
        let mut form: Vec<(&str, &str)> = vec![("key", self.api_key.as_str()), ("action", action)];
        for (k, v) in params {
            form.push((k, v.as_str()));
        }

        tracing::debug!(url = %self.api_url, action, "panel request");

        let resp = self
            .http
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| PanelError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PanelError::Transport {
                status: Some(status.as_u16()),
                message: format!("provider returned HTTP {status}"),
            });
        }

        let body = resp.text().await.map_err(|e| PanelError::Transport {
            status: None,
            message: format!("failed to read response body: {e}"),
        })?;

        classify_body(&body)
    }
}

/// Classify a 2xx response body per the protocol contract:
/// empty → EmptyResponse, HTML → Protocol, unparseable → Malformed,
/// `{"error": ...}` → Provider, anything else is the action's raw result.
pub fn classify_body(body: &str) -> Result<Value, PanelError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(PanelError::EmptyResponse);
    }

    if looks_like_html(trimmed) {
        return Err(PanelError::Protocol);
    }

    let parsed: Value =
        serde_json::from_str(trimmed).map_err(|e| malformed(&e.to_string(), body))?;

    if let Some(err) = parsed.get("error") {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(PanelError::Provider(message));
    }

    Ok(parsed)
}

fn looks_like_html(trimmed: &str) -> bool {
    let prefix: String = trimmed.chars().take(16).collect::<String>().to_lowercase();
    prefix.starts_with("<!doctype") || prefix.starts_with("<html")
}

fn malformed(detail: &str, body: &str) -> PanelError {
    let snippet: String = body.chars().take(SNIPPET_LEN).collect();
    PanelError::Malformed {
        detail: detail.to_string(),
        snippet,
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_detect_on_url() {
        assert_eq!(Mode::detect("https://testing-panel.example/api/v2", "k"), Mode::Mock);
        assert_eq!(Mode::detect("https://panel.example/api/v2", "k"), Mode::Live);
    }

    #[test]
    fn test_mode_detect_on_key() {
        assert_eq!(Mode::detect("https://panel.example/api/v2", "test-key-123"), Mode::Mock);
        assert_eq!(Mode::detect("https://panel.example/api/v2", "prod-key"), Mode::Live);
    }

    #[test]
    fn test_empty_credentials_fail_fast() {
        assert!(matches!(
            PanelClient::new("", "key", Mode::Live),
            Err(PanelError::Configuration(_))
        ));
        assert!(matches!(
            PanelClient::new("https://panel.example", "  ", Mode::Live),
            Err(PanelError::Configuration(_))
        ));
    }

    #[test]
    fn test_classify_empty_body() {
        assert!(matches!(classify_body(""), Err(PanelError::EmptyResponse)));
        assert!(matches!(classify_body("   \n"), Err(PanelError::EmptyResponse)));
    }

    #[test]
    fn test_classify_html_is_protocol_not_malformed() {
        let page = "<!DOCTYPE html><html><body>maintenance</body></html>";
        assert!(matches!(classify_body(page), Err(PanelError::Protocol)));
        assert!(matches!(classify_body("<html lang=\"en\">"), Err(PanelError::Protocol)));
    }

    #[test]
    fn test_classify_truncated_json_is_malformed() {
        match classify_body("{") {
            Err(PanelError::Malformed { snippet, .. }) => assert_eq!(snippet, "{"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_provider_error_field() {
        match classify_body(r#"{"error": "Invalid API key"}"#) {
            Err(PanelError::Provider(msg)) => assert_eq!(msg, "Invalid API key"),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_non_string_error_field() {
        match classify_body(r#"{"error": {"code": 17}}"#) {
            Err(PanelError::Provider(msg)) => assert!(msg.contains("17")),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_valid_json_passes_through() {
        let value = classify_body(r#"{"balance": "100.00", "currency": "USD"}"#).unwrap();
        assert_eq!(value["balance"], "100.00");
    }

    #[test]
    fn test_malformed_snippet_truncated() {
        let long = format!("not json {}", "x".repeat(500));
        match classify_body(&long) {
            Err(PanelError::Malformed { snippet, .. }) => {
                assert_eq!(snippet.chars().count(), SNIPPET_LEN)
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
