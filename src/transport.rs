//! Delivery transport — forwards the submission to the webhook relay.
//!
//! The relay accepts a named event plus a JSON payload, looks up the target
//! webhook for that event, and forwards the payload server-to-server. Only the
//! client side lives here.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::TransportError;

/// Accepts `(event_name, payload)` and reports whether delivery succeeded.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn deliver(
        &self,
        event_name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), TransportError>;
}

/// HTTP client for the webhook relay.
///
/// One POST per delivery, no timeout, no retry.
pub struct WebhookRelay {
    endpoint: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl WebhookRelay {
    pub fn new(endpoint: String, api_key: Option<SecretString>) -> Self {
        Self {
            endpoint,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeliveryTransport for WebhookRelay {
    fn name(&self) -> &str {
        "webhook_relay"
    }

    async fn deliver(
        &self,
        event_name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "event_name": event_name,
            "payload": payload,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request
                .bearer_auth(key.expose_secret())
                .header("apikey", key.expose_secret());
        }

        tracing::debug!(event = event_name, endpoint = %self.endpoint, "Invoking webhook relay");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed {
                event: event_name.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!(event = event_name, status = status.as_u16(), %detail, "Relay rejected event");
            return Err(TransportError::Rejected {
                event: event_name.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

/// Used when no relay is configured. Every delivery fails.
pub struct DisabledTransport;

#[async_trait]
impl DeliveryTransport for DisabledTransport {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn deliver(
        &self,
        _event_name: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_transport_always_fails() {
        let transport = DisabledTransport;
        let result = transport
            .deliver("SURVEY_SUBMIT", &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(TransportError::NotConfigured)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_request_failure() {
        // Bind and drop a listener to get a port nobody listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let relay = WebhookRelay::new(format!("http://127.0.0.1:{port}/relay"), None);
        let result = relay
            .deliver("SURVEY_SUBMIT", &serde_json::json!({"budget": "0 €"}))
            .await;
        assert!(matches!(
            result,
            Err(TransportError::RequestFailed { ref event, .. }) if event == "SURVEY_SUBMIT"
        ));
    }

    #[test]
    fn relay_keeps_endpoint() {
        let relay = WebhookRelay::new(
            "https://relay.example.com/functions/v1/trigger-webhook".to_string(),
            Some(SecretString::from("anon-key".to_string())),
        );
        assert_eq!(relay.name(), "webhook_relay");
        assert_eq!(
            relay.endpoint(),
            "https://relay.example.com/functions/v1/trigger-webhook"
        );
    }
}
