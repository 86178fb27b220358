use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::LeadSink;
use crate::{EnergyMatchError, config::WebhookConfig};

/// Forwards leads to a workflow-automation webhook with one POST per lead.
pub struct N8nWebhook {
    client: Client,
    url: Option<String>,
}

impl N8nWebhook {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("EnergyMatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EnergyMatchError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.enabled_url().map(str::to_string),
        })
    }

    /// Single delivery attempt. Any transport failure, timeout or non-2xx
    /// answer is an `Upstream` error.
    pub async fn deliver(
        &self,
        url: &str,
        payload: &Map<String, Value>,
    ) -> Result<(), EnergyMatchError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnergyMatchError::upstream(format!("webhook timed out: {e}"))
                } else {
                    EnergyMatchError::upstream(format!("webhook request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnergyMatchError::upstream(format!(
                "webhook answered {status}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl LeadSink for N8nWebhook {
    #[instrument(name = "forward_lead", level = "debug", skip_all)]
    async fn forward(&self, payload: &Map<String, Value>) {
        let Some(url) = self.url.as_deref() else {
            debug!("No webhook configured, dropping lead");
            return;
        };

        match self.deliver(url, payload).await {
            Ok(()) => debug!("Lead delivered to webhook"),
            Err(e) => warn!("Lead forwarding failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("lead must be an object"),
        }
    }

    #[test]
    fn test_disabled_without_url() {
        let webhook = N8nWebhook::new(&WebhookConfig::default()).unwrap();
        assert!(webhook.url.is_none());

        let webhook = N8nWebhook::new(&WebhookConfig::with_url("")).unwrap();
        assert!(webhook.url.is_none());
    }

    #[test]
    fn test_enabled_with_url() {
        let webhook =
            N8nWebhook::new(&WebhookConfig::with_url("http://127.0.0.1:5678/webhook")).unwrap();
        assert!(webhook.url.is_some());
    }

    #[tokio::test]
    async fn test_forward_without_url_is_noop() {
        let webhook = N8nWebhook::new(&WebhookConfig::default()).unwrap();
        webhook.forward(&lead(json!({"name": "Ana"}))).await;
    }

    #[tokio::test]
    async fn test_deliver_reports_refused_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/webhook");
        let webhook = N8nWebhook::new(&WebhookConfig::with_url(&url)).unwrap();

        let err = webhook.deliver(&url, &Map::new()).await.unwrap_err();
        assert!(matches!(err, EnergyMatchError::Upstream { .. }));

        // forward swallows the same failure
        webhook.forward(&Map::new()).await;
    }
}
