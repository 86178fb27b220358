use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod n8n;

pub use n8n::N8nWebhook;

/// Destination for lead payloads.
///
/// Delivery is best effort: implementations never report failures to the
/// caller, so a request that hands a lead over always looks the same.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn forward(&self, payload: &Map<String, Value>);
}
