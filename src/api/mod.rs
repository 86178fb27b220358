use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    integrations::{LeadSink, N8nWebhook},
    models::{ProviderDashboard, Recommendation},
    recommendation::{RecommendFn, generate_recommendations},
    validation::{FieldError, ValidationErrors, parse_energy_profile, parse_lead_payload},
};

pub mod error;

pub use error::{ApiError, ApiResult};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub leads: Arc<dyn LeadSink>,
    pub recommend: RecommendFn,
}

impl AppState {
    pub fn new(leads: Arc<dyn LeadSink>) -> Self {
        Self {
            leads,
            recommend: generate_recommendations,
        }
    }

    /// State wired to the webhook described by `config`
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let webhook = N8nWebhook::new(&config.webhook)?;
        Ok(Self::new(Arc::new(webhook)))
    }

    #[must_use]
    pub fn with_recommender(mut self, recommend: RecommendFn) -> Self {
        self.recommend = recommend;
        self
    }
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    // only bill uploads get the larger body limit
    let uploads = Router::new()
        .route("/analyze-bill", post(analyze_bill))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes));

    let client = Router::new()
        .route("/recommendations", post(recommendations))
        .merge(uploads);

    Router::new()
        .route("/", get(health))
        .nest("/client", client)
        .route("/integrations/n8n/lead", post(send_lead))
        .route("/provider/dashboard", get(provider_dashboard))
}

fn parse_json(body: &Bytes) -> ApiResult<Value> {
    serde_json::from_slice(body).map_err(ApiError::malformed_json)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn recommendations(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Vec<Recommendation>>> {
    let body = parse_json(&body)?;
    let profile = parse_energy_profile(&body).inspect_err(|e| {
        info!("Rejected energy profile: {e}");
    })?;

    Ok(Json((state.recommend)(&profile)))
}

/// Accepts the upload so clients get a proper answer, but no analyzer is wired in.
async fn analyze_bill(mut multipart: Multipart) -> ApiResult<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Invalid multipart body: {}", e.body_text())))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("Unreadable upload: {}", e.body_text())))?;
        info!(file_name, size = content.len(), "Received bill upload");

        return Err(ApiError::not_implemented("bill analysis"));
    }

    Err(ValidationErrors::single(FieldError::missing("file", "file")).into())
}

async fn send_lead(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let payload = parse_lead_payload(parse_json(&body)?)?;
    state.leads.forward(&payload).await;
    Ok(Json(json!({ "status": "sent" })))
}

async fn provider_dashboard() -> Json<ProviderDashboard> {
    Json(ProviderDashboard::sample())
}
