//! `EnergyMatch` - energy profile intake and solar recommendations
//!
//! This library provides the request contracts, the recommendation
//! formula, lead forwarding to a workflow webhook and the HTTP surface
//! that ties them together.

pub mod api;
pub mod config;
pub mod error;
pub mod integrations;
pub mod models;
pub mod recommendation;
pub mod telemetry;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use api::{ApiError, AppState};
pub use config::AppConfig;
pub use error::EnergyMatchError;
pub use integrations::{LeadSink, N8nWebhook};
pub use models::{EnergyProfile, Location, Recommendation};
pub use recommendation::generate_recommendations;
pub use validation::{FieldError, ValidationErrors, parse_energy_profile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
