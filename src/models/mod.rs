//! Data models for the `EnergyMatch` service

pub mod energy;
pub mod location;
pub mod provider;

pub use energy::{EnergyProfile, Recommendation};
pub use location::Location;
pub use provider::ProviderDashboard;
