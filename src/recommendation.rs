//! Solar recommendation derived from an energy profile.
//!
//! A single linear formula over a few constants: capacity is sized from
//! monthly consumption, the upfront cost follows a flat price per kW and
//! savings are a fixed share of the current monthly bill.

use crate::models::{EnergyProfile, Recommendation};

/// Monthly kWh produced by one installed kW
pub const KWH_PER_KW_MONTH: f64 = 120.0;
/// Flat installed price per kW, in COP
pub const PRICE_PER_KW_COP: i64 = 4_200_000;
/// Share of the monthly bill saved after installation
pub const SAVINGS_RATIO: f64 = 0.45;
pub const ROI_YEARS: f64 = 4.2;

pub const RECOMMENDATION_ID: &str = "rec-1";
pub const PROVIDER_NAME: &str = "SolarCaribe Pro";
pub const TECHNOLOGY: &str = "Solar FV";

/// Signature of the computation used by the HTTP layer
pub type RecommendFn = fn(&EnergyProfile) -> Vec<Recommendation>;

/// Returns exactly one recommendation for `profile`.
///
/// Total over any input: zero or negative consumption yields a zero or
/// negative capacity. The upfront cost uses the unrounded capacity.
///
/// Consumption above roughly 2.6e14 kWh pushes the upfront cost past
/// the `i64` range; it saturates at `i64::MAX` (or `i64::MIN` for negative
/// input) instead of wrapping. The monthly savings cannot overflow since
/// the ratio is below one.
#[must_use]
pub fn generate_recommendations(profile: &EnergyProfile) -> Vec<Recommendation> {
    let base_capacity_kw = profile.monthly_consumption_kwh as f64 / KWH_PER_KW_MONTH;

    vec![Recommendation {
        id: RECOMMENDATION_ID.to_string(),
        provider_name: PROVIDER_NAME.to_string(),
        technology: TECHNOLOGY.to_string(),
        capacity_kw: round_one_decimal(base_capacity_kw),
        price_per_kw: PRICE_PER_KW_COP,
        // `as` truncates toward zero
        upfront_cost: (base_capacity_kw * PRICE_PER_KW_COP as f64) as i64,
        savings_monthly: (profile.monthly_cost_cop as f64 * SAVINGS_RATIO) as i64,
        roi_years: ROI_YEARS,
    }]
}

/// Rounds to one decimal place using the exact binary value, ties to even.
///
/// `(x * 10.0).round() / 10.0` is not equivalent: 606 / 120 is stored as
/// 5.04999.. but multiplying by ten lands exactly on 50.5.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}
