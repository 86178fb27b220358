//! Energy profile and recommendation records exchanged with clients

use serde::{Deserialize, Serialize};

use super::Location;

/// Validated energy usage of a household or business.
///
/// Built by [`crate::validation::parse_energy_profile`]; numeric fields are
/// expected to be non-negative but are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyProfile {
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "monthlyConsumptionKWh")]
    pub monthly_consumption_kwh: i64,
    #[serde(rename = "monthlyCostCOP")]
    pub monthly_cost_cop: i64,
    pub property_type: String,
    /// Budget range label picked in the UI, e.g. "20-50M"
    #[serde(rename = "budgetCOP")]
    pub budget_cop: Option<String>,
    pub operating_hours: i64,
    pub operating_days: i64,
    pub location: Option<Location>,
}

/// One synthetic solar investment suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub provider_name: String,
    pub technology: String,
    /// Installed capacity, one decimal place
    #[serde(rename = "capacityKW")]
    pub capacity_kw: f64,
    #[serde(rename = "pricePerKW")]
    pub price_per_kw: i64,
    pub upfront_cost: i64,
    pub savings_monthly: i64,
    pub roi_years: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendation_wire_names() {
        let rec = Recommendation {
            id: "rec-1".to_string(),
            provider_name: "SolarCaribe Pro".to_string(),
            technology: "Solar FV".to_string(),
            capacity_kw: 5.0,
            price_per_kw: 4_200_000,
            upfront_cost: 21_000_000,
            savings_monthly: 225_000,
            roi_years: 4.2,
        };

        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({
                "id": "rec-1",
                "providerName": "SolarCaribe Pro",
                "technology": "Solar FV",
                "capacityKW": 5.0,
                "pricePerKW": 4_200_000,
                "upfrontCost": 21_000_000,
                "savingsMonthly": 225_000,
                "roiYears": 4.2
            })
        );
    }

    #[test]
    fn test_profile_wire_names() {
        let profile = EnergyProfile {
            name: "Hotel Bocagrande".to_string(),
            email: None,
            monthly_consumption_kwh: 600,
            monthly_cost_cop: 500_000,
            property_type: "Comercial".to_string(),
            budget_cop: Some("20-50M".to_string()),
            operating_hours: 12,
            operating_days: 6,
            location: Some(Location::new(10.4, -75.5)),
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["monthlyConsumptionKWh"], 600);
        assert_eq!(value["monthlyCostCOP"], 500_000);
        assert_eq!(value["budgetCOP"], "20-50M");
        assert_eq!(value["propertyType"], "Comercial");
        assert_eq!(value["operatingHours"], 12);
        assert_eq!(value["location"]["lng"], -75.5);
    }
}
