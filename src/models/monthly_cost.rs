//! Monthly maintenance cost models

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Aggregated maintenance cost for one month (read-only, computed remotely)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    /// Month key, `YYYY-MM`
    #[serde(deserialize_with = "month_key")]
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_cost: Decimal,
}

impl MonthlyCost {
    /// Year part of the month key
    pub fn year(&self) -> &str {
        self.month.get(..4).unwrap_or(&self.month)
    }
}

/// The remote API stores months as first-of-month dates; keep `YYYY-MM`.
fn month_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    Ok(raw.get(..7).unwrap_or(raw).to_string())
}

/// Query parameters for cost listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CostFilterQuery {
    /// `YYYY`, `YYYY-MM`, or empty for every month
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_month_key_normalisation() {
        let cost: MonthlyCost =
            serde_json::from_str(r#"{"month": "2024-03-01", "totalCost": 410.25}"#).unwrap();
        assert_eq!(cost.month, "2024-03");
        assert_eq!(cost.year(), "2024");
        assert_eq!(cost.total_cost, dec!(410.25));

        let cost: MonthlyCost =
            serde_json::from_str(r#"{"month": "2023-12", "totalCost": 0}"#).unwrap();
        assert_eq!(cost.month, "2023-12");
    }
}
