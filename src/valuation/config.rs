use serde::{Deserialize, Serialize};

use super::engine::{Rates, BASE_RATE_PER_SQM, LUC_RATE};

/// Valuation rate configuration.
///
/// Both rates are optional; unset rates fall back to the statutory defaults.
///
/// Example YAML:
/// ```yaml
/// valuation:
///   base_rate_per_sqm: 350
///   luc_rate: 0.005
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ValuationConfig {
    /// Currency units per square metre (default: 350)
    #[serde(default)]
    pub base_rate_per_sqm: Option<f64>,

    /// Annual charge as a fraction of estimated value (default: 0.005)
    #[serde(default)]
    pub luc_rate: Option<f64>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            base_rate_per_sqm: Some(BASE_RATE_PER_SQM),
            luc_rate: Some(LUC_RATE),
        }
    }
}

impl ValuationConfig {
    pub fn rates(&self) -> Rates {
        Rates {
            base_rate_per_sqm: self.base_rate_per_sqm.unwrap_or(BASE_RATE_PER_SQM),
            luc_rate: self.luc_rate.unwrap_or(LUC_RATE),
        }
    }
}
