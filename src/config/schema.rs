use serde::{Deserialize, Serialize};

use crate::valuation::{ValuationConfig, Zone};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub valuation: Option<ValuationConfig>,
    /// Zone directory snapshot used to resolve `location_zone` ids.
    #[serde(default)]
    pub zones: Vec<Zone>,
}
