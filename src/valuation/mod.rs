pub mod config;
pub mod engine;
pub mod error;
pub mod submission;
pub mod types;
pub mod validation;
pub mod weights;
pub mod zone;

pub use config::ValuationConfig;
pub use engine::{
    assess, assess_with_rates, round_currency, FactorContribution, Rates, ValuationBreakdown,
    BASE_RATE_PER_SQM, LUC_RATE,
};
pub use error::ValuationError;
pub use submission::{PropertySubmission, ZoneDirectory};
pub use types::*;
pub use validation::{validate_valuation, validate_zones};
pub use weights::{area_factor, effective_area, resolve_weights};
pub use zone::{classify_from_name, classify_from_zone, resolve_location, ZoneClassification};
