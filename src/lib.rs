//! Property valuation and Land Use Charge assessment.
//!
//! [`valuation`] is the single engine every caller goes through: registration,
//! edits and bulk runs all produce identical results for identical attributes.
//! [`ledger`] persists results so certificates are rendered from what was
//! stored rather than recomputed.

pub mod config;
pub mod ledger;
pub mod output;
pub mod valuation;
