use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::valuation::{assess_with_rates, PropertyAttributes, Rates, ValuationError, ValuationResult};

/// Persisted valuation results, one current record per property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentLedger {
    pub version: u32,
    #[serde(default)]
    pub records: BTreeMap<String, AssessmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub property_id: String,
    pub assessed_at: DateTime<Utc>,
    pub result: ValuationResult,
}

impl AssessmentRecord {
    /// Every stored amount must survive a JSON roundtrip.
    pub fn is_storable(&self) -> bool {
        let r = &self.result;
        [
            r.effective_area,
            r.base_rate_per_sqm,
            r.luc_rate,
            r.base_value,
            r.estimated_value,
            r.annual_luc,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl Default for AssessmentLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentLedger {
    /// Create a new empty ledger with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            records: BTreeMap::new(),
        }
    }

    /// Store a result, replacing any previous record for the property wholesale.
    /// Returns the replaced record, if any.
    pub fn record(&mut self, property_id: &str, result: ValuationResult) -> Option<AssessmentRecord> {
        let record = AssessmentRecord {
            property_id: property_id.to_string(),
            assessed_at: Utc::now(),
            result,
        };
        self.records.insert(property_id.to_string(), record)
    }

    /// Recompute a property from its full attribute set and store the result.
    ///
    /// An authorized override on the previous record is carried forward when
    /// the new attributes carry none, so an edit never drops it silently.
    pub fn reassess(
        &mut self,
        property_id: &str,
        mut attrs: PropertyAttributes,
        rates: &Rates,
    ) -> Result<&AssessmentRecord, ValuationError> {
        // Carry forward the previous override
        if attrs.manual_override.is_none() {
            attrs.manual_override = self
                .records
                .get(property_id)
                .and_then(|r| r.result.manual_override.clone());
        }
        let result = assess_with_rates(&attrs, rates)?;
        self.record(property_id, result);
        Ok(&self.records[property_id])
    }

    /// Drop a property's override by recomputing without it.
    pub fn clear_override(
        &mut self,
        property_id: &str,
        mut attrs: PropertyAttributes,
        rates: &Rates,
    ) -> Result<&AssessmentRecord, ValuationError> {
        attrs.manual_override = None;
        let result = assess_with_rates(&attrs, rates)?;
        self.record(property_id, result);
        Ok(&self.records[property_id])
    }

    /// Stored record for certificate rendering. Never re-runs the engine.
    pub fn certificate(&self, property_id: &str) -> Option<&AssessmentRecord> {
        self.records.get(property_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
