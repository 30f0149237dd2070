use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, ValuationError};
use super::types::{PropertyAttributes, PropertyType, ValuationResult};
use super::weights::{area_field, effective_area, resolve_weights};
use super::zone::resolve_location;

/// Currency units per square metre of effective area.
pub const BASE_RATE_PER_SQM: f64 = 350.0;

/// Annual Land Use Charge as a fraction of estimated value (0.5%).
pub const LUC_RATE: f64 = 0.005;

const VALUATION_OVERFLOW: &str = "valuation overflows; the amount is too large to represent";

/// Rates the calculation runs with. Results record the rates they used, so
/// a stored result stays valid after the rates change.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Rates {
    pub base_rate_per_sqm: f64,
    pub luc_rate: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            base_rate_per_sqm: BASE_RATE_PER_SQM,
            luc_rate: LUC_RATE,
        }
    }
}

/// Round half away from zero to 2 decimal places. Amounts here are never
/// negative, so this is half-up.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Value a property with the default rates.
pub fn assess(attrs: &PropertyAttributes) -> Result<ValuationResult> {
    assess_with_rates(attrs, &Rates::default())
}

pub fn assess_with_rates(attrs: &PropertyAttributes, rates: &Rates) -> Result<ValuationResult> {
    let area = effective_area(attrs)?;
    let location = resolve_location(&attrs.location);
    let weights = resolve_weights(attrs, &location)?;

    // Overrides replace weights only after they pass validation
    if let Some(ref o) = attrs.manual_override {
        o.validate()?;
    }
    let applied = match attrs.manual_override {
        Some(ref o) => o.apply(weights),
        None => weights,
    };

    let area_attr = area_field(attrs.property_type);

    let base_value = area * rates.base_rate_per_sqm;
    if !base_value.is_finite() {
        return Err(ValuationError::invalid(area_attr, VALUATION_OVERFLOW));
    }

    let weighted = base_value
        * applied.location_weight
        * applied.use_weight
        * applied.type_weight
        * applied.area_factor;
    // Land carries no building, so its condition never counts
    let estimated = match attrs.property_type {
        PropertyType::Land => weighted,
        PropertyType::Building | PropertyType::MixedUse => weighted * applied.building_factor,
    };
    let annual_luc = estimated * rates.luc_rate;

    // Rounding scales by 100, so check the rounded amounts too
    let estimated_value = round_currency(estimated);
    let annual_luc_rounded = round_currency(annual_luc);
    if !(estimated_value.is_finite() && annual_luc_rounded.is_finite()) {
        let field = if attrs.manual_override.is_some() {
            "manual_override"
        } else {
            area_attr
        };
        return Err(ValuationError::invalid(field, VALUATION_OVERFLOW));
    }

    let result = ValuationResult {
        property_type: attrs.property_type,
        location_class: location.class,
        location_source: location.source,
        zone_name: location.zone_name,
        weights,
        manual_override: attrs.manual_override.clone(),
        effective_area: area,
        base_rate_per_sqm: rates.base_rate_per_sqm,
        luc_rate: rates.luc_rate,
        base_value,
        estimated_value,
        annual_luc: annual_luc_rounded,
    };

    debug!(
        "assessed {} {} sqm in {} ({}): value {:.2}, luc {:.2}",
        attrs.property_type,
        area,
        result.zone_name,
        result.location_class,
        result.estimated_value,
        result.annual_luc
    );

    Ok(result)
}

/// One multiplication step of a valuation, for display and audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Location", "Use", "Area"
    pub description: String, // e.g. "High (Ikoyi) -> x1.5"
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationBreakdown {
    pub base_value: f64,
    pub factors: Vec<FactorContribution>,
}

impl ValuationResult {
    /// Replay the calculation from the stored weights. Values are unrounded;
    /// the final step matches `estimated_value` once rounded.
    pub fn breakdown(&self) -> ValuationBreakdown {
        let applied = self.effective_weights();
        let overridden = |canonical: f64, used: f64| {
            if canonical == used {
                String::new()
            } else {
                format!(" (override, computed x{})", canonical)
            }
        };

        let mut steps: Vec<(&str, String, f64)> = vec![
            (
                "Location",
                format!(
                    "{} ({}) -> x{}{}",
                    self.location_class,
                    self.zone_name,
                    applied.location_weight,
                    overridden(self.weights.location_weight, applied.location_weight)
                ),
                applied.location_weight,
            ),
            (
                "Use",
                format!(
                    "x{}{}",
                    applied.use_weight,
                    overridden(self.weights.use_weight, applied.use_weight)
                ),
                applied.use_weight,
            ),
            (
                "Type",
                format!(
                    "{} -> x{}{}",
                    self.property_type,
                    applied.type_weight,
                    overridden(self.weights.type_weight, applied.type_weight)
                ),
                applied.type_weight,
            ),
            (
                "Area",
                format!(
                    "{} sqm -> x{}{}",
                    self.effective_area,
                    applied.area_factor,
                    overridden(self.weights.area_factor, applied.area_factor)
                ),
                applied.area_factor,
            ),
        ];
        if self.property_type.has_building() {
            steps.push((
                "Condition",
                format!(
                    "x{}{}",
                    applied.building_factor,
                    overridden(self.weights.building_factor, applied.building_factor)
                ),
                applied.building_factor,
            ));
        }

        let mut value = self.base_value;
        let factors = steps
            .into_iter()
            .map(|(label, description, factor)| {
                let before = value;
                value *= factor;
                FactorContribution {
                    label: label.to_string(),
                    description,
                    before,
                    after: value,
                }
            })
            .collect();

        ValuationBreakdown {
            base_value: self.base_value,
            factors,
        }
    }
}
