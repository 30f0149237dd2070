use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ValuationError;

/// Administrative zone as maintained by the zone directory. Read-only here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Zone {
    pub id: String,
    pub zone_name: String,
    pub zone_type: ZoneType,
    /// Not used by the charge formula yet; reserved for per-zone overrides.
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub avg_property_value: f64,
}

/// Zone tier. Open set: unknown tiers are kept verbatim and classify as Medium.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneType {
    Premium,
    Standard,
    Developing,
    Other(String),
}

impl From<String> for ZoneType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "PREMIUM" => ZoneType::Premium,
            "STANDARD" => ZoneType::Standard,
            "DEVELOPING" => ZoneType::Developing,
            _ => ZoneType::Other(s),
        }
    }
}

impl From<ZoneType> for String {
    fn from(t: ZoneType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneType::Premium => f.write_str("PREMIUM"),
            ZoneType::Standard => f.write_str("STANDARD"),
            ZoneType::Developing => f.write_str("DEVELOPING"),
            ZoneType::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PropertyType {
    Land,
    Building,
    #[serde(rename = "Mixed-use")]
    MixedUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PropertyUse {
    Residential,
    Commercial,
    Industrial,
    #[serde(rename = "Public/Government")]
    PublicGovernment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BuildingCondition {
    New,
    Fair,
    Dilapidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LocationClass {
    High,
    Medium,
    Low,
}

impl LocationClass {
    /// The only place a location weight comes from.
    pub const fn weight(self) -> f64 {
        match self {
            LocationClass::High => 1.5,
            LocationClass::Medium => 1.0,
            LocationClass::Low => 0.75,
        }
    }
}

/// Generates `Display` and a case-insensitive `FromStr` for the closed
/// attribute enums. Unknown strings are `InvalidAttributes`, never a default.
macro_rules! closed_enum_strings {
    ($ty:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValuationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $ty::ALL.iter().map(|v| v.as_str()).collect();
                        ValuationError::invalid(
                            $field,
                            format!("'{}' is not one of {}", wanted, allowed.join(", ")),
                        )
                    })
            }
        }
    };
}

closed_enum_strings!(PropertyType, "property_type", {
    Land => "Land",
    Building => "Building",
    MixedUse => "Mixed-use",
});

closed_enum_strings!(PropertyUse, "property_use", {
    Residential => "Residential",
    Commercial => "Commercial",
    Industrial => "Industrial",
    PublicGovernment => "Public/Government",
});

closed_enum_strings!(BuildingCondition, "building_condition", {
    New => "New",
    Fair => "Fair",
    Dilapidated => "Dilapidated",
});

closed_enum_strings!(LocationClass, "location_class", {
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

/// Where a property's location classification comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Assigned zone record from the directory.
    Zone(Zone),
    /// Free-text or geocoded area name, used before a zone is assigned.
    ZoneName(String),
    /// Operator-selected class.
    Manual(LocationClass),
    Unassigned,
}

/// The five dimensionless multipliers feeding the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Weights {
    pub location_weight: f64,
    pub use_weight: f64,
    pub type_weight: f64,
    pub building_factor: f64,
    pub area_factor: f64,
}

/// Operator adjustment of one or more computed weights, kept for audit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeightOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_factor: Option<f64>,
    pub reason: String,
    pub authorized_by: String,
}

impl WeightOverride {
    pub fn validate(&self) -> Result<(), ValuationError> {
        let values = [
            ("manual_override.location_weight", self.location_weight),
            ("manual_override.use_weight", self.use_weight),
            ("manual_override.type_weight", self.type_weight),
            ("manual_override.building_factor", self.building_factor),
            ("manual_override.area_factor", self.area_factor),
        ];
        for (field, value) in values {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ValuationError::invalid(
                        field,
                        format!("must be a positive number, got {}", v),
                    ));
                }
            }
        }
        if values.iter().all(|(_, v)| v.is_none()) {
            return Err(ValuationError::invalid(
                "manual_override",
                "does not override any weight",
            ));
        }
        if self.reason.trim().is_empty() {
            return Err(ValuationError::invalid(
                "manual_override.reason",
                "an override must state its reason",
            ));
        }
        if self.authorized_by.trim().is_empty() {
            return Err(ValuationError::invalid(
                "manual_override.authorized_by",
                "an override must name who authorized it",
            ));
        }
        Ok(())
    }

    /// Canonical weights with every overridden field replaced.
    pub fn apply(&self, canonical: Weights) -> Weights {
        Weights {
            location_weight: self.location_weight.unwrap_or(canonical.location_weight),
            use_weight: self.use_weight.unwrap_or(canonical.use_weight),
            type_weight: self.type_weight.unwrap_or(canonical.type_weight),
            building_factor: self.building_factor.unwrap_or(canonical.building_factor),
            area_factor: self.area_factor.unwrap_or(canonical.area_factor),
        }
    }
}

/// Engine input: the complete attribute set for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAttributes {
    pub property_type: PropertyType,
    pub property_use: PropertyUse,
    /// Required unless `property_type` is `Land`.
    pub building_condition: Option<BuildingCondition>,
    /// Square metres. Required for `Land` and `Mixed-use`.
    pub total_land_area: Option<f64>,
    /// Square metres. Required for `Building` and `Mixed-use`.
    pub total_covered_area: Option<f64>,
    pub location: Location,
    pub manual_override: Option<WeightOverride>,
}

impl PropertyAttributes {
    pub fn new(property_type: PropertyType, property_use: PropertyUse) -> Self {
        Self {
            property_type,
            property_use,
            building_condition: None,
            total_land_area: None,
            total_covered_area: None,
            location: Location::Unassigned,
            manual_override: None,
        }
    }

    pub fn with_condition(mut self, condition: BuildingCondition) -> Self {
        self.building_condition = Some(condition);
        self
    }

    pub fn with_land_area(mut self, sqm: f64) -> Self {
        self.total_land_area = Some(sqm);
        self
    }

    pub fn with_covered_area(mut self, sqm: f64) -> Self {
        self.total_covered_area = Some(sqm);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_override(mut self, manual_override: WeightOverride) -> Self {
        self.manual_override = Some(manual_override);
        self
    }
}

/// How the location class of a result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Zone,
    ZoneName,
    Manual,
    /// Location data was missing or unmatched; the default zone was used.
    Fallback,
}

/// Engine output. Immutable once computed; an edit produces a new one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValuationResult {
    pub property_type: PropertyType,
    pub location_class: LocationClass,
    pub location_source: LocationSource,
    pub zone_name: String,
    /// Weights re-derived from the attributes, before any override.
    pub weights: Weights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<WeightOverride>,
    pub effective_area: f64,
    pub base_rate_per_sqm: f64,
    pub luc_rate: f64,
    pub base_value: f64,
    pub estimated_value: f64,
    pub annual_luc: f64,
}

impl ValuationResult {
    /// The weights actually multiplied into the estimate.
    pub fn effective_weights(&self) -> Weights {
        match &self.manual_override {
            Some(o) => o.apply(self.weights),
            None => self.weights,
        }
    }
}
