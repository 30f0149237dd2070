use super::error::{Result, ValuationError};
use super::types::{BuildingCondition, PropertyAttributes, PropertyType, PropertyUse, Weights};
use super::zone::ZoneClassification;

/// Area brackets as `(exclusive lower bound in sqm, factor)`, largest first.
/// A value exactly on a threshold belongs to the bracket below it.
pub const AREA_BRACKETS: [(f64, f64); 4] = [(5000.0, 1.5), (1000.0, 1.2), (500.0, 1.0), (100.0, 0.8)];

/// Factor for areas at or below the smallest threshold.
pub const SMALLEST_AREA_FACTOR: f64 = 0.6;

impl PropertyUse {
    pub const fn weight(self) -> f64 {
        match self {
            PropertyUse::Residential => 0.5,
            PropertyUse::Commercial => 1.0,
            PropertyUse::Industrial => 0.8,
            PropertyUse::PublicGovernment => 0.3,
        }
    }
}

impl PropertyType {
    pub const fn weight(self) -> f64 {
        match self {
            PropertyType::Land => 1.0,
            PropertyType::Building => 1.2,
            PropertyType::MixedUse => 1.3,
        }
    }

    pub const fn has_building(self) -> bool {
        !matches!(self, PropertyType::Land)
    }
}

impl BuildingCondition {
    pub const fn factor(self) -> f64 {
        match self {
            BuildingCondition::New => 1.2,
            BuildingCondition::Fair => 1.0,
            BuildingCondition::Dilapidated => 0.8,
        }
    }
}

pub fn area_factor(area_sqm: f64) -> f64 {
    AREA_BRACKETS
        .iter()
        .find(|(threshold, _)| area_sqm > *threshold)
        .map(|(_, factor)| *factor)
        .unwrap_or(SMALLEST_AREA_FACTOR)
}

fn require_area(value: Option<f64>, field: &'static str, property_type: PropertyType) -> Result<f64> {
    let area = value.ok_or_else(|| {
        ValuationError::invalid(field, format!("is required for {} properties", property_type))
    })?;
    if !area.is_finite() {
        return Err(ValuationError::invalid(field, "must be a finite number"));
    }
    Ok(area)
}

/// Attribute that supplies the effective area for a property type.
pub(crate) fn area_field(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Land => "total_land_area",
        PropertyType::Building | PropertyType::MixedUse => "total_covered_area",
    }
}

/// The single area figure used as the valuation base. Mixed-use is valued on
/// covered area only; its land area is still required as a declared attribute.
pub fn effective_area(attrs: &PropertyAttributes) -> Result<f64> {
    let area = match attrs.property_type {
        PropertyType::Land => {
            require_area(attrs.total_land_area, "total_land_area", attrs.property_type)?
        }
        PropertyType::Building => {
            require_area(attrs.total_covered_area, "total_covered_area", attrs.property_type)?
        }
        PropertyType::MixedUse => {
            require_area(attrs.total_land_area, "total_land_area", attrs.property_type)?;
            require_area(attrs.total_covered_area, "total_covered_area", attrs.property_type)?
        }
    };
    if area <= 0.0 {
        return Err(ValuationError::invalid(
            area_field(attrs.property_type),
            format!("effective area must be positive, got {}", area),
        ));
    }
    Ok(area)
}

/// Building factor for the attribute set. Land has no building, so its factor
/// is the identity and any declared condition is ignored.
pub fn building_factor(attrs: &PropertyAttributes) -> Result<f64> {
    if !attrs.property_type.has_building() {
        return Ok(1.0);
    }
    attrs
        .building_condition
        .map(BuildingCondition::factor)
        .ok_or_else(|| {
            ValuationError::invalid(
                "building_condition",
                format!("is required for {} properties", attrs.property_type),
            )
        })
}

/// Derive all five canonical weights. No field is carried over from a
/// previous result.
pub fn resolve_weights(attrs: &PropertyAttributes, location: &ZoneClassification) -> Result<Weights> {
    let area = effective_area(attrs)?;
    Ok(Weights {
        location_weight: location.class.weight(),
        use_weight: attrs.property_use.weight(),
        type_weight: attrs.property_type.weight(),
        building_factor: building_factor(attrs)?,
        area_factor: area_factor(area),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::{Location, LocationClass};
    use crate::valuation::zone::resolve_location;

    #[test]
    fn test_use_weights() {
        assert_eq!(PropertyUse::Residential.weight(), 0.5);
        assert_eq!(PropertyUse::Commercial.weight(), 1.0);
        assert_eq!(PropertyUse::Industrial.weight(), 0.8);
        assert_eq!(PropertyUse::PublicGovernment.weight(), 0.3);
    }

    #[test]
    fn test_type_weights() {
        assert_eq!(PropertyType::Land.weight(), 1.0);
        assert_eq!(PropertyType::Building.weight(), 1.2);
        assert_eq!(PropertyType::MixedUse.weight(), 1.3);
    }

    #[test]
    fn test_condition_factors() {
        assert_eq!(BuildingCondition::New.factor(), 1.2);
        assert_eq!(BuildingCondition::Fair.factor(), 1.0);
        assert_eq!(BuildingCondition::Dilapidated.factor(), 0.8);
    }

    #[test]
    fn test_area_factor_thresholds_belong_to_lower_bracket() {
        assert_eq!(area_factor(100.0), 0.6);
        assert_eq!(area_factor(500.0), 0.8);
        assert_eq!(area_factor(1000.0), 1.0);
        assert_eq!(area_factor(5000.0), 1.2);
    }

    #[test]
    fn test_area_factor_just_above_thresholds() {
        assert_eq!(area_factor(100.01), 0.8);
        assert_eq!(area_factor(500.01), 1.0);
        assert_eq!(area_factor(1000.01), 1.2);
        assert_eq!(area_factor(5000.01), 1.5);
    }

    #[test]
    fn test_area_factor_extremes() {
        assert_eq!(area_factor(0.5), 0.6);
        assert_eq!(area_factor(1_000_000.0), 1.5);
    }

    #[test]
    fn test_land_building_factor_is_identity() {
        let attrs = PropertyAttributes::new(PropertyType::Land, PropertyUse::Commercial)
            .with_land_area(600.0)
            .with_condition(BuildingCondition::Dilapidated);
        assert_eq!(building_factor(&attrs).unwrap(), 1.0);
    }

    #[test]
    fn test_building_requires_condition() {
        let attrs = PropertyAttributes::new(PropertyType::Building, PropertyUse::Residential)
            .with_covered_area(200.0);
        let err = building_factor(&attrs).unwrap_err();
        assert_eq!(err.field(), "building_condition");
    }

    #[test]
    fn test_mixed_use_uses_covered_area() {
        let attrs = PropertyAttributes::new(PropertyType::MixedUse, PropertyUse::Commercial)
            .with_land_area(2000.0)
            .with_covered_area(800.0)
            .with_condition(BuildingCondition::New);
        assert_eq!(effective_area(&attrs).unwrap(), 800.0);
    }

    #[test]
    fn test_mixed_use_requires_land_area() {
        let attrs = PropertyAttributes::new(PropertyType::MixedUse, PropertyUse::Commercial)
            .with_covered_area(800.0)
            .with_condition(BuildingCondition::New);
        assert_eq!(effective_area(&attrs).unwrap_err().field(), "total_land_area");
    }

    #[test]
    fn test_non_positive_area_rejected() {
        let attrs = PropertyAttributes::new(PropertyType::Land, PropertyUse::Residential)
            .with_land_area(-5.0);
        assert_eq!(effective_area(&attrs).unwrap_err().field(), "total_land_area");
    }

    #[test]
    fn test_nan_area_rejected() {
        let attrs = PropertyAttributes::new(PropertyType::Building, PropertyUse::Residential)
            .with_covered_area(f64::NAN)
            .with_condition(BuildingCondition::Fair);
        assert!(effective_area(&attrs).is_err());
    }

    #[test]
    fn test_resolve_weights_building() {
        let attrs = PropertyAttributes::new(PropertyType::Building, PropertyUse::Industrial)
            .with_covered_area(1200.0)
            .with_condition(BuildingCondition::New)
            .with_location(Location::Manual(LocationClass::Low));
        let location = resolve_location(&attrs.location);
        let w = resolve_weights(&attrs, &location).unwrap();
        assert_eq!(w.location_weight, 0.75);
        assert_eq!(w.use_weight, 0.8);
        assert_eq!(w.type_weight, 1.2);
        assert_eq!(w.building_factor, 1.2);
        assert_eq!(w.area_factor, 1.2);
    }
}
