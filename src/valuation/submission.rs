use serde::Deserialize;
use tracing::warn;

use super::error::Result;
use super::types::{
    BuildingCondition, Location, LocationClass, PropertyAttributes, PropertyType, PropertyUse,
    WeightOverride, Zone,
};

/// Read-only snapshot of the zone directory, passed in by the caller.
#[derive(Debug, Clone, Default)]
pub struct ZoneDirectory {
    zones: Vec<Zone>,
}

impl ZoneDirectory {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
}

/// A registration or edit payload as the form delivers it. Enum fields are
/// plain strings until [`PropertySubmission::into_attributes`] checks them.
///
/// Example YAML:
/// ```yaml
/// property_id: LAG-IKJ-00042
/// property_type: Building
/// property_use: Residential
/// building_condition: Fair
/// total_covered_area: 650
/// location_zone_name: "Allen Avenue, Ikeja"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertySubmission {
    #[serde(default)]
    pub property_id: Option<String>,
    pub property_type: String,
    pub property_use: String,
    #[serde(default)]
    pub building_condition: Option<String>,
    #[serde(default)]
    pub total_land_area: Option<f64>,
    #[serde(default)]
    pub total_covered_area: Option<f64>,
    /// Zone id in the directory.
    #[serde(default)]
    pub location_zone: Option<String>,
    /// Free-text or geocoded area name.
    #[serde(default)]
    pub location_zone_name: Option<String>,
    /// Operator-selected class; takes precedence over any zone.
    #[serde(default)]
    pub location_class: Option<String>,
    #[serde(default)]
    pub manual_override: Option<WeightOverride>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PropertySubmission {
    /// Check the closed enums and resolve the location reference.
    ///
    /// Precedence: manual class, then zone id, then zone name. An unknown zone
    /// id is incomplete data, not an error.
    pub fn into_attributes(self, directory: &ZoneDirectory) -> Result<PropertyAttributes> {
        let property_type: PropertyType = self.property_type.parse()?;
        let property_use: PropertyUse = self.property_use.parse()?;
        let building_condition = non_blank(&self.building_condition)
            .map(str::parse::<BuildingCondition>)
            .transpose()?;

        // Location precedence
        let location = if let Some(class) = non_blank(&self.location_class) {
            Location::Manual(class.parse::<LocationClass>()?)
        } else {
            let assigned = non_blank(&self.location_zone).and_then(|id| {
                let zone = directory.get(id);
                if zone.is_none() {
                    warn!("zone '{}' is not in the zone directory", id);
                }
                zone
            });
            match (assigned, non_blank(&self.location_zone_name)) {
                (Some(zone), _) => Location::Zone(zone.clone()),
                (None, Some(name)) => Location::ZoneName(name.to_string()),
                (None, None) => Location::Unassigned,
            }
        };

        Ok(PropertyAttributes {
            property_type,
            property_use,
            building_condition,
            total_land_area: self.total_land_area,
            total_covered_area: self.total_covered_area,
            location,
            manual_override: self.manual_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::ZoneType;

    fn directory() -> ZoneDirectory {
        ZoneDirectory::new(vec![Zone {
            id: "Z-IKY".to_string(),
            zone_name: "Ikoyi".to_string(),
            zone_type: ZoneType::Premium,
            tax_rate: 0.0075,
            avg_property_value: 150_000_000.0,
        }])
    }

    fn submission() -> PropertySubmission {
        PropertySubmission {
            property_type: "Building".to_string(),
            property_use: "Residential".to_string(),
            building_condition: Some("Fair".to_string()),
            total_covered_area: Some(650.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_parses_closed_enums() {
        let attrs = submission().into_attributes(&directory()).unwrap();
        assert_eq!(attrs.property_type, PropertyType::Building);
        assert_eq!(attrs.building_condition, Some(BuildingCondition::Fair));
        assert_eq!(attrs.location, Location::Unassigned);
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let mut s = submission();
        s.property_type = "Warehouse".to_string();
        let err = s.into_attributes(&directory()).unwrap_err();
        assert_eq!(err.field(), "property_type");
    }

    #[test]
    fn test_unknown_condition_is_invalid() {
        let mut s = submission();
        s.building_condition = Some("Ruined".to_string());
        assert_eq!(
            s.into_attributes(&directory()).unwrap_err().field(),
            "building_condition"
        );
    }

    #[test]
    fn test_blank_condition_treated_as_missing() {
        let mut s = submission();
        s.building_condition = Some("  ".to_string());
        let attrs = s.into_attributes(&directory()).unwrap();
        assert!(attrs.building_condition.is_none());
    }

    #[test]
    fn test_zone_id_resolved_from_directory() {
        let mut s = submission();
        s.location_zone = Some("z-iky".to_string());
        let attrs = s.into_attributes(&directory()).unwrap();
        match attrs.location {
            Location::Zone(zone) => assert_eq!(zone.zone_name, "Ikoyi"),
            other => panic!("expected zone, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_zone_id_falls_back_to_name() {
        let mut s = submission();
        s.location_zone = Some("Z-MISSING".to_string());
        s.location_zone_name = Some("Yaba".to_string());
        let attrs = s.into_attributes(&directory()).unwrap();
        assert_eq!(attrs.location, Location::ZoneName("Yaba".to_string()));
    }

    #[test]
    fn test_manual_class_takes_precedence() {
        let mut s = submission();
        s.location_zone = Some("Z-IKY".to_string());
        s.location_class = Some("low".to_string());
        let attrs = s.into_attributes(&directory()).unwrap();
        assert_eq!(attrs.location, Location::Manual(LocationClass::Low));
    }

    #[test]
    fn test_invalid_manual_class() {
        let mut s = submission();
        s.location_class = Some("Premium".to_string());
        assert_eq!(
            s.into_attributes(&directory()).unwrap_err().field(),
            "location_class"
        );
    }

    #[test]
    fn test_submission_yaml_parse() {
        let yaml = r#"
property_id: LAG-IKJ-00042
property_type: Mixed-use
property_use: Commercial
building_condition: New
total_land_area: 900
total_covered_area: 600
location_zone_name: "Allen Avenue, Ikeja"
"#;
        let s: PropertySubmission = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(s.property_id.as_deref(), Some("LAG-IKJ-00042"));
        let attrs = s.into_attributes(&ZoneDirectory::default()).unwrap();
        assert_eq!(attrs.property_type, PropertyType::MixedUse);
        assert_eq!(attrs.total_land_area, Some(900.0));
    }
}
