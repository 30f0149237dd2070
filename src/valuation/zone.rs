use tracing::warn;

use super::types::{Location, LocationClass, LocationSource, Zone, ZoneType};

/// Zone used when location data is missing or matches nothing known.
pub const DEFAULT_ZONE_NAME: &str = "Ikeja";
pub const DEFAULT_LOCATION_CLASS: LocationClass = LocationClass::Medium;

/// Zone label for a class chosen by hand, which names no area.
pub const MANUAL_ZONE_LABEL: &str = "Manual";

/// Inputs shorter than this only match a known name exactly or by containing it.
const MIN_PARTIAL_NAME_LEN: usize = 3;

/// Known area names and their tier. Order matters: more specific names come
/// before the names they contain ("Ikeja GRA" before "Ikeja").
pub static KNOWN_ZONES: &[(&str, LocationClass)] = &[
    ("Banana Island", LocationClass::High),
    ("Ikoyi", LocationClass::High),
    ("Victoria Island", LocationClass::High),
    ("Lekki Phase 1", LocationClass::High),
    ("Ikeja GRA", LocationClass::High),
    ("Ikeja", LocationClass::Medium),
    ("Surulere", LocationClass::Medium),
    ("Yaba", LocationClass::Medium),
    ("Gbagada", LocationClass::Medium),
    ("Maryland", LocationClass::Medium),
    ("Agege", LocationClass::Low),
    ("Alimosho", LocationClass::Low),
    ("Ikorodu", LocationClass::Low),
    ("Badagry", LocationClass::Low),
    ("Epe", LocationClass::Low),
];

/// Outcome of location classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneClassification {
    pub class: LocationClass,
    /// Always `class.weight()`.
    pub weight: f64,
    pub zone_name: String,
    pub source: LocationSource,
}

impl ZoneClassification {
    fn new(class: LocationClass, zone_name: impl Into<String>, source: LocationSource) -> Self {
        Self {
            class,
            weight: class.weight(),
            zone_name: zone_name.into(),
            source,
        }
    }

    fn fallback() -> Self {
        Self::new(DEFAULT_LOCATION_CLASS, DEFAULT_ZONE_NAME, LocationSource::Fallback)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == LocationSource::Fallback
    }
}

/// Classify an assigned zone by its tier. Unknown tiers are Medium.
pub fn classify_from_zone(zone: &Zone) -> ZoneClassification {
    let class = match zone.zone_type {
        ZoneType::Premium => LocationClass::High,
        ZoneType::Developing => LocationClass::Low,
        ZoneType::Standard | ZoneType::Other(_) => LocationClass::Medium,
    };
    ZoneClassification::new(class, zone.zone_name.clone(), LocationSource::Zone)
}

/// Classify a free-text area name against [`KNOWN_ZONES`].
///
/// Matching is case-insensitive. An exact name wins; otherwise the first table
/// entry contained in the input, then the first entry containing the input
/// (at least three characters, so "a" never matches "Banana Island").
/// Blank or unmatched input resolves to [`DEFAULT_ZONE_NAME`] and never fails.
pub fn classify_from_name(name: &str) -> ZoneClassification {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        warn!("no location name supplied, using default zone {}", DEFAULT_ZONE_NAME);
        return ZoneClassification::fallback();
    }

    let lowered: Vec<(String, &(&str, LocationClass))> = KNOWN_ZONES
        .iter()
        .map(|entry| (entry.0.to_lowercase(), entry))
        .collect();

    let found = lowered
        .iter()
        .find(|(known, _)| *known == needle)
        .or_else(|| lowered.iter().find(|(known, _)| needle.contains(known.as_str())))
        .or_else(|| {
            if needle.chars().count() < MIN_PARTIAL_NAME_LEN {
                return None;
            }
            lowered.iter().find(|(known, _)| known.contains(needle.as_str()))
        });

    match found {
        Some((_, (canonical, class))) => {
            ZoneClassification::new(*class, *canonical, LocationSource::ZoneName)
        }
        None => {
            warn!(
                "location '{}' matches no known zone, using default zone {}",
                name.trim(),
                DEFAULT_ZONE_NAME
            );
            ZoneClassification::fallback()
        }
    }
}

/// Resolve any [`Location`] to a classification. A manual class names no
/// area, so it is labelled [`MANUAL_ZONE_LABEL`].
pub fn resolve_location(location: &Location) -> ZoneClassification {
    match location {
        Location::Zone(zone) => classify_from_zone(zone),
        Location::ZoneName(name) => classify_from_name(name),
        Location::Manual(class) => {
            ZoneClassification::new(*class, MANUAL_ZONE_LABEL, LocationSource::Manual)
        }
        Location::Unassigned => {
            warn!("property has no location, using default zone {}", DEFAULT_ZONE_NAME);
            ZoneClassification::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(zone_type: ZoneType) -> Zone {
        Zone {
            id: "z-1".to_string(),
            zone_name: "Test Zone".to_string(),
            zone_type,
            tax_rate: 0.005,
            avg_property_value: 25_000_000.0,
        }
    }

    #[test]
    fn test_premium_zone_is_high() {
        let c = classify_from_zone(&zone(ZoneType::Premium));
        assert_eq!(c.class, LocationClass::High);
        assert_eq!(c.weight, 1.5);
        assert_eq!(c.zone_name, "Test Zone");
        assert_eq!(c.source, LocationSource::Zone);
    }

    #[test]
    fn test_developing_zone_is_low() {
        let c = classify_from_zone(&zone(ZoneType::Developing));
        assert_eq!(c.class, LocationClass::Low);
        assert_eq!(c.weight, 0.75);
    }

    #[test]
    fn test_standard_and_unknown_zone_are_medium() {
        assert_eq!(classify_from_zone(&zone(ZoneType::Standard)).class, LocationClass::Medium);
        let c = classify_from_zone(&zone(ZoneType::Other("COASTAL".to_string())));
        assert_eq!(c.class, LocationClass::Medium);
        assert_eq!(c.weight, 1.0);
    }

    #[test]
    fn test_name_exact_match_case_insensitive() {
        let c = classify_from_name("victoria island");
        assert_eq!(c.class, LocationClass::High);
        assert_eq!(c.zone_name, "Victoria Island");
        assert_eq!(c.source, LocationSource::ZoneName);
    }

    #[test]
    fn test_name_input_contains_known() {
        let c = classify_from_name("12 Admiralty Way, Lekki Phase 1, Lagos");
        assert_eq!(c.class, LocationClass::High);
        assert_eq!(c.zone_name, "Lekki Phase 1");
    }

    #[test]
    fn test_name_known_contains_input() {
        let c = classify_from_name("Lekki");
        assert_eq!(c.zone_name, "Lekki Phase 1");
        assert_eq!(c.class, LocationClass::High);
    }

    #[test]
    fn test_specific_name_wins_over_contained_name() {
        assert_eq!(classify_from_name("Ikeja GRA").class, LocationClass::High);
        assert_eq!(classify_from_name("Allen Avenue, Ikeja").class, LocationClass::Medium);
    }

    #[test]
    fn test_low_tier_names() {
        for name in ["Agege", "Badagry", "Epe"] {
            let c = classify_from_name(name);
            assert_eq!(c.class, LocationClass::Low, "{}", name);
            assert_eq!(c.weight, 0.75);
        }
    }

    #[test]
    fn test_unmatched_name_falls_back() {
        let c = classify_from_name("Port Harcourt");
        assert!(c.is_fallback());
        assert_eq!(c.zone_name, DEFAULT_ZONE_NAME);
        assert_eq!(c.class, LocationClass::Medium);
        assert_eq!(c.weight, 1.0);
    }

    #[test]
    fn test_blank_name_falls_back() {
        assert!(classify_from_name("   ").is_fallback());
    }

    #[test]
    fn test_weight_always_derived_from_class() {
        let locations = vec![
            Location::Manual(LocationClass::High),
            Location::Manual(LocationClass::Medium),
            Location::Manual(LocationClass::Low),
            Location::ZoneName("Ikoyi".to_string()),
            Location::ZoneName("Epe".to_string()),
            Location::Zone(zone(ZoneType::Developing)),
            Location::Unassigned,
        ];
        for location in &locations {
            let c = resolve_location(location);
            assert_eq!(c.weight, c.class.weight());
        }
    }

    #[test]
    fn test_short_name_needs_exact_or_contained_match() {
        for name in ["a", "Is", "ik"] {
            let c = classify_from_name(name);
            assert!(c.is_fallback(), "{}", name);
            assert_eq!(c.zone_name, DEFAULT_ZONE_NAME);
        }
        // Three characters is enough for a partial match
        assert_eq!(classify_from_name("Yab").zone_name, "Yaba");
        assert_eq!(classify_from_name("Epe").class, LocationClass::Low);
    }

    #[test]
    fn test_manual_class_names_no_area() {
        let c = resolve_location(&Location::Manual(LocationClass::High));
        assert_eq!(c.class, LocationClass::High);
        assert_eq!(c.zone_name, MANUAL_ZONE_LABEL);
        assert_eq!(c.source, LocationSource::Manual);
        assert!(!c.is_fallback());
    }

    #[test]
    fn test_unassigned_location_falls_back() {
        let c = resolve_location(&Location::Unassigned);
        assert_eq!(c.source, LocationSource::Fallback);
        assert_eq!(c.class, DEFAULT_LOCATION_CLASS);
    }
}
