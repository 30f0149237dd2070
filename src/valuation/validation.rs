use std::collections::HashSet;

use super::config::ValuationConfig;
use super::types::Zone;

/// Validate valuation configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_valuation(config: &ValuationConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(rate) = config.base_rate_per_sqm {
        if !rate.is_finite() || rate <= 0.0 {
            errors.push(format!(
                "valuation.base_rate_per_sqm: must be positive, got {}",
                rate
            ));
        }
    }

    if let Some(rate) = config.luc_rate {
        if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
            errors.push(format!(
                "valuation.luc_rate: must be a fraction in (0, 1], got {}",
                rate
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the zone directory snapshot from config.
pub fn validate_zones(zones: &[Zone]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, zone) in zones.iter().enumerate() {
        if zone.id.trim().is_empty() {
            errors.push(format!("zones[{}].id: must not be blank", i));
        } else if !seen.insert(zone.id.trim().to_ascii_lowercase()) {
            errors.push(format!("zones[{}].id: duplicate id '{}'", i, zone.id));
        }
        if zone.zone_name.trim().is_empty() {
            errors.push(format!("zones[{}].zone_name: must not be blank", i));
        }
        if !zone.tax_rate.is_finite() || zone.tax_rate < 0.0 {
            errors.push(format!(
                "zones[{}].tax_rate: must be non-negative, got {}",
                i, zone.tax_rate
            ));
        }
        if !zone.avg_property_value.is_finite() || zone.avg_property_value < 0.0 {
            errors.push(format!(
                "zones[{}].avg_property_value: must be non-negative, got {}",
                i, zone.avg_property_value
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::types::ZoneType;

    fn zone(id: &str, name: &str) -> Zone {
        Zone {
            id: id.to_string(),
            zone_name: name.to_string(),
            zone_type: ZoneType::Standard,
            tax_rate: 0.005,
            avg_property_value: 40_000_000.0,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_valuation(&ValuationConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config = ValuationConfig {
            base_rate_per_sqm: None,
            luc_rate: None,
        };
        assert!(validate_valuation(&config).is_ok());
    }

    #[test]
    fn test_zero_base_rate() {
        let config = ValuationConfig {
            base_rate_per_sqm: Some(0.0),
            luc_rate: None,
        };
        let errors = validate_valuation(&config).unwrap_err();
        assert!(errors[0].contains("base_rate_per_sqm"));
    }

    #[test]
    fn test_luc_rate_given_as_percent() {
        let config = ValuationConfig {
            base_rate_per_sqm: None,
            luc_rate: Some(5.0),
        };
        let errors = validate_valuation(&config).unwrap_err();
        assert!(errors[0].contains("valuation.luc_rate"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ValuationConfig {
            base_rate_per_sqm: Some(-1.0),
            luc_rate: Some(f64::NAN),
        };
        assert_eq!(validate_valuation(&config).unwrap_err().len(), 2);
    }

    #[test]
    fn test_valid_zones() {
        let zones = vec![zone("Z-1", "Ikeja"), zone("Z-2", "Yaba")];
        assert!(validate_zones(&zones).is_ok());
    }

    #[test]
    fn test_duplicate_zone_id() {
        let zones = vec![zone("Z-1", "Ikeja"), zone("z-1", "Yaba")];
        let errors = validate_zones(&zones).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("zones[1].id"));
    }

    #[test]
    fn test_blank_zone_fields() {
        let mut bad = zone(" ", "");
        bad.tax_rate = -0.1;
        let errors = validate_zones(&[bad]).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
