use super::types::AssessmentLedger;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default ledger file path (~/.config/luc-valuator/assessments.json)
pub fn get_ledger_path() -> PathBuf {
    crate::config::get_config_dir().join("assessments.json")
}

/// Load the assessment ledger from a JSON file
///
/// If the file doesn't exist, returns a new empty ledger.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_ledger(path: &Path) -> Result<AssessmentLedger> {
    if !path.exists() {
        return Ok(AssessmentLedger::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open assessment ledger at {}", path.display()))?;

    let ledger: AssessmentLedger =
        serde_json::from_reader(file).context("Failed to load assessment ledger")?;

    // Version check
    if ledger.version != 1 {
        anyhow::bail!("Unsupported assessment ledger version: {}", ledger.version);
    }

    Ok(ledger)
}

/// Save the ledger to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if needed.
pub fn save_ledger(path: &Path, ledger: &AssessmentLedger) -> Result<()> {
    // Non-finite amounts serialize as null and break every later load
    if let Some(record) = ledger.records.values().find(|r| !r.is_storable()) {
        anyhow::bail!(
            "Assessment for {} has non-finite amounts and cannot be stored",
            record.property_id
        );
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, ledger).context("Failed to serialize assessment ledger")?;

    // Commit the write atomically
    file.commit().context("Failed to save assessment ledger")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{
        assess, BuildingCondition, Location, LocationClass, PropertyAttributes, PropertyType,
        PropertyUse,
    };

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = load_ledger(&dir.path().join("missing.json")).unwrap();
        assert_eq!(ledger.version, 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("assessments.json");

        let attrs = PropertyAttributes::new(PropertyType::Land, PropertyUse::Commercial)
            .with_land_area(6000.0)
            .with_location(Location::Manual(LocationClass::High));
        let mut ledger = AssessmentLedger::new();
        ledger.record("LAG-VI-001", assess(&attrs).unwrap());
        ledger.record(
            "LAG-IKJ-002",
            assess(
                &PropertyAttributes::new(PropertyType::Building, PropertyUse::Residential)
                    .with_condition(BuildingCondition::Fair)
                    .with_covered_area(650.0),
            )
            .unwrap(),
        );

        save_ledger(&path, &ledger).unwrap();
        let loaded = load_ledger(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.records, ledger.records);
        assert_eq!(
            loaded.certificate("LAG-VI-001").unwrap().result.annual_luc,
            23_625.00
        );
    }

    #[test]
    fn test_non_finite_record_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assessments.json");

        let attrs = PropertyAttributes::new(PropertyType::Land, PropertyUse::Commercial)
            .with_land_area(6000.0)
            .with_location(Location::Manual(LocationClass::High));
        let mut ledger = AssessmentLedger::new();
        ledger.record("LAG-VI-001", assess(&attrs).unwrap());
        save_ledger(&path, &ledger).unwrap();

        let mut broken = assess(&attrs).unwrap();
        broken.estimated_value = f64::INFINITY;
        ledger.record("LAG-VI-002", broken);
        let err = save_ledger(&path, &ledger).unwrap_err();
        assert!(err.to_string().contains("LAG-VI-002"));

        // The earlier file is untouched and still readable
        let loaded = load_ledger(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.certificate("LAG-VI-001").is_some());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assessments.json");
        fs::write(&path, r#"{"version": 2, "records": {}}"#).unwrap();
        let err = load_ledger(&path).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
