use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::Config;
use crate::valuation::{ValuationConfig, Zone, ZoneType};

/// Configuration written by `init`: statutory rates and a small sample of
/// the Lagos zone directory to edit.
pub fn starter_config() -> Config {
    let zone = |id: &str, name: &str, zone_type: ZoneType, avg: f64| Zone {
        id: id.to_string(),
        zone_name: name.to_string(),
        zone_type,
        tax_rate: 0.005,
        avg_property_value: avg,
    };
    Config {
        valuation: Some(ValuationConfig::default()),
        zones: vec![
            zone("Z-IKY", "Ikoyi", ZoneType::Premium, 250_000_000.0),
            zone("Z-IKJ", "Ikeja", ZoneType::Standard, 60_000_000.0),
            zone("Z-EPE", "Epe", ZoneType::Developing, 12_000_000.0),
        ],
    }
}

/// Write the starter config to `path` atomically.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_starter_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(&starter_config()).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
