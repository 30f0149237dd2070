use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use luc_valuator::config;
use luc_valuator::ledger::{self, AssessmentLedger};
use luc_valuator::output::{self, AssessedProperty};
use luc_valuator::valuation::{
    self, classify_from_name, classify_from_zone, PropertySubmission, Rates, ValuationResult,
    ZoneDirectory,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_INVALID: i32 = 2;
const EXIT_STORAGE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Value every property in a submission file
    Assess {
        /// YAML or JSON file with a `properties` list
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Show the step-by-step calculation for each property
        #[arg(long)]
        explain: bool,

        /// Store results in the assessment ledger (requires property_id on each entry)
        #[arg(long)]
        save: bool,

        /// Drop any stored manual override instead of carrying it forward
        #[arg(long, requires = "save")]
        clear_override: bool,

        /// Ledger file (defaults to ~/.config/luc-valuator/assessments.json)
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Classify an area name into a location class
    Classify {
        /// Area name or address fragment
        name: String,
    },
    /// List zones in the configured directory with their classes
    Zones,
    /// Print the stored assessment for a property
    Certificate {
        property_id: String,

        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// Write a starter config file
    Init {
        /// Destination (defaults to ~/.config/luc-valuator/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "luc-valuator")]
#[command(about = "Property valuation and Land Use Charge assessment", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/luc-valuator/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubmissionFile {
    properties: Vec<PropertySubmission>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { path, force } = &cli.command {
        let path = path.clone().or(config_path).unwrap_or_else(config::get_config_path);
        if let Err(e) = config::write_starter_config(&path, *force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote starter config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    let valuation_config = config.valuation.clone().unwrap_or_default();
    let mut errors = Vec::new();
    if let Err(e) = valuation::validate_valuation(&valuation_config) {
        errors.extend(e);
    }
    if let Err(e) = valuation::validate_zones(&config.zones) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let rates = valuation_config.rates();
    debug!(
        "rates: {} per sqm, LUC {}; {} zones in directory",
        rates.base_rate_per_sqm,
        rates.luc_rate,
        config.zones.len()
    );

    let directory = ZoneDirectory::new(config.zones);
    let use_colors = output::should_use_colors();

    let code = match cli.command {
        Commands::Assess {
            file,
            format,
            explain,
            save,
            clear_override,
            ledger,
        } => {
            let ledger_path = save.then(|| ledger.unwrap_or_else(ledger::get_ledger_path));
            run_assess(
                &directory,
                &rates,
                &file,
                format,
                explain,
                ledger_path,
                clear_override,
                use_colors,
            )
        }
        Commands::Classify { name } => {
            let c = classify_from_name(&name);
            println!("{}", output::format_classification(&name, &c));
            EXIT_SUCCESS
        }
        Commands::Zones => {
            if directory.zones().is_empty() {
                println!("No zones configured.");
            }
            for zone in directory.zones() {
                let c = classify_from_zone(zone);
                println!(
                    "{}\t{}\t{}\t{} (x{})",
                    zone.id, zone.zone_name, zone.zone_type, c.class, c.weight
                );
            }
            EXIT_SUCCESS
        }
        Commands::Certificate {
            property_id,
            ledger,
        } => run_certificate(&property_id, ledger, use_colors),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

/// Assess every submission. With a ledger path, results go through the ledger
/// so edits keep their authorized overrides, and the ledger is saved at the end.
#[allow(clippy::too_many_arguments)]
fn run_assess(
    directory: &ZoneDirectory,
    rates: &Rates,
    file: &Path,
    format: Format,
    explain: bool,
    ledger_path: Option<PathBuf>,
    clear_override: bool,
    use_colors: bool,
) -> i32 {
    let start_time = Instant::now();

    let submissions = match read_submissions(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_USAGE;
        }
    };

    // Load the ledger up front so a storage problem fails before any work
    let mut store: Option<(PathBuf, AssessmentLedger)> = match ledger_path {
        Some(path) => match ledger::load_ledger(&path) {
            Ok(l) => Some((path, l)),
            Err(e) => {
                eprintln!("Storage error: {:#}", e);
                return EXIT_STORAGE;
            }
        },
        None => None,
    };

    let mut assessed: Vec<(String, ValuationResult)> = Vec::new();
    let mut failed = 0;

    for (i, submission) in submissions.into_iter().enumerate() {
        let stated_id = submission.property_id.clone();
        let property_id = stated_id.clone().unwrap_or_else(|| format!("#{}", i + 1));

        if store.is_some() && stated_id.is_none() {
            eprintln!("{}: no property_id; cannot store it", property_id);
            failed += 1;
            continue;
        }

        let attrs = match submission.into_attributes(directory) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("{}: {}", property_id, e);
                failed += 1;
                continue;
            }
        };

        let outcome = match store.as_mut() {
            Some((_, ledger)) if clear_override => ledger
                .clear_override(&property_id, attrs, rates)
                .map(|r| r.result.clone()),
            Some((_, ledger)) => ledger
                .reassess(&property_id, attrs, rates)
                .map(|r| r.result.clone()),
            None => valuation::assess_with_rates(&attrs, rates),
        };
        match outcome {
            Ok(result) => assessed.push((property_id, result)),
            Err(e) => {
                eprintln!("{}: {}", property_id, e);
                failed += 1;
            }
        }
    }

    let rows: Vec<AssessedProperty> = assessed
        .iter()
        .map(|(id, result)| AssessedProperty {
            property_id: id,
            result,
        })
        .collect();

    match format {
        Format::Table => {
            if explain {
                for row in &rows {
                    println!("{}", output::format_valuation_table(std::slice::from_ref(row), use_colors));
                    println!("{}", output::format_breakdown(row.result, use_colors));
                    println!();
                }
            } else {
                println!("{}", output::format_valuation_table(&rows, use_colors));
            }
        }
        Format::Tsv => println!("{}", output::format_tsv(&rows)),
        Format::Json => {
            let json: Vec<serde_json::Value> = assessed
                .iter()
                .map(|(id, result)| serde_json::json!({ "property_id": id, "result": result }))
                .collect();
            match serde_json::to_string_pretty(&json) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    eprintln!("Failed to serialize results: {}", e);
                    return EXIT_USAGE;
                }
            }
        }
    }

    if let Some((path, ledger)) = store {
        if let Err(e) = ledger::save_ledger(&path, &ledger) {
            eprintln!("Storage error: {:#}", e);
            return EXIT_STORAGE;
        }
        info!("saved {} assessments to {}", assessed.len(), path.display());
    }

    debug!(
        "assessed {} properties ({} rejected) in {:?}",
        assessed.len(),
        failed,
        start_time.elapsed()
    );

    if failed > 0 {
        EXIT_INVALID
    } else {
        EXIT_SUCCESS
    }
}

fn read_submissions(path: &Path) -> anyhow::Result<Vec<PropertySubmission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: SubmissionFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse submissions in {}", path.display()))?;
    Ok(file.properties)
}

fn run_certificate(property_id: &str, ledger_path: Option<PathBuf>, use_colors: bool) -> i32 {
    let path = ledger_path.unwrap_or_else(ledger::get_ledger_path);
    let ledger = match ledger::load_ledger(&path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Storage error: {:#}", e);
            return EXIT_STORAGE;
        }
    };
    match ledger.certificate(property_id) {
        Some(record) => {
            println!("{}", output::format_certificate(record, use_colors));
            EXIT_SUCCESS
        }
        None => {
            eprintln!("No stored assessment for {} in {}", property_id, path.display());
            EXIT_USAGE
        }
    }
}
