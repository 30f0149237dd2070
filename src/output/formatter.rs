use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ledger::AssessmentRecord;
use crate::valuation::{LocationSource, ValuationResult, ZoneClassification};

/// A valuation with the property it belongs to, for display
pub struct AssessedProperty<'a> {
    pub property_id: &'a str,
    pub result: &'a ValuationResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an amount as Naira with thousands separators: "₦1,234,567.89"
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}₦{}.{}", sign, grouped, cents)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn location_label(result: &ValuationResult) -> String {
    // Manual classes are already labelled "Manual" instead of an area name
    let marker = match result.location_source {
        LocationSource::Fallback => "?",
        LocationSource::Manual | LocationSource::Zone | LocationSource::ZoneName => "",
    };
    format!("{}{} ({})", result.zone_name, marker, result.location_class)
}

/// Format valuations as a table: Index, Property, Type, Location, Value, LUC
/// No headers. A "?" after the zone marks a fallback location.
pub fn format_valuation_table(rows: &[AssessedProperty], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No properties assessed.".to_string();
    }

    let id_width = rows.iter().map(|r| r.property_id.chars().count()).max().unwrap_or(0);
    let value_width = 18;
    let luc_width = 14;
    let type_width = 9;
    let separator = "  ";
    let term_width = get_terminal_width();

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let id = format!("{:<width$}", row.property_id, width = id_width);
            let kind = format!("{:<width$}", row.result.property_type.as_str(), width = type_width);
            let value = format!(
                "{:>width$}",
                format_currency(row.result.estimated_value),
                width = value_width
            );
            let luc = format!(
                "{:>width$}",
                format_currency(row.result.annual_luc),
                width = luc_width
            );

            let fixed_width = 3 + 1 + id_width + type_width + value_width + luc_width + separator.len() * 4;
            let location = location_label(row.result);
            let location = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&location, width - fixed_width),
                Some(_) => truncate(&location, 20),
                None => location,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    id.bold(),
                    separator,
                    kind.cyan(),
                    separator,
                    value.bold(),
                    separator,
                    luc.green(),
                    separator,
                    location
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str, id, separator, kind, separator, value, separator, luc, separator, location
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format valuations as tab-separated values for scripting
/// Columns: property_id, type, class, zone, estimated_value, annual_luc (no headers, no colors)
pub fn format_tsv(rows: &[AssessedProperty]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
                row.property_id,
                row.result.property_type,
                row.result.location_class,
                row.result.zone_name,
                row.result.estimated_value,
                row.result.annual_luc
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the step-by-step calculation for one valuation
pub fn format_breakdown(result: &ValuationResult, use_colors: bool) -> String {
    let breakdown = result.breakdown();
    let mut lines = vec![format!(
        "  Base: {} sqm x {} = {}",
        result.effective_area,
        format_currency(result.base_rate_per_sqm),
        format_currency(breakdown.base_value)
    )];

    for factor in &breakdown.factors {
        let label = format!("{:<10}", factor.label);
        let after = format_currency(factor.after);
        if use_colors {
            lines.push(format!("  {} {}  = {}", label.cyan(), factor.description, after));
        } else {
            lines.push(format!("  {} {}  = {}", label, factor.description, after));
        }
    }

    if let Some(ref o) = result.manual_override {
        let note = format!("  Override by {}: {}", o.authorized_by, o.reason);
        lines.push(if use_colors { note.yellow().to_string() } else { note });
    }

    lines.push(format!(
        "  Estimated value: {}  (LUC {}%: {})",
        format_currency(result.estimated_value),
        result.luc_rate * 100.0,
        format_currency(result.annual_luc)
    ));
    lines.join("\n")
}

/// Format a stored assessment as a certificate body. Reads only persisted values.
pub fn format_certificate(record: &AssessmentRecord, use_colors: bool) -> String {
    let r = &record.result;
    let title = "LAND USE CHARGE ASSESSMENT";
    let title = if use_colors { title.bold().to_string() } else { title.to_string() };
    let weights = r.effective_weights();

    let mut lines = vec![
        title,
        format!("Property:        {}", record.property_id),
        format!("Assessed:        {}", record.assessed_at.format("%Y-%m-%d %H:%M UTC")),
        format!("Type:            {}", r.property_type),
        format!("Location:        {}", location_label(r)),
        format!("Effective area:  {} sqm", r.effective_area),
        format!(
            "Weights:         location x{}, use x{}, type x{}, area x{}",
            weights.location_weight, weights.use_weight, weights.type_weight, weights.area_factor
        ),
    ];
    if r.property_type.has_building() {
        lines.push(format!("Condition:       x{}", weights.building_factor));
    }
    if let Some(ref o) = r.manual_override {
        lines.push(format!("Override:        {} (authorized by {})", o.reason, o.authorized_by));
    }
    lines.push(format!("Estimated value: {}", format_currency(r.estimated_value)));
    lines.push(format!("Annual LUC:      {}", format_currency(r.annual_luc)));
    lines.join("\n")
}

/// Format a zone-name lookup result
pub fn format_classification(input: &str, c: &ZoneClassification) -> String {
    let note = if c.is_fallback() { " (no match, default zone)" } else { "" };
    format!("{} -> {} ({}, x{}){}", input.trim(), c.zone_name, c.class, c.weight, note)
}
