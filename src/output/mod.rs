pub mod formatter;

pub use formatter::{
    format_breakdown, format_certificate, format_classification, format_currency,
    format_tsv, format_valuation_table, should_use_colors, AssessedProperty,
};
