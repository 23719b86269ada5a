use crate::error::TierlineError;
use crate::model::{MetricKind, MetricScale};
use rust_decimal::Decimal;
use std::str::FromStr;

/// A single metric cell from a tabular export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricCell {
    Value(Decimal),
    /// Blank or a "no data" marker.
    Empty,
    /// `NaN` or an infinity, as produced by spreadsheet and dashboard exports.
    NonFinite,
}

/// Parse a metric cell.
///
/// Handles formats like:
/// - "98" / "98%" / "98 %" -> Value(98)
/// - "4.8" -> Value(4.8)
/// - "97,5" -> Value(97.5) (decimal comma, percentages and ratings only)
/// - "$12,500.00" / "12 500" -> Value(12500) (sales)
/// - "", "-", "n/a" -> Empty
/// - "NaN", "inf", "-Infinity" -> NonFinite
pub fn parse_metric_value(s: &str, kind: MetricKind) -> Result<MetricCell, TierlineError> {
    let s = s.trim();
    let lower = s.to_lowercase();

    if s.is_empty() || s == "-" || s == "—" || lower == "n/a" || lower == "null" {
        return Ok(MetricCell::Empty);
    }

    let unsigned = lower.trim_start_matches(['+', '-']);
    if unsigned == "nan" || unsigned == "inf" || unsigned == "infinity" {
        return Ok(MetricCell::NonFinite);
    }

    let stripped = s.trim_end_matches('%').trim_end();
    let normalized = match kind.scale() {
        MetricScale::Amount => stripped
            .trim_start_matches('$')
            .chars()
            .filter(|c| !matches!(c, ',' | '_' | ' '))
            .collect::<String>(),
        MetricScale::Percent | MetricScale::Rating => {
            if stripped.contains(',') && !stripped.contains('.') {
                stripped.replace(',', ".")
            } else {
                stripped.to_string()
            }
        }
    };

    Decimal::from_str(&normalized)
        .map(MetricCell::Value)
        .map_err(|e| TierlineError::ParseError(format!("invalid number '{}': {}", s, e)))
}
