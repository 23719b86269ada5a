pub mod values;

use crate::error::TierlineError;
use crate::model::{AdjustmentReason, InputAdjustment, MetricKind, VendorMetrics, VendorRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use values::{parse_metric_value, MetricCell};

/// Load vendor records from a `.json` or `.csv` file.
pub fn load_vendors(path: &Path) -> Result<Vec<VendorRecord>, TierlineError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let content = std::fs::read_to_string(path)?;
    match ext.as_str() {
        "json" => parse_vendors_json(&content),
        "csv" => parse_vendors_csv(&content),
        _ => Err(TierlineError::UnsupportedInput(path.display().to_string())),
    }
}

/// A vendor record as written in JSON, before metric values are interpreted.
#[derive(Deserialize)]
struct RawVendorRecord {
    vendor_id: String,
    #[serde(default)]
    name: Option<String>,
    metrics: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    adjustments: Vec<InputAdjustment>,
}

/// Parse one vendor record or an array of them.
///
/// Metric values may be quoted decimals or bare numbers and go through the
/// same cell parsing as CSV, so `"NaN"` or a missing required metric becomes
/// 0 with an adjustment rather than failing the batch.
pub fn parse_vendors_json(json: &str) -> Result<Vec<VendorRecord>, TierlineError> {
    let raw: Vec<RawVendorRecord> = if json.trim_start().starts_with('[') {
        serde_json::from_str(json)?
    } else {
        vec![serde_json::from_str(json)?]
    };
    raw.into_iter().map(vendor_from_json).collect()
}

fn vendor_from_json(raw: RawVendorRecord) -> Result<VendorRecord, TierlineError> {
    if raw.vendor_id.trim().is_empty() {
        return Err(TierlineError::ParseError("empty vendor_id".into()));
    }

    let mut cells: Vec<(MetricKind, String)> = Vec::new();
    for (key, value) in &raw.metrics {
        let Some(kind) = MetricKind::from_str_loose(key) else {
            tracing::debug!(vendor = %raw.vendor_id, field = %key, "ignoring unknown metric field");
            continue;
        };
        let text = match value {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => String::new(),
            other => {
                return Err(TierlineError::ParseError(format!(
                    "vendor '{}', field '{key}': expected a number, got {other}",
                    raw.vendor_id
                )))
            }
        };
        if cells.iter().any(|(k, _)| *k == kind) {
            return Err(TierlineError::ParseError(format!(
                "vendor '{}': metric '{}' appears more than once",
                raw.vendor_id,
                kind.key()
            )));
        }
        cells.push((kind, text));
    }

    let mut metrics = VendorMetrics::default();
    let mut adjustments = raw.adjustments;
    for kind in MetricKind::ALL {
        let cell = cells
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
            .unwrap_or("");
        let parsed = parse_metric_value(cell, kind).map_err(|e| match e {
            TierlineError::ParseError(msg) => TierlineError::ParseError(format!(
                "vendor '{}', field '{}': {msg}",
                raw.vendor_id,
                kind.key()
            )),
            other => other,
        })?;
        apply_cell(&raw.vendor_id, kind, cell, parsed, &mut metrics, &mut adjustments);
    }

    Ok(VendorRecord {
        vendor_id: raw.vendor_id,
        name: raw.name.filter(|s| !s.trim().is_empty()),
        metrics,
        adjustments,
    })
}

/// Store a parsed cell, replacing blank required or non-finite values with 0.
fn apply_cell(
    vendor_id: &str,
    kind: MetricKind,
    cell: &str,
    parsed: MetricCell,
    metrics: &mut VendorMetrics,
    adjustments: &mut Vec<InputAdjustment>,
) {
    let reason = match parsed {
        MetricCell::Value(v) => {
            metrics.set(kind, v);
            return;
        }
        MetricCell::Empty if !kind.is_required() => return,
        MetricCell::Empty => AdjustmentReason::Missing,
        MetricCell::NonFinite => AdjustmentReason::NonFinite,
    };

    tracing::warn!(
        vendor = %vendor_id,
        metric = kind.key(),
        value = cell,
        "replacing unusable metric value with 0"
    );
    metrics.set(kind, Decimal::ZERO);
    adjustments.push(InputAdjustment {
        metric: kind,
        original: cell.to_string(),
        adjusted: Decimal::ZERO,
        reason,
    });
}

/// Parse a CSV export with a header row.
///
/// Required columns: `vendor_id` and one column per required metric. A `name`
/// column and the optional `dispute_rate` / `payment_compliance` columns are
/// picked up when present; unknown columns are ignored. Blank or non-finite
/// cells become 0 and are recorded as adjustments instead of failing the file.
pub fn parse_vendors_csv(content: &str) -> Result<Vec<VendorRecord>, TierlineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut id_col = None;
    let mut name_col = None;
    let mut metric_cols: Vec<(usize, MetricKind)> = Vec::new();

    for (i, header) in headers.iter().enumerate() {
        match header.to_lowercase().as_str() {
            "vendor_id" | "vendor" | "id" => id_col = Some(i),
            "name" | "vendor_name" | "store" => name_col = Some(i),
            _ => match MetricKind::from_str_loose(header) {
                Some(kind) if !metric_cols.iter().any(|(_, k)| *k == kind) => {
                    metric_cols.push((i, kind))
                }
                Some(kind) => {
                    return Err(TierlineError::ParseError(format!(
                        "column for '{}' appears more than once",
                        kind.key()
                    )))
                }
                None => tracing::debug!(column = header, "ignoring unknown CSV column"),
            },
        }
    }

    let id_col = id_col
        .ok_or_else(|| TierlineError::ParseError("missing 'vendor_id' column".into()))?;

    let missing: Vec<&str> = MetricKind::ALL
        .iter()
        .filter(|k| k.is_required() && !metric_cols.iter().any(|(_, c)| c == *k))
        .map(|k| k.key())
        .collect();
    if !missing.is_empty() {
        return Err(TierlineError::ParseError(format!(
            "missing metric column(s): {}",
            missing.join(", ")
        )));
    }

    let mut vendors = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        // Header is line 1.
        let line = row_idx + 2;

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let vendor_id = record.get(id_col).unwrap_or("").to_string();
        if vendor_id.is_empty() {
            return Err(TierlineError::ParseError(format!(
                "line {line}: empty vendor_id"
            )));
        }

        let mut metrics = VendorMetrics::default();
        let mut adjustments = Vec::new();

        for &(col, kind) in &metric_cols {
            let cell = record.get(col).unwrap_or("");
            let parsed = parse_metric_value(cell, kind).map_err(|e| match e {
                TierlineError::ParseError(msg) => TierlineError::ParseError(format!(
                    "line {line}, column '{}': {msg}",
                    kind.key()
                )),
                other => other,
            })?;

            apply_cell(&vendor_id, kind, cell, parsed, &mut metrics, &mut adjustments);
        }

        let name = name_col
            .and_then(|c| record.get(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        vendors.push(VendorRecord {
            vendor_id,
            name,
            metrics,
            adjustments,
        });
    }

    Ok(vendors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "vendor_id,name,response_rate,on_time_delivery,customer_satisfaction,return_rate,order_accuracy,communication,total_sales";

    #[test]
    fn test_parse_csv() {
        let csv = format!(
            "{HEADER}\nv-100,Acme Goods,98%,96,4.8,2.5,97,4.9,\"$12,500\"\nv-101,,90,85,4.0,5,90,4.0,0\n"
        );
        let vendors = parse_vendors_csv(&csv).unwrap();
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[0].vendor_id, "v-100");
        assert_eq!(vendors[0].name.as_deref(), Some("Acme Goods"));
        assert_eq!(vendors[0].metrics.response_rate, dec!(98));
        assert_eq!(vendors[0].metrics.total_sales, dec!(12500));
        assert_eq!(vendors[0].metrics.dispute_rate, None);
        assert!(vendors[0].adjustments.is_empty());
        assert_eq!(vendors[1].name, None);
    }

    #[test]
    fn test_csv_optional_columns() {
        let csv = format!(
            "{HEADER},dispute_rate,payment_compliance\nv-1,A,98,96,4.8,2.5,97,4.9,100,1.5,\n"
        );
        let vendors = parse_vendors_csv(&csv).unwrap();
        assert_eq!(vendors[0].metrics.dispute_rate, Some(dec!(1.5)));
        assert_eq!(vendors[0].metrics.payment_compliance, None);
        assert!(vendors[0].adjustments.is_empty());
    }

    #[test]
    fn test_csv_nan_becomes_adjustment() {
        let csv = format!("{HEADER}\nv-1,A,NaN,96,4.8,,97,4.9,100\n");
        let vendors = parse_vendors_csv(&csv).unwrap();
        let v = &vendors[0];
        assert_eq!(v.metrics.response_rate, dec!(0));
        assert_eq!(v.metrics.return_rate, dec!(0));
        assert_eq!(v.adjustments.len(), 2);
        assert_eq!(v.adjustments[0].reason, AdjustmentReason::NonFinite);
        assert_eq!(v.adjustments[0].original, "NaN");
        assert_eq!(v.adjustments[1].reason, AdjustmentReason::Missing);
    }

    #[test]
    fn test_csv_missing_metric_column() {
        let csv = "vendor_id,response_rate\nv-1,98\n";
        let err = parse_vendors_csv(csv).unwrap_err();
        assert!(err.to_string().contains("on_time_delivery"), "{err}");
    }

    #[test]
    fn test_csv_missing_id_column() {
        let csv = "name,response_rate\nA,98\n";
        assert!(parse_vendors_csv(csv).is_err());
    }

    #[test]
    fn test_csv_bad_cell_names_line_and_column() {
        let csv = format!("{HEADER}\nv-1,A,98,96,great,2.5,97,4.9,100\n");
        let err = parse_vendors_csv(&csv).unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
        assert!(err.contains("customer_satisfaction"), "{err}");
    }

    #[test]
    fn test_parse_json_single_and_array() {
        let one = r#"{
            "vendor_id": "v-1",
            "metrics": {
                "response_rate": "98", "on_time_delivery": "96", "customer_satisfaction": "4.8",
                "return_rate": "2.5", "order_accuracy": "97", "communication": "4.9",
                "total_sales": "12500"
            }
        }"#;
        assert_eq!(parse_vendors_json(one).unwrap().len(), 1);

        let many = format!("[{one}, {one}]");
        assert_eq!(parse_vendors_json(&many).unwrap().len(), 2);
    }

    #[test]
    fn test_json_nan_becomes_adjustment() {
        let json = r#"[
            {
                "vendor_id": "v-1",
                "metrics": {
                    "response_rate": "NaN", "on_time_delivery": 96, "customer_satisfaction": "4.8",
                    "return_rate": "2.5%", "order_accuracy": "97", "communication": "4.9",
                    "total_sales": "$12,500", "dispute_rate": null
                }
            },
            {
                "vendor_id": "v-2",
                "metrics": {
                    "response_rate": "90", "on_time_delivery": "85", "customer_satisfaction": "4.0",
                    "order_accuracy": "90", "communication": "4.0", "total_sales": "0"
                }
            }
        ]"#;
        let vendors = parse_vendors_json(json).unwrap();
        assert_eq!(vendors.len(), 2);

        let v1 = &vendors[0];
        assert_eq!(v1.metrics.response_rate, dec!(0));
        assert_eq!(v1.metrics.on_time_delivery, dec!(96));
        assert_eq!(v1.metrics.return_rate, dec!(2.5));
        assert_eq!(v1.metrics.total_sales, dec!(12500));
        assert_eq!(v1.metrics.dispute_rate, None);
        assert_eq!(v1.adjustments.len(), 1);
        assert_eq!(v1.adjustments[0].metric, MetricKind::ResponseRate);
        assert_eq!(v1.adjustments[0].reason, AdjustmentReason::NonFinite);
        assert_eq!(v1.adjustments[0].original, "NaN");

        let v2 = &vendors[1];
        assert_eq!(v2.adjustments.len(), 1);
        assert_eq!(v2.adjustments[0].metric, MetricKind::ReturnRate);
        assert_eq!(v2.adjustments[0].reason, AdjustmentReason::Missing);
    }

    #[test]
    fn test_json_bad_value_names_vendor_and_field() {
        let json = r#"{
            "vendor_id": "v-9",
            "metrics": { "response_rate": "great", "on_time_delivery": "96" }
        }"#;
        let err = parse_vendors_json(json).unwrap_err().to_string();
        assert!(err.contains("v-9"), "{err}");
        assert!(err.contains("response_rate"), "{err}");
    }

    #[test]
    fn test_load_vendors_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("vendors.csv");
        std::fs::write(&csv_path, format!("{HEADER}\nv-1,A,98,96,4.8,2.5,97,4.9,100\n")).unwrap();
        assert_eq!(load_vendors(&csv_path).unwrap().len(), 1);

        let txt_path = dir.path().join("vendors.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(matches!(
            load_vendors(&txt_path),
            Err(TierlineError::UnsupportedInput(_))
        ));
    }
}
