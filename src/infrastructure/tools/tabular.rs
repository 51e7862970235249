//! # Tabular Reader
//!
//! Summarizes CSV content: header, row count, a best-effort typed preview of the first
//! rows and count/mean/min/max for every column whose non-empty cells are all numeric.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::domain::types::{ColumnStats, CsvStats};

const BOM: char = '\u{feff}';

#[derive(Debug, Default)]
struct ColumnAccumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    non_numeric: bool,
}

impl ColumnAccumulator {
    fn observe(&mut self, cell: &Value) {
        match cell {
            Value::Null => {}
            Value::Number(n) => {
                let Some(v) = n.as_f64() else {
                    self.non_numeric = true;
                    return;
                };
                if self.count == 0 {
                    self.min = v;
                    self.max = v;
                } else {
                    self.min = self.min.min(v);
                    self.max = self.max.max(v);
                }
                self.count += 1;
                self.sum += v;
            }
            _ => self.non_numeric = true,
        }
    }

    fn finish(&self) -> Option<ColumnStats> {
        if self.non_numeric || self.count == 0 {
            return None;
        }
        Some(ColumnStats {
            count: self.count,
            mean: self.sum / self.count as f64,
            min: self.min,
            max: self.max,
        })
    }
}

/// Types a single cell: integer, then float, then the raw string. Empty cells are null.
pub fn type_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = trimmed.parse::<f64>()
        && let Some(n) = Number::from_f64(f)
    {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

/// Parses CSV `bytes` (UTF-8, invalid sequences replaced) into a [`CsvStats`] for `path`.
pub fn summarize(path: &str, bytes: &[u8], max_rows_preview: usize) -> Result<CsvStats, csv::Error> {
    let decoded = String::from_utf8_lossy(bytes);
    let text = decoded.strip_prefix(BOM).unwrap_or(&*decoded);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut accumulators: Vec<ColumnAccumulator> =
        columns.iter().map(|_| ColumnAccumulator::default()).collect();

    let mut preview = Vec::new();
    let mut row_count = 0u64;

    for record in reader.records() {
        let record = record?;
        row_count += 1;

        let mut row = Map::new();
        for (idx, column) in columns.iter().enumerate() {
            let cell = record.get(idx).map(type_cell).unwrap_or(Value::Null);
            accumulators[idx].observe(&cell);
            if preview.len() < max_rows_preview {
                row.insert(column.clone(), cell);
            }
        }
        if preview.len() < max_rows_preview {
            preview.push(row);
        }
    }

    let numeric_stats: BTreeMap<String, ColumnStats> = columns
        .iter()
        .zip(&accumulators)
        .filter_map(|(column, acc)| acc.finish().map(|stats| (column.clone(), stats)))
        .collect();

    Ok(CsvStats {
        path: path.to_string(),
        columns,
        row_count,
        numeric_stats,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "\u{feff}번호,종목명,평가액,자산군 내 비중 (%)\n\
1,APPLE INC,1000,5.2%\n\
2,MICROSOFT CORP,800.5,4.1%\n\
3,NVIDIA CORP,,3.0%\n";

    #[test]
    fn test_type_cell() {
        assert_eq!(type_cell("42"), json!(42));
        assert_eq!(type_cell(" 1.5 "), json!(1.5));
        assert_eq!(type_cell("2.5%"), json!("2.5%"));
        assert_eq!(type_cell("   "), Value::Null);
        assert_eq!(type_cell("NaN"), json!("NaN"));
    }

    #[test]
    fn test_summarize_columns_and_preview() {
        let stats = summarize("nps.csv", SAMPLE.as_bytes(), 2).unwrap();
        assert_eq!(stats.columns, vec!["번호", "종목명", "평가액", "자산군 내 비중 (%)"]);
        assert_eq!(stats.row_count, 3);
        assert_eq!(stats.preview.len(), 2);
        assert_eq!(stats.preview[0]["번호"], json!(1));
        assert_eq!(stats.preview[1]["종목명"], json!("MICROSOFT CORP"));
    }

    #[test]
    fn test_summarize_numeric_stats() {
        let stats = summarize("nps.csv", SAMPLE.as_bytes(), 50).unwrap();

        let rank = stats.numeric_stats["번호"];
        assert_eq!(rank.count, 3);
        assert_eq!(rank.min, 1.0);
        assert_eq!(rank.max, 3.0);
        assert_eq!(rank.mean, 2.0);

        // Missing cell is skipped, not counted.
        let value = stats.numeric_stats["평가액"];
        assert_eq!(value.count, 2);
        assert_eq!(value.max, 1000.0);

        assert!(!stats.numeric_stats.contains_key("종목명"));
        assert!(!stats.numeric_stats.contains_key("자산군 내 비중 (%)"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let stats = summarize("x.csv", b"a,b\n1\n2,3\n", 10).unwrap();
        assert_eq!(stats.row_count, 2);
        assert_eq!(stats.preview[0]["b"], Value::Null);
        assert_eq!(stats.numeric_stats["b"].count, 1);
    }

    #[test]
    fn test_header_only() {
        let stats = summarize("x.csv", b"a,b\n", 10).unwrap();
        assert_eq!(stats.row_count, 0);
        assert!(stats.preview.is_empty());
        assert!(stats.numeric_stats.is_empty());
    }
}
