//! Series-to-table normalization.

use tickvault_types::{NormalizedTable, ShapeError, TimeSeries, Value};

/// Name of the row index holding observation timestamps.
pub const SERIES_INDEX: &str = "Date";

/// Reinterprets a time series as a table indexed by timestamp.
///
/// Rows keep the series order; nothing is filtered, sorted or deduplicated.
///
/// # Errors
///
/// Returns [`ShapeError::Ragged`] if a row does not have one value per series column.
pub fn normalize_series(series: &TimeSeries) -> Result<NormalizedTable, ShapeError> {
    let labels = series
        .rows
        .iter()
        .map(|row| Value::Timestamp(row.timestamp))
        .collect();
    let rows = series.rows.iter().map(|row| row.values.clone()).collect();

    NormalizedTable::new(series.columns.clone(), rows)?.with_index(SERIES_INDEX, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tickvault_types::SeriesRow;

    fn row(day: u32, close: f64) -> SeriesRow {
        let ts = Utc.with_ymd_and_hms(2024, 1, day, 14, 30, 0).unwrap();
        SeriesRow::new(ts, vec![Value::Float(close)])
    }

    #[test]
    fn test_series_preserves_rows_and_timestamps() {
        // Out of order and duplicated on purpose
        let series = TimeSeries::new(
            vec!["Close".into()],
            vec![row(3, 1.0), row(2, 2.0), row(2, 2.0), row(5, 3.0)],
        );
        let table = normalize_series(&series).unwrap();

        assert_eq!(table.len(), series.len());
        assert_eq!(table.columns(), ["Close"]);
        let index = table.index().unwrap();
        assert_eq!(index.name, SERIES_INDEX);
        let expected: Vec<_> = series
            .rows
            .iter()
            .map(|r| Value::Timestamp(r.timestamp))
            .collect();
        assert_eq!(index.labels, expected);
        assert_eq!(table.rows()[3], vec![Value::Float(3.0)]);
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::new(vec!["Dividends".into()], Vec::new());
        let table = normalize_series(&series).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["Dividends"]);
    }

    #[test]
    fn test_ragged_series_rejected() {
        let series = TimeSeries::new(vec!["Open".into(), "Close".into()], vec![row(2, 1.0)]);
        assert!(matches!(
            normalize_series(&series),
            Err(ShapeError::Ragged { row: 0, expected: 2, found: 1 })
        ));
    }
}
