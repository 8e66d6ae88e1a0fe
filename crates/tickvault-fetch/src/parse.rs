//! Parsing of Yahoo Finance JSON responses into raw records.
//!
//! The parsers only change representation: `{raw, fmt}` wrappers are unwrapped
//! to their raw value and numeric arrays are zipped into rows. No field is
//! dropped here; filtering belongs to the normalizer.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use tickvault_types::{
    ProviderError, SeriesRow, Snapshot, StatementRow, StatementTable, Statements, Ticker,
    TimeSeries, Value,
};

/// Column names of the daily price series, in output order.
pub const PRICE_COLUMNS: &[&str] = &[
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

/// Column name of the dividend series.
pub const DIVIDEND_COLUMN: &str = "Dividends";

/// Statement fields that describe the statement rather than a line item.
const STATEMENT_META_FIELDS: &[&str] = &["endDate", "maxAge"];

/// Parses a quoteSummary response into a flat snapshot.
///
/// Modules are flattened in response order. A field that appears in several
/// modules keeps its first position and takes the last value seen.
///
/// # Errors
///
/// Returns [`ProviderError::UnknownIdentifier`] if the provider has no result
/// for the ticker, or [`ProviderError::Malformed`] if the body is not a
/// quoteSummary document.
pub fn parse_quote_summary(ticker: &Ticker, body: &str) -> Result<Snapshot, ProviderError> {
    let root: Json = serde_json::from_str(body)?;
    let result = envelope_result(ticker, &root, "quoteSummary")?;

    let mut snapshot = Snapshot::new();
    for module in result.values() {
        let Json::Object(fields) = module else {
            continue;
        };
        for (key, value) in fields {
            snapshot.insert(key.clone(), unwrap_field(value));
        }
    }
    Ok(snapshot)
}

/// Parses a quoteSummary response holding the three statement history modules.
///
/// A module missing from the response yields an empty statement table.
///
/// # Errors
///
/// Returns an error under the same conditions as [`parse_quote_summary`].
pub fn parse_statements(ticker: &Ticker, body: &str) -> Result<Statements, ProviderError> {
    let root: Json = serde_json::from_str(body)?;
    let result = envelope_result(ticker, &root, "quoteSummary")?;

    Ok(Statements {
        balance_sheet: statement_table(result, "balanceSheetHistory", "balanceSheetStatements")?,
        cash_flow: statement_table(result, "cashflowStatementHistory", "cashflowStatements")?,
        income: statement_table(result, "incomeStatementHistory", "incomeStatementHistory")?,
    })
}

/// Chart API response envelope.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    events: ChartEvents,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

/// Corporate actions keyed by the event's epoch second.
#[derive(Debug, Default, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: BTreeMap<String, DividendEvent>,
    #[serde(default)]
    splits: BTreeMap<String, SplitEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

impl DividendEvent {
    /// Payment time, falling back to the event key when `date` is absent.
    fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, ProviderError> {
        let secs = match self.date {
            Some(secs) => secs,
            None => key
                .parse::<i64>()
                .map_err(|_| ProviderError::Malformed(format!("dividend key {key} is not a timestamp")))?,
        };
        from_epoch(secs)
    }
}

/// Parses a chart response into the full daily price series.
///
/// Dividends and splits are joined onto the price rows by exchange-local date;
/// days without an event carry `0.0`.
///
/// # Errors
///
/// Returns [`ProviderError::UnknownIdentifier`] if the provider has no chart
/// for the ticker, or [`ProviderError::Malformed`] on unexpected structure.
pub fn parse_price_history(ticker: &Ticker, body: &str) -> Result<TimeSeries, ProviderError> {
    let data = chart_result(ticker, body)?;
    let gmt_offset = data.meta.gmtoffset.unwrap_or(0);

    let columns = PRICE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    let Some(timestamps) = data.timestamp else {
        return Ok(TimeSeries::new(columns, Vec::new()));
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("chart result has no quote indicators".into()))?;
    for (key, len) in [
        ("open", quote.open.len()),
        ("high", quote.high.len()),
        ("low", quote.low.len()),
        ("close", quote.close.len()),
        ("volume", quote.volume.len()),
    ] {
        if len != timestamps.len() {
            return Err(ProviderError::Malformed(format!(
                "'{key}' has {len} values for {} timestamps",
                timestamps.len()
            )));
        }
    }

    let mut dividends = HashMap::new();
    for (key, event) in &data.events.dividends {
        dividends.insert(local_date(event.timestamp(key)?, gmt_offset), event.amount);
    }
    let mut splits = HashMap::new();
    for event in data.events.splits.values().filter(|e| e.denominator != 0.0) {
        splits.insert(
            local_date(from_epoch(event.date)?, gmt_offset),
            event.numerator / event.denominator,
        );
    }

    let price = |v: Option<f64>| v.map_or(Value::Null, Value::Float);
    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, secs) in timestamps.into_iter().enumerate() {
        let timestamp = from_epoch(secs)?;
        let day = local_date(timestamp, gmt_offset);
        rows.push(SeriesRow::new(
            timestamp,
            vec![
                price(quote.open[i]),
                price(quote.high[i]),
                price(quote.low[i]),
                price(quote.close[i]),
                quote.volume[i].map_or(Value::Null, Value::Integer),
                Value::Float(dividends.get(&day).copied().unwrap_or(0.0)),
                Value::Float(splits.get(&day).copied().unwrap_or(0.0)),
            ],
        ));
    }

    Ok(TimeSeries::new(columns, rows))
}

/// Parses a chart response into the dividend payment series.
///
/// Rows are ordered by payment timestamp. A ticker that never paid a dividend
/// yields an empty series.
///
/// # Errors
///
/// Returns an error under the same conditions as [`parse_price_history`].
pub fn parse_dividends(ticker: &Ticker, body: &str) -> Result<TimeSeries, ProviderError> {
    let data = chart_result(ticker, body)?;

    let mut rows = data
        .events
        .dividends
        .iter()
        .map(|(key, event)| Ok(SeriesRow::new(event.timestamp(key)?, vec![Value::Float(event.amount)])))
        .collect::<Result<Vec<_>, ProviderError>>()?;
    rows.sort_by_key(|row| row.timestamp);

    Ok(TimeSeries::new(vec![DIVIDEND_COLUMN.to_string()], rows))
}

/// Decodes a chart response and takes its first result.
fn chart_result(ticker: &Ticker, body: &str) -> Result<ChartData, ProviderError> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::UnknownIdentifier(ticker.to_string()));
        }
        return Err(ProviderError::Malformed(format!("{}: {}", error.code, error.description)));
    }

    response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::UnknownIdentifier(ticker.to_string()))
}

/// Extracts the first result object from a `{<root>: {result, error}}` envelope.
fn envelope_result<'a>(
    ticker: &Ticker,
    root: &'a Json,
    envelope: &str,
) -> Result<&'a Map<String, Json>, ProviderError> {
    let body = root
        .get(envelope)
        .ok_or_else(|| ProviderError::Malformed(format!("response has no '{envelope}' object")))?;

    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Json::as_str).unwrap_or_default();
        let description = error
            .get("description")
            .and_then(Json::as_str)
            .unwrap_or_default();
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::UnknownIdentifier(ticker.to_string()));
        }
        return Err(ProviderError::Malformed(format!("{code}: {description}")));
    }

    match body
        .get("result")
        .and_then(Json::as_array)
        .and_then(|results| results.first())
    {
        Some(Json::Object(result)) => Ok(result),
        Some(_) => Err(ProviderError::Malformed(format!("'{envelope}' result is not an object"))),
        None => Err(ProviderError::UnknownIdentifier(ticker.to_string())),
    }
}

/// Unwraps a quoteSummary field: `{raw, fmt}` becomes the raw value, `{}` becomes null.
fn unwrap_field(value: &Json) -> Value {
    match value {
        Json::Object(map) if map.is_empty() => Value::Null,
        Json::Object(map) => map
            .get("raw")
            .map_or_else(|| Value::from_json(value.clone()), |raw| Value::from_json(raw.clone())),
        other => Value::from_json(other.clone()),
    }
}

/// Builds one statement table from a history module.
fn statement_table(
    result: &Map<String, Json>,
    module: &str,
    list_key: &str,
) -> Result<StatementTable, ProviderError> {
    let Some(statements) = result
        .get(module)
        .and_then(|m| m.get(list_key))
        .and_then(Json::as_array)
    else {
        return Ok(StatementTable::default());
    };

    let mut periods = Vec::with_capacity(statements.len());
    let mut labels: Vec<&str> = Vec::new();
    for statement in statements {
        let Json::Object(fields) = statement else {
            return Err(ProviderError::Malformed(format!("{module} entry is not an object")));
        };
        periods.push(period_label(fields.get("endDate"))?);
        for key in fields.keys() {
            if !STATEMENT_META_FIELDS.contains(&key.as_str()) && !labels.contains(&key.as_str()) {
                labels.push(key.as_str());
            }
        }
    }

    let rows = labels
        .into_iter()
        .map(|label| StatementRow {
            label: label.to_string(),
            cells: statements
                .iter()
                .map(|statement| statement.get(label).map_or(Value::Null, unwrap_field))
                .collect(),
        })
        .collect();

    Ok(StatementTable::new(periods, rows))
}

/// Renders a statement `endDate` as `YYYY-MM-DD`.
fn period_label(end_date: Option<&Json>) -> Result<String, ProviderError> {
    let end_date =
        end_date.ok_or_else(|| ProviderError::Malformed("statement has no endDate".into()))?;
    if let Some(fmt) = end_date.get("fmt").and_then(Json::as_str) {
        return Ok(fmt.to_string());
    }
    let raw = end_date.get("raw").unwrap_or(end_date);
    Ok(epoch_to_utc(raw)?.format("%Y-%m-%d").to_string())
}

fn epoch_to_utc(value: &Json) -> Result<DateTime<Utc>, ProviderError> {
    value
        .as_i64()
        .ok_or_else(|| ProviderError::Malformed(format!("'{value}' is not an epoch timestamp")))
        .and_then(from_epoch)
}

fn from_epoch(secs: i64) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ProviderError::Malformed(format!("{secs} is out of range for a timestamp")))
}

fn local_date(timestamp: DateTime<Utc>, gmt_offset: i64) -> NaiveDate {
    (timestamp + chrono::TimeDelta::seconds(gmt_offset)).date_naive()
}
