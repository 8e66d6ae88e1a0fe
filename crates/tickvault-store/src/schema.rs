//! Column typing, identifier quoting and cell conversion for SQL destinations.

use rusqlite::types::Value as SqlValue;
use tickvault_types::{NormalizedTable, Value};

use crate::WriteError;

/// Name of the surrogate key column prepended to every materialized table.
pub const ROW_ID_COLUMN: &str = "row_id";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared SQL type of a materialized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Integers and booleans.
    Integer,
    /// Floating point, or integers mixed with floats.
    Real,
    /// Text, and the fallback for mixed or all-null columns.
    Text,
    /// Dates and timestamps, stored as ISO text.
    Timestamp,
}

impl SqlType {
    /// Returns the SQL keyword for this type.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Timestamp => "TIMESTAMP",
        }
    }

    /// Infers a column type from its cells, ignoring nulls.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<Self> = None;
        for value in values {
            let current = match value {
                Value::Null => continue,
                Value::Bool(_) | Value::Integer(_) => Self::Integer,
                Value::Float(_) => Self::Real,
                Value::Date(_) | Value::Timestamp(_) => Self::Timestamp,
                Value::Text(_) | Value::Nested(_) => Self::Text,
            };
            inferred = Some(match (inferred, current) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(Self::Integer | Self::Real), Self::Integer | Self::Real) => Self::Real,
                _ => return Self::Text,
            });
        }
        inferred.unwrap_or(Self::Text)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A destination column: name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub sql_type: SqlType,
}

/// Lists the destination columns of a table: the index (if any), then the data columns.
#[must_use]
pub fn column_defs(table: &NormalizedTable) -> Vec<ColumnDef> {
    let index = table.index().map(|index| ColumnDef {
        name: index.name.clone(),
        sql_type: SqlType::infer(&index.labels),
    });
    let data = table
        .columns()
        .iter()
        .enumerate()
        .map(|(position, name)| ColumnDef {
            name: name.clone(),
            sql_type: SqlType::infer(table.column_values(position)),
        });
    index.into_iter().chain(data).collect()
}

/// Quotes an identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds the `CREATE TABLE` statement for a destination.
#[must_use]
pub fn create_table_sql(name: &str, columns: &[ColumnDef]) -> String {
    let mut sql = format!(
        "CREATE TABLE {} ({} INTEGER PRIMARY KEY AUTOINCREMENT",
        quote_ident(name),
        quote_ident(ROW_ID_COLUMN)
    );
    for column in columns {
        sql.push_str(", ");
        sql.push_str(&quote_ident(&column.name));
        sql.push(' ');
        sql.push_str(column.sql_type.as_sql());
    }
    sql.push(')');
    sql
}

/// Builds the parameterized `INSERT` statement for a destination.
#[must_use]
pub fn insert_sql(name: &str, columns: &[ColumnDef]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_ident(name));
    }
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(name),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Converts a cell into an SQL value.
///
/// Nested objects and arrays are stored as compact JSON text.
///
/// # Errors
///
/// Returns [`WriteError::ValueConversion`] for NaN, which SQLite would
/// silently turn into NULL, and for nested values that fail to serialize.
pub fn to_sql_value(value: &Value, column: &str) -> Result<SqlValue, WriteError> {
    let conversion_error = |reason: String| WriteError::ValueConversion {
        column: column.to_string(),
        reason,
    };
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Float(f) if f.is_nan() => {
            return Err(conversion_error("NaN has no SQL representation".to_string()));
        }
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
        Value::Timestamp(ts) => SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
        Value::Nested(json) => SqlValue::Text(
            serde_json::to_string(json).map_err(|err| conversion_error(err.to_string()))?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_infer_types() {
        assert_eq!(
            SqlType::infer(&[Value::Integer(1), Value::Null, Value::Bool(true)]),
            SqlType::Integer
        );
        assert_eq!(
            SqlType::infer(&[Value::Integer(1), Value::Float(2.5)]),
            SqlType::Real
        );
        assert_eq!(SqlType::infer(&[Value::from("a")]), SqlType::Text);
        assert_eq!(
            SqlType::infer(&[Value::from(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())]),
            SqlType::Timestamp
        );
        assert_eq!(
            SqlType::infer(&[Value::Integer(1), Value::from("a")]),
            SqlType::Text
        );
        assert_eq!(SqlType::infer(&[Value::Null, Value::Null]), SqlType::Text);
        assert_eq!(SqlType::infer(std::iter::empty()), SqlType::Text);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("AAPL Info"), "\"AAPL Info\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_create_table_sql_with_index() {
        let table = NormalizedTable::new(vec!["Close".into()], vec![vec![Value::Float(1.0)]])
            .unwrap()
            .with_index(
                "Date",
                vec![Value::from(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())],
            )
            .unwrap();
        let columns = column_defs(&table);
        assert_eq!(
            create_table_sql("MSFT Historic Price", &columns),
            "CREATE TABLE \"MSFT Historic Price\" (\"row_id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"Date\" TIMESTAMP, \"Close\" REAL)"
        );
        assert_eq!(
            insert_sql("MSFT Historic Price", &columns),
            "INSERT INTO \"MSFT Historic Price\" (\"Date\", \"Close\") VALUES (?1, ?2)"
        );
    }

    #[test]
    fn test_to_sql_value() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            to_sql_value(&Value::Date(date), "d").unwrap(),
            SqlValue::Text("2024-03-01".into())
        );
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
        assert_eq!(
            to_sql_value(&Value::Timestamp(ts), "t").unwrap(),
            SqlValue::Text("2024-03-01 14:30:00".into())
        );
        assert_eq!(
            to_sql_value(&Value::Bool(true), "b").unwrap(),
            SqlValue::Integer(1)
        );

        let nested = Value::Nested(serde_json::json!([{"name": "Tim", "age": 63}]));
        assert_eq!(
            to_sql_value(&nested, "value").unwrap(),
            SqlValue::Text(r#"[{"name":"Tim","age":63}]"#.into())
        );

        assert!(matches!(
            to_sql_value(&Value::Float(f64::NAN), "Close"),
            Err(WriteError::ValueConversion { column, .. }) if column == "Close"
        ));
        assert_eq!(
            to_sql_value(&Value::Float(f64::INFINITY), "Close").unwrap(),
            SqlValue::Real(f64::INFINITY)
        );
    }
}
