//! Snapshot-to-table normalization.

use tickvault_types::{NormalizedTable, Snapshot};

/// Fields that are never written from a full snapshot: long free text and URLs.
pub const UNSAFE_SNAPSHOT_FIELDS: &[&str] = &["longBusinessSummary", "website", "logo_url"];

/// Curated general-info fields, in output order.
pub const GENERAL_INFO_FIELDS: &[&str] = &[
    "longName", "symbol", "market", "industry", "sector", "country", "state", "city", "address1",
    "zip", "phone", "website",
];

/// Converts a full snapshot into a `key`/`value` table.
///
/// Rows follow the snapshot's field order. Fields named in
/// [`UNSAFE_SNAPSHOT_FIELDS`] are dropped wherever they appear.
#[must_use]
pub fn normalize_snapshot(snapshot: &Snapshot) -> NormalizedTable {
    NormalizedTable::key_value(
        snapshot
            .iter()
            .filter(|(key, _)| !UNSAFE_SNAPSHOT_FIELDS.contains(key))
            .map(|(key, value)| (key.to_string(), value.clone())),
    )
}

/// Converts a snapshot into a `key`/`value` table restricted to `allow_list`.
///
/// Rows follow the allow-list order, not the snapshot order. Allow-listed
/// fields missing from the snapshot are skipped.
#[must_use]
pub fn normalize_general(snapshot: &Snapshot, allow_list: &[&str]) -> NormalizedTable {
    NormalizedTable::key_value(allow_list.iter().filter_map(|key| {
        snapshot
            .get(key)
            .map(|value| ((*key).to_string(), value.clone()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickvault_types::Value;

    fn keys(table: &NormalizedTable) -> Vec<String> {
        table.column_values(0).map(ToString::to_string).collect()
    }

    fn acme() -> Snapshot {
        [
            ("longName", Value::from("Acme Corp")),
            ("website", Value::from("http://x")),
            ("longBusinessSummary", Value::from("...")),
            ("symbol", Value::from("ACME")),
            ("market", Value::from("us")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_snapshot_drops_unsafe_fields() {
        let table = normalize_snapshot(&acme());
        assert_eq!(table.columns(), ["key", "value"]);
        assert_eq!(keys(&table), vec!["longName", "symbol", "market"]);
        assert_eq!(table.rows()[0][1], Value::from("Acme Corp"));
    }

    #[test]
    fn test_unsafe_fields_dropped_at_any_position() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("logo_url", Value::from("https://logo"));
        for i in 0..200 {
            snapshot.insert(format!("field{i}"), Value::Integer(i));
        }
        snapshot.insert("longBusinessSummary", Value::from("text"));
        snapshot.insert("website", Value::from("https://site"));

        let table = normalize_snapshot(&snapshot);
        let keys = keys(&table);
        assert_eq!(table.len(), 200);
        for unsafe_field in UNSAFE_SNAPSHOT_FIELDS {
            assert!(!keys.iter().any(|k| k == unsafe_field));
        }
        assert_eq!(keys.first().map(String::as_str), Some("field0"));
        assert_eq!(keys.last().map(String::as_str), Some("field199"));
    }

    #[test]
    fn test_snapshot_without_unsafe_fields_is_unchanged() {
        let snapshot: Snapshot = [("a", Value::Integer(1)), ("b", Value::Null)]
            .into_iter()
            .collect();
        let table = normalize_snapshot(&snapshot);
        assert_eq!(keys(&table), vec!["a", "b"]);
        assert_eq!(table.rows()[1][1], Value::Null);
    }

    #[test]
    fn test_general_uses_allow_list_order() {
        let snapshot: Snapshot = [
            ("symbol", Value::from("ACME")),
            ("sector", Value::from("Tech")),
            ("country", Value::from("US")),
        ]
        .into_iter()
        .collect();

        let table = normalize_general(&snapshot, &["symbol", "sector"]);
        assert_eq!(
            table.rows(),
            [
                vec![Value::from("symbol"), Value::from("ACME")],
                vec![Value::from("sector"), Value::from("Tech")],
            ]
        );
    }

    #[test]
    fn test_general_reorders_to_allow_list() {
        let snapshot: Snapshot = [
            ("zip", Value::from("85001")),
            ("country", Value::from("US")),
            ("longName", Value::from("Acme Corp")),
            ("beta", Value::Float(1.2)),
        ]
        .into_iter()
        .collect();

        let table = normalize_general(&snapshot, GENERAL_INFO_FIELDS);
        assert_eq!(keys(&table), vec!["longName", "country", "zip"]);
    }

    #[test]
    fn test_general_keeps_allow_listed_website() {
        let table = normalize_general(&acme(), GENERAL_INFO_FIELDS);
        assert_eq!(keys(&table), vec!["longName", "symbol", "market", "website"]);
    }
}
