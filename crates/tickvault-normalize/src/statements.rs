//! Statements-to-table normalization.

use tickvault_types::{NormalizedTable, ShapeError, StatementTable, Statements, Value};

/// Name of the row index holding statement line-item labels.
pub const STATEMENT_INDEX: &str = "line_item";

/// Concatenates balance sheet, cash flow and income statement row-wise.
///
/// Columns are the union of all period labels in first-seen order; a line item
/// without a value for a period gets a null cell. Row labels are kept as the
/// index and are never merged, so a label present in two statements appears
/// twice.
///
/// # Errors
///
/// Returns [`ShapeError::Ragged`] if a statement row does not have one cell per
/// period of its own statement.
pub fn normalize_financials(statements: &Statements) -> Result<NormalizedTable, ShapeError> {
    let parts = [
        &statements.balance_sheet,
        &statements.cash_flow,
        &statements.income,
    ];

    let mut columns: Vec<String> = Vec::new();
    for period in parts.iter().flat_map(|table| table.periods.iter()) {
        if !columns.contains(period) {
            columns.push(period.clone());
        }
    }

    let total_rows = parts.iter().map(|table| table.len()).sum();
    let mut labels = Vec::with_capacity(total_rows);
    let mut rows = Vec::with_capacity(total_rows);
    let mut offset = 0;
    for table in parts {
        append_statement(table, &columns, offset, &mut labels, &mut rows)?;
        offset += table.len();
    }

    NormalizedTable::new(columns, rows)?.with_index(STATEMENT_INDEX, labels)
}

/// Aligns one statement's rows onto the combined period columns.
fn append_statement(
    table: &StatementTable,
    columns: &[String],
    offset: usize,
    labels: &mut Vec<Value>,
    rows: &mut Vec<Vec<Value>>,
) -> Result<(), ShapeError> {
    let positions: Vec<usize> = table
        .periods
        .iter()
        .filter_map(|period| columns.iter().position(|c| c == period))
        .collect();

    for (i, row) in table.rows.iter().enumerate() {
        if row.cells.len() != table.periods.len() {
            return Err(ShapeError::Ragged {
                row: offset + i,
                expected: table.periods.len(),
                found: row.cells.len(),
            });
        }
        let mut aligned = vec![Value::Null; columns.len()];
        for (cell, &position) in row.cells.iter().zip(&positions) {
            aligned[position] = cell.clone();
        }
        labels.push(Value::Text(row.label.clone()));
        rows.push(aligned);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickvault_types::StatementRow;

    fn statement(periods: &[&str], rows: Vec<(&str, Vec<i64>)>) -> StatementTable {
        StatementTable::new(
            periods.iter().map(|p| (*p).to_string()).collect(),
            rows.into_iter()
                .map(|(label, cells)| StatementRow {
                    label: label.to_string(),
                    cells: cells.into_iter().map(Value::Integer).collect(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_row_count_is_sum_of_parts() {
        let statements = Statements {
            balance_sheet: statement(&["2024", "2023"], vec![("cash", vec![1, 2]), ("debt", vec![3, 4])]),
            cash_flow: statement(&["2024", "2023"], vec![("netIncome", vec![5, 6])]),
            income: statement(&["2024", "2023"], vec![("netIncome", vec![7, 8]), ("revenue", vec![9, 10])]),
        };
        let table = normalize_financials(&statements).unwrap();

        assert_eq!(
            table.len(),
            statements.balance_sheet.len() + statements.cash_flow.len() + statements.income.len()
        );
        assert_eq!(table.columns(), ["2024", "2023"]);

        let index = table.index().unwrap();
        assert_eq!(index.name, STATEMENT_INDEX);
        let labels: Vec<_> = index.labels.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["cash", "debt", "netIncome", "netIncome", "revenue"]);
        // Duplicate label keeps both rows with their own values
        assert_eq!(table.rows()[2], vec![Value::Integer(5), Value::Integer(6)]);
        assert_eq!(table.rows()[3], vec![Value::Integer(7), Value::Integer(8)]);
    }

    #[test]
    fn test_period_union_fills_nulls() {
        let statements = Statements {
            balance_sheet: statement(&["2024", "2023"], vec![("cash", vec![1, 2])]),
            cash_flow: statement(&["2022"], vec![("capex", vec![3])]),
            income: StatementTable::default(),
        };
        let table = normalize_financials(&statements).unwrap();

        assert_eq!(table.columns(), ["2024", "2023", "2022"]);
        assert_eq!(
            table.rows()[0],
            vec![Value::Integer(1), Value::Integer(2), Value::Null]
        );
        assert_eq!(
            table.rows()[1],
            vec![Value::Null, Value::Null, Value::Integer(3)]
        );
    }

    #[test]
    fn test_empty_statements() {
        let table = normalize_financials(&Statements::default()).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_ragged_statement_rejected() {
        let statements = Statements {
            balance_sheet: statement(&["2024"], vec![("cash", vec![1])]),
            cash_flow: statement(&["2024", "2023"], vec![("capex", vec![3])]),
            income: StatementTable::default(),
        };
        assert!(matches!(
            normalize_financials(&statements),
            Err(ShapeError::Ragged { row: 1, expected: 2, found: 1 })
        ));
    }
}
