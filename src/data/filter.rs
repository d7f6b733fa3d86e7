use std::collections::BTreeMap;

use super::model::{Dataset, Value};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Return indices of rows whose value is present in every listed column.
///
/// This is `dropna(subset=columns)`: a row is kept only when none of the
/// named columns is missing for it.
pub fn complete_rows(dataset: &Dataset, columns: &[&str]) -> Result<Vec<usize>, DataError> {
    let cols = columns
        .iter()
        .map(|name| dataset.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((0..dataset.len())
        .filter(|&row| cols.iter().all(|c| !c.values[row].is_null()))
        .collect())
}

/// Partition `rows` by the value of the `by` column.
///
/// Rows where `by` is missing are left out. Groups come back in sorted
/// value order so colours and legends are stable between runs.
pub fn group_rows(
    dataset: &Dataset,
    by: &str,
    rows: &[usize],
) -> Result<BTreeMap<Value, Vec<usize>>, DataError> {
    let col = dataset.column(by)?;
    let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
    for &row in rows {
        let key = &col.values[row];
        if key.is_null() {
            continue;
        }
        groups.entry(key.clone()).or_default().push(row);
    }
    Ok(groups)
}

/// Numeric values of `column` at `rows`, skipping missing cells.
pub fn numeric_at(dataset: &Dataset, column: &str, rows: &[usize]) -> Result<Vec<f64>, DataError> {
    let values = dataset.column(column)?.numeric()?;
    Ok(rows.iter().filter_map(|&r| values[r]).collect())
}

/// `(x, y)` pairs at `rows` where both coordinates are present.
pub fn numeric_pairs_at(
    dataset: &Dataset,
    x: &str,
    y: &str,
    rows: &[usize],
) -> Result<Vec<(f64, f64)>, DataError> {
    let xs = dataset.column(x)?.numeric()?;
    let ys = dataset.column(y)?.numeric()?;
    Ok(rows
        .iter()
        .filter_map(|&r| Some((xs[r]?, ys[r]?)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, DType};

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "Age",
                DType::Float64,
                vec![Value::Float(22.0), Value::Null, Value::Float(35.0), Value::Float(4.0)],
            ),
            Column::new(
                "Fare",
                DType::Float64,
                vec![Value::Float(7.25), Value::Float(71.3), Value::Null, Value::Float(16.7)],
            ),
            Column::new(
                "Survived",
                DType::Float64,
                vec![Value::Float(0.0), Value::Float(1.0), Value::Float(1.0), Value::Null],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn complete_rows_drops_missing_subset() {
        let ds = sample();
        assert_eq!(complete_rows(&ds, &["Age"]).unwrap(), vec![0, 2, 3]);
        assert_eq!(complete_rows(&ds, &["Age", "Fare"]).unwrap(), vec![0, 3]);
        assert_eq!(complete_rows(&ds, &[]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn group_rows_skips_missing_keys() {
        let ds = sample();
        let groups = group_rows(&ds, "Survived", &[0, 1, 2, 3]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Value::Float(0.0)], vec![0]);
        assert_eq!(groups[&Value::Float(1.0)], vec![1, 2]);
    }

    #[test]
    fn pairs_need_both_coordinates() {
        let ds = sample();
        let pairs = numeric_pairs_at(&ds, "Age", "Fare", &[0, 1, 2, 3]).unwrap();
        assert_eq!(pairs, vec![(22.0, 7.25), (4.0, 16.7)]);
        assert_eq!(numeric_at(&ds, "Age", &[1, 2]).unwrap(), vec![35.0]);
    }

    #[test]
    fn unknown_column_is_reported() {
        let ds = sample();
        assert!(matches!(
            complete_rows(&ds, &["Pclass"]),
            Err(DataError::MissingColumn(name)) if name == "Pclass"
        ));
    }
}
