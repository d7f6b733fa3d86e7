use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Column, DType, Dataset, Value};

/// Tokens read as a missing cell, in addition to the empty field.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None", "#N/A",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a CSV file with a header row into a [`Dataset`].
///
/// Every record must carry as many fields as the header; column dtypes are
/// inferred from the non-missing cells once all rows are read.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, field) in record.iter().enumerate() {
            raw[col_idx].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| build_column(name, cells))
        .collect();

    let dataset = Dataset::from_columns(columns).context("assembling table")?;
    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.column_names()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Dtype inference
// ---------------------------------------------------------------------------

fn is_missing(s: &str) -> bool {
    s.is_empty() || NA_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Pick the narrowest dtype every non-missing cell fits.
fn infer_dtype(cells: &[String]) -> DType {
    let present: Vec<&str> = cells
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !is_missing(s))
        .collect();
    let has_missing = present.len() < cells.len();

    if present.is_empty() {
        return DType::Float64;
    }
    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        // Integer columns with holes are promoted to float like Pandas does.
        return if has_missing { DType::Float64 } else { DType::Int64 };
    }
    if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        return DType::Float64;
    }
    if !has_missing && present.iter().all(|s| parse_bool(s).is_some()) {
        return DType::Bool;
    }
    DType::Object
}

fn build_column(name: String, cells: Vec<String>) -> Column {
    let dtype = infer_dtype(&cells);
    let values = cells
        .into_iter()
        .map(|s| {
            if is_missing(&s) {
                return Value::Null;
            }
            match dtype {
                DType::Int64 => s.parse().map(Value::Integer).unwrap_or(Value::Null),
                DType::Float64 => s.trim().parse().map(Value::Float).unwrap_or(Value::Null),
                DType::Bool => parse_bool(&s).map(Value::Bool).unwrap_or(Value::Null),
                DType::Object => Value::String(s),
            }
        })
        .collect();
    Column::new(name, dtype, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn infers_pandas_like_dtypes() {
        let file = write_csv(
            "PassengerId,Survived,Age,Name,Fare,Flag\n\
             1,0,22,\"Braund, Mr. Owen\",7.25,True\n\
             2,1,,Cumings,71.2833,False\n\
             3,1,26,Heikkinen,7.925,true\n",
        );
        let ds = load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("PassengerId").unwrap().dtype, DType::Int64);
        assert_eq!(ds.column("Survived").unwrap().dtype, DType::Int64);
        assert_eq!(ds.column("Age").unwrap().dtype, DType::Float64);
        assert_eq!(ds.column("Name").unwrap().dtype, DType::Object);
        assert_eq!(ds.column("Fare").unwrap().dtype, DType::Float64);
        assert_eq!(ds.column("Flag").unwrap().dtype, DType::Bool);

        let age = ds.column("Age").unwrap();
        assert_eq!(age.values[1], Value::Null);
        assert_eq!(age.values[0], Value::Float(22.0));
        assert_eq!(
            ds.column("Name").unwrap().values[0],
            Value::String("Braund, Mr. Owen".into())
        );
    }

    #[test]
    fn na_tokens_count_as_missing() {
        let file = write_csv("Cabin,Score\nNA,1.5\nC85,NaN\n,2\n");
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.column("Cabin").unwrap().non_null_count(), 1);
        assert_eq!(ds.column("Score").unwrap().dtype, DType::Float64);
        assert_eq!(ds.column("Score").unwrap().non_null_count(), 2);
    }

    #[test]
    fn all_missing_column_is_float() {
        let file = write_csv("a,b\n1,\n2,\n");
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.column("b").unwrap().dtype, DType::Float64);
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_csv(&dir.path().join("train.csv")).is_err());
    }

    #[test]
    fn ragged_record_fails() {
        let file = write_csv("a,b\n1,2\n3\n");
        assert!(load_csv(file.path()).is_err());
    }
}
