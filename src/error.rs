use thiserror::Error;

use crate::data::model::DType;

/// Lookup and shape errors raised by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' has dtype {dtype}, expected a numeric column")]
    NotNumeric { column: String, dtype: DType },

    #[error("column '{column}' has {found} values but the table has {expected} rows")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
}
