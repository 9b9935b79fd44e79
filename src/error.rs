use thiserror::Error;

/// Fatal setup errors. Per-row inference failures are never reported here.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("subject `{0}` has no rows to evaluate")]
    EmptySubject(String),

    #[error("invalid choice set: {0}")]
    InvalidChoices(String),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("row {row}: expected {expected} fields, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column `{column}` has {found} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
