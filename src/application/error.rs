// Errors raised while loading and aggregating cycler logs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("row {row}: field `{field}` {reason}")]
    InputSchema {
        row: usize,
        field: String,
        reason: String,
    },
    #[error("unknown log: {0}")]
    LogNotFound(String),
    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("aggregation worker failed: {0}")]
    Worker(String),
}

impl AnalysisError {
    pub fn input_schema(row: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputSchema {
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }
}
