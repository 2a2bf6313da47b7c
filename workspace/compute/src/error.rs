use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error reading an artifact or dataset from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// A required dataset column is absent
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    /// A dataset row carries an empty site id or name
    #[error("Invalid dataset row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// A dataset date could not be parsed (strict date handling)
    #[error("Invalid date '{value}' at dataset row {row}")]
    InvalidDate { row: usize, value: String },

    /// The site name <-> id lookup is not one-to-one
    #[error("Inconsistent site mapping: {0}")]
    InconsistentSite(String),

    /// The model schema artifact is not an ordered list of unique column names,
    /// or a row does not fit it
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The model artifact is malformed or does not produce one value per pollutant
    #[error("Model mismatch: {0}")]
    ModelMismatch(String),

    /// The site display name does not resolve to a site identifier
    #[error("Station ID missing for site '{0}'")]
    MissingSite(String),

    /// A chart or statistics request that cannot be served
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// Implement From<polars::error::PolarsError> for ComputeError
impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        let compute_error = match error {
            polars::error::PolarsError::NoData(_) => {
                let err = ComputeError::DataFrame(format!("No data: {}", error));
                error!(?err, "DataFrame error: No data");
                err
            }
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ComputeError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::ComputeError(_) => {
                let err = ComputeError::DataFrame(format!("Compute error: {}", error));
                error!(?err, "DataFrame error: Compute error");
                err
            }
            polars::error::PolarsError::IO { .. } => {
                let err = ComputeError::DataFrame(format!("I/O error: {}", error));
                error!(?err, "DataFrame error: I/O");
                err
            }
            _ => {
                let err = ComputeError::Series(format!("Series error: {}", error));
                error!(?err, "Series error");
                err
            }
        };
        compute_error
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(error: serde_json::Error) -> Self {
        ComputeError::ModelMismatch(format!("Malformed model artifact: {}", error))
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
