//! Error types.
//!
//! Two layers:
//! - [`ForecastError`]: typed pipeline failures (schema, data quality, fitting)
//! - [`AppError`]: what the binary reports (message + process exit code)
//!
//! Every pipeline error converts into an `AppError` carrying a remediation hint,
//! so front-ends never have to format errors themselves.

use thiserror::Error;

use crate::domain::ForecastMethod;
use crate::schema::{DATE_COLUMN_CANDIDATES, VALUE_COLUMN_CANDIDATES};
use crate::series::ACCEPTED_DATE_FORMATS;

/// No recognizable date or value column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("No date column found. Searched: {}", quote_list(DATE_COLUMN_CANDIDATES))]
    NoDateColumn,
    #[error("No sales/quantity column found. Searched: {}", quote_list(VALUE_COLUMN_CANDIDATES))]
    NoValueColumn,
}

/// Failures of the load → aggregate → forecast pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("No row has a parseable date ({rows_read} row(s) read).")]
    EmptyAfterParse { rows_read: usize },

    #[error("Line {line}: column `{column}` has non-numeric value '{value}'.")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("{method} needs at least {required} weekly points, got {actual}.")]
    InsufficientHistory {
        method: ForecastMethod,
        required: usize,
        actual: usize,
    },

    #[error("{method} fit failed: {reason}")]
    ModelFit { method: ForecastMethod, reason: String },

    #[error("Forecast horizon must be > 0.")]
    InvalidHorizon,
}

impl ForecastError {
    /// Actionable remediation text shown under the error message.
    pub fn hint(&self) -> String {
        match self {
            ForecastError::Schema(_) => format!(
                "Tip: make sure the CSV has a date column (e.g. {}) and a sales column (e.g. {}).",
                quote_list(&DATE_COLUMN_CANDIDATES[..2]),
                quote_list(&VALUE_COLUMN_CANDIDATES[..2]),
            ),
            ForecastError::EmptyAfterParse { .. } => format!(
                "Tip: dates must look like one of: {}.",
                ACCEPTED_DATE_FORMATS.join(", ")
            ),
            ForecastError::InvalidValue { .. } => {
                "Tip: the sales column must contain plain numbers (no currency symbols or text).".to_string()
            }
            ForecastError::InsufficientHistory { required, .. } => format!(
                "Tip: upload at least {required} weeks of sales history, or choose `--method linear`."
            ),
            ForecastError::ModelFit { .. } => {
                "Tip: check that the history has at least 2 weeks of varied sales, or choose `--method linear`."
                    .to_string()
            }
            ForecastError::InvalidHorizon => "Tip: request at least one future week.".to_string(),
        }
    }

    /// Exit code used by the binary: 2 = input/schema, 3 = data, 4 = fitting.
    pub fn exit_code(&self) -> u8 {
        match self {
            ForecastError::Schema(_) | ForecastError::InvalidHorizon => 2,
            ForecastError::EmptyAfterParse { .. }
            | ForecastError::InvalidValue { .. }
            | ForecastError::InsufficientHistory { .. } => 3,
            ForecastError::ModelFit { .. } => 4,
        }
    }
}

fn quote_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        AppError::new(err.exit_code(), format!("Error processing file: {err}\n{}", err.hint()))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
