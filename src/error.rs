use crate::spreadsheet::SheetRef;
use crate::spreadsheet::SpreadsheetError;
use thiserror::Error;

/// Errors surfaced by extraction and by the persisted record.
///
/// `WorkbookOpen`, a missing primary sheet and a failed basic-info read abort
/// an extraction. Everything else is confined to the section it occurred in.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to open workbook '{path}': {source}")]
    WorkbookOpen {
        path: String,
        #[source]
        source: SpreadsheetError,
    },

    #[error("Sheet {0} not found")]
    SheetNotFound(SheetRef),

    #[error("Failed to read region {region}: {message}")]
    RegionRead { region: String, message: String },

    #[error("Record is missing section '{0}'")]
    MissingSection(String),

    #[error("Record carries unexpected section '{0}'")]
    UnexpectedSection(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    Spreadsheet(#[source] SpreadsheetError),

    // Standard library errors
    #[error("{0}")]
    Io(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl From<SpreadsheetError> for ExtractionError {
    fn from(error: SpreadsheetError) -> Self {
        match error {
            SpreadsheetError::SheetNotFound(sheet) => ExtractionError::SheetNotFound(sheet),
            other => ExtractionError::Spreadsheet(other),
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ExtractionError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ExtractionError::WithContextError(format!("{}: {}", message, e)))
    }
}
