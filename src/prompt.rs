//! Embedding of a client record into instruction text for narrative generation.
use crate::error::ExtractionError;
use crate::record::ClientRecord;
use std::fs;
use std::path::Path;

pub const START_MARKER: &str = "--- START OF CLIENT JSON DATA ---";
pub const END_MARKER: &str = "--- END OF CLIENT JSON DATA ---";

/// Caller-supplied instruction text that precedes the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    instructions: String,
}

impl PromptTemplate {
    pub fn new<S: Into<String>>(instructions: S) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Appends the record, pretty-printed with two-space indentation, between the data markers.
    pub fn render(&self, record: &ClientRecord) -> Result<String, ExtractionError> {
        let data = serde_json::to_string_pretty(record)?;
        Ok(format!(
            "{}\n\n{START_MARKER}\n{data}\n{END_MARKER}\n",
            self.instructions.trim_end()
        ))
    }
}
