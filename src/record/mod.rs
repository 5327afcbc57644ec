//! # Client Record
//!
//! The structured output of an extraction: a fixed set of eleven sections,
//! each an ordered list of attribute records. Every section is always present;
//! one whose source could not be read is an empty list.
use crate::error::ExtractionError;
use crate::layout::template;
use serde::Serialize;
use serde::Serializer;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing::warn;

mod section;
mod value;

pub use section::Section;
pub use value::normalize;
pub use value::Value;

/// Row of the basic-info section that holds the customer name.
const CLIENT_NAME_ROW: usize = 1;

/// The assembled, normalized record of one workbook.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientRecord {
    /// `Value::Map` holding every section key in canonical order, each mapped to a `Value::List`
    value: Value,
}

/// Merges per-section extraction results into a record.
///
/// Failed and missing sections become empty lists; the failure is logged with
/// the section, its sheet and the cause. The assembled value is normalized
/// once, so no NaN survives.
pub fn assemble<I>(results: I) -> ClientRecord
where
    I: IntoIterator<Item = (Section, Result<Vec<Value>, ExtractionError>)>,
{
    let mut sections: Vec<(Section, Vec<Value>)> = Vec::new();
    for (section, result) in results {
        let rows = match result {
            Ok(rows) => rows,
            Err(ExtractionError::SheetNotFound(sheet)) => {
                info!(section = %section, sheet = %sheet, "sheet is absent, {} left empty", section.description());
                Vec::new()
            }
            Err(error) => {
                warn!(
                    section = %section,
                    sheet = %template::sheet_of(section),
                    error = %error,
                    "failed to read {} section, left empty",
                    section.description()
                );
                Vec::new()
            }
        };
        match sections.iter_mut().find(|(known, _)| *known == section) {
            Some((_, existing)) => *existing = rows,
            None => sections.push((section, rows)),
        }
    }

    let entries = Section::ALL
        .iter()
        .map(|section| {
            let rows = sections
                .iter_mut()
                .find(|(known, _)| known == section)
                .map(|(_, rows)| std::mem::take(rows))
                .unwrap_or_default();
            (section.key().to_owned(), Value::List(rows))
        })
        .collect();
    ClientRecord {
        value: normalize(Value::Map(entries)),
    }
}

impl ClientRecord {
    /// Rows of one section; empty when the section degraded.
    pub fn section(&self, section: Section) -> &[Value] {
        self.value
            .get(section.key())
            .and_then(Value::as_list)
            .unwrap_or(&[])
    }

    /// The customer name from the basic-info section, when it is text.
    pub fn client_name(&self) -> Option<&str> {
        self.section(Section::BasicInfo)
            .get(CLIENT_NAME_ROW)
            .and_then(|row| row.get(template::VALUE))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Serializes with four-space indentation, keeping non-ASCII text as is.
    pub fn to_json_pretty(&self) -> Result<String, ExtractionError> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        self.value.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| ExtractionError::InvalidRecord(e.to_string()))
    }

    /// Parses a persisted record.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, on a document that is not an object of lists,
    /// and on a key set that differs from the eleven sections.
    pub fn from_json(text: &str) -> Result<ClientRecord, ExtractionError> {
        let entries = match serde_json::from_str::<Value>(text)? {
            Value::Map(entries) => entries,
            _ => Err(ExtractionError::InvalidRecord("expected a JSON object".to_owned()))?,
        };
        if let Some((key, _)) = entries.iter().find(|(key, _)| Section::from_key(key).is_none()) {
            Err(ExtractionError::UnexpectedSection(key.to_owned()))?;
        }

        let mut sections = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            let rows = entries
                .iter()
                .find(|(key, _)| key == section.key())
                .map(|(_, rows)| rows)
                .ok_or_else(|| ExtractionError::MissingSection(section.key().to_owned()))?;
            if rows.as_list().is_none() {
                Err(ExtractionError::InvalidRecord(format!("section '{section}' is not a list")))?;
            }
            sections.push((section.key().to_owned(), rows.clone()));
        }
        Ok(ClientRecord {
            value: Value::Map(sections),
        })
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExtractionError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<ClientRecord, ExtractionError> {
        ClientRecord::from_json(&fs::read_to_string(path)?)
    }
}

impl Serialize for ClientRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
