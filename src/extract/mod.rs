//! # Extraction
//!
//! Opens a workbook once, runs the section extractors over it and assembles
//! the client record. A section failure only empties that section; opening
//! the workbook, resolving the primary sheet and reading the basic info must
//! succeed for the extraction to succeed.
use crate::error::ExtractionError;
use crate::layout::template;
use crate::layout::RegionDescriptor;
use crate::record;
use crate::record::ClientRecord;
use crate::record::Section;
use crate::region::read_region;
use crate::region::RegionTable;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SheetRef;
use crate::spreadsheet::Workbook;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

mod sections;

/// Workbook plus the sheets loaded from it so far.
pub(crate) struct SheetSource {
    workbook: Workbook,
    sheets: HashMap<String, Sheet>,
}

impl SheetSource {
    fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            sheets: HashMap::new(),
        }
    }

    /// Loads a sheet on first use and keeps it for later regions.
    pub(crate) fn sheet(&mut self, sheet: &SheetRef) -> Result<&Sheet, ExtractionError> {
        let name = self.workbook.resolve(sheet)?.to_owned();
        if !self.sheets.contains_key(&name) {
            let loaded = self.workbook.load_sheet(sheet)?;
            self.sheets.insert(name.to_owned(), loaded);
        }
        self.sheets
            .get(&name)
            .ok_or_else(|| ExtractionError::SheetNotFound(sheet.clone()))
    }

    pub(crate) fn read(&mut self, descriptor: &RegionDescriptor) -> Result<RegionTable, ExtractionError> {
        read_region(self.sheet(&descriptor.sheet)?, descriptor)
    }
}

/// Extracts the client record of one workbook.
///
/// # Errors
///
/// Returns `WorkbookOpen` when the file cannot be opened as a workbook,
/// `SheetNotFound` when it has no primary sheet, and the basic-info failure
/// when that section cannot be read. Other sections degrade to empty lists.
pub fn extract<P: AsRef<Path>>(path: P) -> Result<ClientRecord, ExtractionError> {
    let path = path.as_ref();
    let workbook = Workbook::open(path).map_err(|source| ExtractionError::WorkbookOpen {
        path: path.display().to_string(),
        source,
    })?;
    debug!(workbook = %workbook.name(), sheets = ?workbook.sheet_names(), "extracting");
    let mut source = SheetSource::new(workbook);
    source.sheet(&template::PRIMARY_SHEET)?;

    let mut results = Vec::with_capacity(Section::ALL.len());
    for section in Section::ALL {
        let result = sections::extract_section(&mut source, section);
        if section == Section::BasicInfo {
            results.push((section, Ok(result?)));
        } else {
            results.push((section, result));
        }
    }
    Ok(record::assemble(results))
}
