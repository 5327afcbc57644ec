//! # Workbook Loader
//!
//! Opens Office Open XML workbooks (`.xlsx`, `.xlsm`), resolves sheets by
//! position or name and loads them into sparse cell grids. Cell values are
//! converted to JSON-compatible values here, with dates and times rendered as
//! fixed-format strings.
use std::fmt::Display;
use std::fmt::Formatter;
use thiserror::Error;

pub(crate) mod cell;
mod excel;
pub mod reference;
pub(crate) mod sheet;
mod xlsx;

pub use cell::DATETIME_FORMAT;
pub use cell::TIME_FORMAT;
pub use sheet::Sheet;
pub use xlsx::Workbook;

/// Errors raised while opening a workbook or loading one of its sheets.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Sheet {0} not found")]
    SheetNotFound(SheetRef),

    #[error("Missing package part '{0}'")]
    FileError(String),

    #[error("Workbook '{0}' is password protected or not an Office Open XML file")]
    PasswordProtectedError(String),

    #[error("Workbook '{0}' declares no sheets")]
    SpreadsheetEmptyError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlEscapeError(#[from] quick_xml::escape::EscapeError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),
}

/// Identity of a sheet within a workbook: 0-based position or exact name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetRef {
    Index(usize),
    Name(&'static str),
}

impl Display for SheetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetRef::Index(index) => write!(f, "#{index}"),
            SheetRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}
