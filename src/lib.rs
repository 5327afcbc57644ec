//! # Credit Sheet
//!
//! Extracts the fixed credit-application workbook template (`.xlsm`, `.xlsx`)
//! into a normalized client record that serializes one-to-one onto JSON.
//!
//! ## Features
//!
//! - **Own OOXML reader**: workbooks are read straight from the ZIP package
//!   with streaming XML parsing, including shared strings and date formats
//! - **Template layout as data**: every region of the template is a named
//!   [`RegionDescriptor`] constant in [`layout::template`]
//! - **Failure isolation**: an unreadable or missing section becomes an
//!   empty list and is logged, while the rest of the record is kept
//! - **Stable output**: the record always carries the same eleven keys, with
//!   every missing value rendered as `null`
//! - **Prompt embedding**: a record can be wrapped into caller-supplied
//!   instruction text between fixed data markers
//!
//! ## Example
//!
//! ```no_run
//! use credit_sheet::{extract, Section};
//!
//! let record = extract("klijent.xlsm")?;
//! println!("{:?}", record.client_name());
//! println!("{} turnover rows", record.section(Section::Turnover).len());
//! # Ok::<(), credit_sheet::ExtractionError>(())
//! ```
mod helpers;

pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod output;
pub mod prompt;
pub mod record;
pub mod region;
pub mod spreadsheet;

pub use config::Config;
pub use error::ExtractionError;
pub use extract::extract;
pub use layout::RegionDescriptor;
pub use output::process_workbook;
pub use output::Artifacts;
pub use prompt::PromptTemplate;
pub use record::ClientRecord;
pub use record::Section;
pub use record::Value;
pub use spreadsheet::SheetRef;
pub use spreadsheet::SpreadsheetError;
