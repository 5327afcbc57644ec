//! Rectangular region reads over a loaded sheet.
use crate::error::ExtractionError;
use crate::layout::Header;
use crate::layout::RegionDescriptor;
use crate::layout::RowLimit;
use crate::record::Value;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::reference::index_to_col;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::Sheet;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::debug;

/// Rows × named columns read from one region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

/// Name given to a column whose header cell is blank.
pub fn unnamed_column(col: usize) -> String {
    format!("Unnamed: {col}")
}

/// Renders a header or label cell value as a column name; `None` when blank.
pub(crate) fn value_to_name(value: &Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text.to_owned()),
        Value::Int(number) => Some(number.to_string()),
        Value::Float(number) if !number.is_nan() => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Reads a region of `sheet` as described by `descriptor`.
///
/// # Errors
///
/// Returns `RegionRead` when the sheet is empty, when the region starts
/// beyond the populated rows or columns, or when the descriptor does not
/// fit the region (unparsable range, wrong number of column names).
pub fn read_region(sheet: &Sheet, descriptor: &RegionDescriptor) -> Result<RegionTable, ExtractionError> {
    let failure = |message: String| ExtractionError::RegionRead {
        region: descriptor.to_string(),
        message,
    };
    let range = descriptor.range().map_err(|e| failure(e.to_string()))?;
    let (last_row, last_col) = sheet.row_upper_bound
        .zip(sheet.col_upper_bound)
        .ok_or_else(|| failure(format!("sheet '{}' is empty", sheet.name())))?;

    let first_col = range.col_lower_bound.unwrap_or(0);
    let cols = first_col..=range.col_upper_bound.unwrap_or(last_col);
    if first_col > last_col {
        Err(failure(format!(
            "column {} lies beyond the last populated column {}",
            index_to_col(first_col),
            index_to_col(last_col)
        )))?;
    }

    let mut row = descriptor.skip.max(range.row_lower_bound.unwrap_or(0));
    let columns = match descriptor.header {
        Header::Row(offset) => {
            let header_row = row + offset;
            if header_row > last_row {
                Err(failure(format!("header row {} lies beyond the last populated row {}", header_row + 1, last_row + 1)))?;
            }
            row = header_row + 1;
            header_names(sheet, header_row, cols.clone())
        }
        Header::None => {
            if row > last_row {
                Err(failure(format!("row {} lies beyond the last populated row {}", row + 1, last_row + 1)))?;
            }
            if descriptor.names.len() != cols.clone().count() {
                Err(failure(format!("{} column names given for {} columns", descriptor.names.len(), cols.clone().count())))?;
            }
            descriptor.names.iter().map(|name| name.to_string()).collect()
        }
    };

    let mut end = last_row + 1;
    if let RowLimit::Rows(count) = descriptor.limit {
        end = end.min(row + count);
    }
    if let Some(upper) = range.row_upper_bound {
        end = end.min(upper + 1);
    }
    let rows: Vec<Vec<Value>> = (row..end.max(row))
        .map(|index| {
            cols.clone()
                .map(|col| sheet.get(index, col).map(Cell::to_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    debug!(
        region = %descriptor,
        first = %index_to_reference(row, first_col),
        rows = rows.len(),
        columns = columns.len(),
        "read region"
    );
    Ok(RegionTable { columns, rows })
}

/// Column names from a header row: blank cells become `Unnamed: <col>`,
/// repeated names get `.1`, `.2`, … suffixes.
fn header_names(sheet: &Sheet, row: usize, cols: RangeInclusive<usize>) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    cols.map(|col| {
        let name = sheet
            .get(row, col)
            .and_then(|cell| value_to_name(&cell.to_value()))
            .unwrap_or_else(|| unnamed_column(col));
        let unique = unique_name(&name, |candidate| seen.contains(candidate));
        seen.insert(unique.to_owned());
        unique
    })
    .collect()
}

/// Appends the first free `.1`, `.2`, … suffix when `name` is already taken.
pub(crate) fn unique_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut unique = name.to_owned();
    let mut suffix = 0;
    while taken(&unique) {
        suffix += 1;
        unique = format!("{name}.{suffix}");
    }
    unique
}

impl RegionTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes rows in which every value is missing.
    pub fn drop_blank_rows(&mut self) {
        self.rows.retain(|row| !row.iter().all(Value::is_missing));
    }

    /// Removes every column whose name matches `predicate`.
    pub fn drop_columns<F: Fn(&str) -> bool>(&mut self, predicate: F) {
        let keep: Vec<bool> = self.columns.iter().map(|name| !predicate(name)).collect();
        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        }
    }

    /// Renames the column called `from`, if present.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(column) = self.columns.iter_mut().find(|name| name.as_str() == from) {
            *column = to.to_owned();
        }
    }

    /// Converts each row into an ordered column-name → value map.
    pub fn into_records(self) -> Vec<Value> {
        let RegionTable { columns, rows } = self;
        rows.into_iter()
            .map(|row| Value::Map(columns.iter().cloned().zip(row).collect()))
            .collect()
    }
}
