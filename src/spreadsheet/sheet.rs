use crate::spreadsheet::cell::Cell;
use std::collections::HashMap;

/// A loaded worksheet: its populated cells plus the bounds they span.
#[derive(Debug)]
pub struct Sheet {
    /// Sheet name as declared in the workbook
    pub(crate) name: String,
    /// All populated cells, in document order
    pub(crate) cells: Vec<Cell>,
    /// Index mapping from (row, col) to position in `cells`
    indexes: HashMap<(usize, usize), usize>,
    /// Actual data range (determined from cell data)
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            indexes: HashMap::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Sheet name as declared in the workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the sheet contains no populated cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the bounds; a later cell at the same position replaces the earlier one.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.row_upper_bound = self.row_upper_bound.max(Some(cell.row));
        self.col_upper_bound = self.col_upper_bound.max(Some(cell.col));
        match self.indexes.get(&(cell.row, cell.col)) {
            Some(index) => self.cells[*index] = cell,
            None => {
                self.indexes.insert((cell.row, cell.col), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Gets the cell at a 0-based position, `None` for blank positions.
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.indexes.get(&(row, col)).and_then(|index| self.cells.get(*index))
    }
}
