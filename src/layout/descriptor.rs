use crate::layout::range::Range;
use crate::layout::range::RangeError;
use crate::spreadsheet::SheetRef;
use std::fmt::Display;
use std::fmt::Formatter;

/// Where a region takes its column names from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Header {
    /// No header row; the descriptor supplies the names.
    None,
    /// The k-th row after the skipped rows holds the names.
    Row(usize),
}

/// How many data rows a region spans.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowLimit {
    /// At most `n` rows, fewer when the sheet ends sooner.
    Rows(usize),
    /// Every row up to the last populated one.
    All,
}

/// Static description of one rectangular region of the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// Sheet holding the region
    pub sheet: SheetRef,
    /// Column range (`"E:F"`), cell range (`"L11:M11"`) or `""` for the used width
    pub range: &'static str,
    /// Rows skipped before the header or the first data row
    pub skip: usize,
    pub header: Header,
    pub limit: RowLimit,
    /// Column names for regions without a header row, one per column
    pub names: &'static [&'static str],
}

impl RegionDescriptor {
    /// Parses the range string of this descriptor.
    pub fn range(&self) -> Result<Range, RangeError> {
        Range::try_from(self.range)
    }
}

impl Display for RegionDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.range.is_empty() {
            write!(f, "{}", self.sheet)
        } else {
            write!(f, "{}!{}", self.sheet, self.range)
        }
    }
}
