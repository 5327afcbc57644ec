use crate::record::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Rendering of date and datetime cells in the output record.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Rendering of time-only cells in the output record.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Types of cell data in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references, resolved to text while loading
    SharedString,
    /// Error values (`#DIV/0!`, `#N/A`, ...)
    Error,
}

impl CellType {
    /// Maps built-in number format IDs to date/time cell types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses a custom number format code for date/time tokens.
    /// Quoted literals, escapes and bracketed sections (colors, locales) are skipped.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, _, false) => Self::NumberDateTime1900,
            (true, _, true) => Self::NumberDateTime1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A single populated cell with its 0-based position, type and raw payload.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell payload as stored in the sheet (shared strings already resolved)
    pub(crate) value: String,
}

impl Cell {
    /// Converts the payload into a JSON-compatible value.
    ///
    /// Dates and times become fixed-format strings. Error cells and numeric
    /// payloads that do not parse become NaN, the missing-value marker that
    /// the normalizer later turns into `null`.
    pub(crate) fn to_value(&self) -> Value {
        match self.kind {
            CellType::Empty => Value::Null,
            CellType::Boolean => Value::Bool(self.value == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => match self.value.trim().parse::<f64>() {
                Ok(number) => Value::from_number(number),
                Err(_) => Value::Float(f64::NAN),
            },
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                let is_1904 = self.kind == CellType::NumberDateTime1904;
                match serial_to_datetime(&self.value, is_1904) {
                    // Pure time fractions under a date format are still times of day
                    Some(datetime) if is_time_fraction(&self.value) => Value::Text(datetime.format(TIME_FORMAT).to_string()),
                    Some(datetime) => Value::Text(datetime.format(DATETIME_FORMAT).to_string()),
                    None => Value::Float(f64::NAN),
                }
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                match serial_to_datetime(&self.value, self.kind == CellType::NumberTime1904) {
                    Some(datetime) => Value::Text(datetime.format(TIME_FORMAT).to_string()),
                    None => Value::Float(f64::NAN),
                }
            }
            CellType::IsoDateTime => Value::Text(iso_to_datetime_string(&self.value)),
            CellType::InlineString | CellType::SharedString if self.value.is_empty() => Value::Null,
            CellType::InlineString | CellType::SharedString => Value::Text(self.value.to_owned()),
            CellType::Error => Value::Float(f64::NAN),
        }
    }
}

/// True for serial values in `[0, 1)`, which carry only a time of day.
fn is_time_fraction(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|serial| (0.0..1.0).contains(&serial) && serial != 0.0)
        .unwrap_or(false)
}

/// First serial after the last day Excel can display.
const MAX_SERIAL: f64 = 2_958_466.0;

/// Converts an Excel serial date number into a datetime.
///
/// The 1900 system counts from 1899-12-30 and includes the Lotus 1-2-3
/// phantom 1900-02-29, so serials below 60 are shifted by one day.
/// The 1904 system counts from 1904-01-01.
/// Serials past 9999-12-31 23:59:59 have no date.
pub(crate) fn serial_to_datetime(value: &str, is_1904: bool) -> Option<NaiveDateTime> {
    let serial = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|serial| serial.is_finite() && (0.0..MAX_SERIAL).contains(serial))?;
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1_462
    } else if days < 60 {
        1
    } else {
        0
    };
    let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(Duration::try_days(days + offset)?)?
        .checked_add_signed(Duration::try_milliseconds(milliseconds)?)
}

/// Normalizes an ISO 8601 cell (`t="d"`) to the fixed datetime rendering.
/// Values that do not parse are kept verbatim.
fn iso_to_datetime_string(value: &str) -> String {
    let parsed = if value.contains('T') {
        NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f").ok()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    };
    parsed
        .map(|datetime| datetime.format(DATETIME_FORMAT).to_string())
        .unwrap_or_else(|| value.to_owned())
}
