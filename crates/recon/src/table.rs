//! Untyped tabular data as read from a worksheet or CSV file.
//!
//! The io layer decodes bytes into a [`RawTable`]; [`crate::load`] turns it
//! into typed records. Keeping cells loosely typed here lets the loader
//! decide how numbers, dates and text become account codes and amounts.

use chrono::NaiveDate;

/// Days between the Excel 1900 epoch base (1899-12-30) and the Unix epoch.
const EXCEL_EPOCH_OFFSET_DAYS: i64 = 25_569;

/// Serial of 9999-12-31, the last date Excel can represent.
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    /// Excel serial date (1900 date system).
    DateSerial(f64),
}

impl RawCell {
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell rendered as trimmed text. Integral floats print without a
    /// fractional part so a numeric `4000` account cell reads as `"4000"`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => format_number(*n),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Self::DateSerial(serial) => match serial_to_date(*serial) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => format_number(*serial),
            },
        }
    }
}

/// Shortest round-trip rendering of a float, without exponent.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Convert an Excel serial day number to a calendar date. Time-of-day
/// fractions are dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor() as i64 - EXCEL_EPOCH_OFFSET_DAYS;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::TimeDelta::try_days(days)?)
}

/// Header row plus data rows from one worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
    /// 1-based sheet row number of `rows[0]`; used for error messages.
    pub first_data_row: usize,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            headers,
            rows,
            first_data_row: 2,
        }
    }

    /// Build a table from text cells. Blank strings become `Empty`.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|v| {
                        if v.is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::Text(v.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    /// Sheet row number for a data row index.
    pub fn sheet_row(&self, index: usize) -> usize {
        self.first_data_row + index
    }
}
