use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::table::{serial_to_date, RawCell};

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse a cell as an exact decimal amount. Blank cells are zero.
///
/// Float cells go through their shortest round-trip text form, so a cell
/// holding `100.1` yields exactly `100.1` rather than the binary expansion.
pub fn parse_amount_cell(cell: &RawCell) -> Option<Decimal> {
    match cell {
        RawCell::Empty => Some(Decimal::ZERO),
        RawCell::Int(n) => Some(Decimal::from(*n)),
        RawCell::Number(n) => {
            if !n.is_finite() {
                return None;
            }
            Decimal::from_str(&format!("{n}")).ok()
        }
        RawCell::Text(s) => {
            if s.trim().is_empty() {
                Some(Decimal::ZERO)
            } else {
                parse_financial_amount(s)
            }
        }
        RawCell::Bool(_) | RawCell::DateSerial(_) => None,
    }
}

/// Parse a financial amount string:
/// - Strip `$`, `€`, `£`, commas, whitespace
/// - Handle `(123.45)` → `-123.45`
/// - Returns None if anything else remains
pub fn parse_financial_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (is_negative, inner) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    for (i, c) in cleaned.chars().enumerate() {
        match c {
            '0'..='9' | '.' => {}
            '-' | '+' if i == 0 && !is_negative => {}
            _ => return None,
        }
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if is_negative { -value } else { value })
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
];

/// Cell content that is present but not a recognizable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDate;

/// Parse an optional date cell. `Ok(None)` for blanks.
pub fn parse_date_cell(cell: &RawCell) -> Result<Option<NaiveDate>, InvalidDate> {
    match cell {
        RawCell::Empty => Ok(None),
        RawCell::DateSerial(serial) | RawCell::Number(serial) => {
            serial_to_date(*serial).map(Some).ok_or(InvalidDate)
        }
        RawCell::Int(serial) => serial_to_date(*serial as f64).map(Some).ok_or(InvalidDate),
        RawCell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            for fmt in DATE_FORMATS {
                if fmt.contains("%H") {
                    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                        return Ok(Some(dt.date()));
                    }
                } else if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                    return Ok(Some(d));
                }
            }
            Err(InvalidDate)
        }
        RawCell::Bool(_) => Err(InvalidDate),
    }
}
