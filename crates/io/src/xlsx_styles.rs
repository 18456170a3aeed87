//! Cell formats for the reconciliation workbook.
//!
//! Non-matched rows get a fill per status so reviewers can scan the sheet
//! without filtering; matched rows stay unfilled.

use icp_recon::MatchStatus;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

pub const AMOUNT_FORMAT: &str = "#,##0.00;[Red]-#,##0.00";

const HEADER_FILL: u32 = 0x1F4E78;
const VARIANCE_FILL: u32 = 0xFFC7CE;
const TRIAL_BALANCE_ONLY_FILL: u32 = 0xFFEB9C;
const ENTRIES_ONLY_FILL: u32 = 0xF8CBAD;

/// Fill colour for a status, or None when the row needs no highlight.
pub fn status_fill(status: MatchStatus) -> Option<Color> {
    match status {
        MatchStatus::Matched => None,
        MatchStatus::Variance => Some(Color::RGB(VARIANCE_FILL)),
        MatchStatus::TrialBalanceOnly => Some(Color::RGB(TRIAL_BALANCE_ONLY_FILL)),
        MatchStatus::EntriesOnly => Some(Color::RGB(ENTRIES_ONLY_FILL)),
    }
}

pub fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border_bottom(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

pub fn label_format() -> Format {
    Format::new().set_bold()
}

/// Text cell format for a data row.
pub fn text_format(status: Option<MatchStatus>) -> Format {
    with_fill(Format::new(), status)
}

/// Amount cell format for a data row.
pub fn amount_format(status: Option<MatchStatus>) -> Format {
    with_fill(Format::new().set_num_format(AMOUNT_FORMAT), status)
}

/// Bold status cell so the classification stands out even when unfilled.
pub fn status_format(status: MatchStatus) -> Format {
    let format = Format::new().set_align(FormatAlign::Center);
    let format = if status.is_matched() { format } else { format.set_bold() };
    with_fill(format, Some(status))
}

pub fn date_format() -> Format {
    Format::new().set_num_format("yyyy-mm-dd")
}

fn with_fill(format: Format, status: Option<MatchStatus>) -> Format {
    match status.and_then(status_fill) {
        Some(color) => format.set_background_color(color),
        None => format,
    }
}
