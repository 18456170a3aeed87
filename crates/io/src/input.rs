// Input format dispatch by content, not file name

use icp_recon::{RawTable, ReconError, Role};

use crate::{csv, xlsx};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE2_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// xlsx/xlsm/xlsb/ods (zip container) or legacy xls (OLE2)
    Workbook,
    /// Anything else is treated as delimited text
    Delimited,
}

pub fn detect_format(bytes: &[u8]) -> InputFormat {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE2_MAGIC) {
        InputFormat::Workbook
    } else {
        InputFormat::Delimited
    }
}

/// Decode one input file. `sheet` applies to workbooks only.
pub fn read_input(bytes: &[u8], role: Role, sheet: Option<&str>) -> Result<RawTable, ReconError> {
    match detect_format(bytes) {
        InputFormat::Workbook => xlsx::read_table(bytes, sheet, role),
        InputFormat::Delimited => csv::read_table(bytes, role),
    }
}
