// Excel file import (xlsx, xlsm, xls, xlsb, ods) and reconciliation export (xlsx only)
//
// Import: first row of the selected sheet is the header; everything below
//         becomes loosely typed cells for the engine's loader.
// Export: one reconciliation sheet plus optional summary and entry detail
//         sheets, written to an in-memory buffer.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use icp_recon::config::{OutputConfig, ENTRIES_SHEET, SUMMARY_SHEET};
use icp_recon::model::JournalEntryLine;
use icp_recon::{RawCell, RawTable, ReconError, ReconResult, Role};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::xlsx_styles;

// ============================================================================
// Import
// ============================================================================

/// Read one worksheet from workbook bytes. `sheet` selects by name
/// (case-insensitive); the first sheet is used when it is None.
pub fn read_table(bytes: &[u8], sheet: Option<&str>, role: Role) -> Result<RawTable, ReconError> {
    let read_err = |detail: String| ReconError::Read { role, detail };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| read_err(format!("failed to open workbook: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(wanted.trim()))
            .cloned()
            .ok_or_else(|| {
                read_err(format!(
                    "sheet '{wanted}' not found (available: {})",
                    sheet_names.join(", ")
                ))
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| read_err("workbook contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| read_err(format!("failed to read sheet '{sheet_name}': {e}")))?;

    // Range start offset (data may not begin at A1)
    let (start_row, _) = range.start().unwrap_or((0, 0));

    let mut rows = range.rows().enumerate();
    let (header_idx, headers) = loop {
        match rows.next() {
            Some((idx, row)) if row.iter().any(|c| !matches!(c, Data::Empty)) => {
                let headers: Vec<String> = row.iter().map(|c| to_raw_cell(c).as_text()).collect();
                break (idx, headers);
            }
            Some(_) => continue,
            None => return Err(read_err(format!("sheet '{sheet_name}' has no header row"))),
        }
    };

    let data: Vec<Vec<RawCell>> = rows
        .map(|(_, row)| row.iter().map(to_raw_cell).collect())
        .collect();

    debug!(%role, sheet = %sheet_name, rows = data.len(), "read worksheet");

    Ok(RawTable {
        headers,
        rows: data,
        first_data_row: start_row as usize + header_idx + 2,
    })
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.clone())
            }
        }
        Data::Float(n) => RawCell::Number(*n),
        Data::Int(n) => RawCell::Int(*n),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::DateSerial(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        // Keep the error text so a broken formula surfaces as a parse failure
        Data::Error(e) => RawCell::Text(format!("#{e:?}")),
    }
}

// ============================================================================
// Export
// ============================================================================

const RECON_HEADERS: [(&str, f64); 8] = [
    ("Account Code", 14.0),
    ("ICP Code", 10.0),
    ("Description", 36.0),
    ("Trial Balance", 16.0),
    ("Entries Total", 16.0),
    ("Variance", 16.0),
    ("Entries", 9.0),
    ("Status", 20.0),
];

const ENTRY_HEADERS: [(&str, f64); 7] = [
    ("Account Code", 14.0),
    ("ICP Code", 10.0),
    ("Entry ID", 16.0),
    ("Date", 12.0),
    ("Description", 36.0),
    ("Amount", 16.0),
    ("Source Row", 11.0),
];

fn write_err(e: XlsxError) -> ReconError {
    ReconError::Write(e.to_string())
}

fn to_number(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

/// Serialize a reconciliation result to xlsx bytes.
///
/// Nothing is returned unless the whole workbook serializes.
pub fn write_workbook(result: &ReconResult, output: &OutputConfig) -> Result<Vec<u8>, ReconError> {
    let mut workbook = Workbook::new();
    workbook.set_properties(&doc_properties(result)?);

    write_reconciliation_sheet(workbook.add_worksheet(), &output.sheet_name, result)?;
    if output.include_summary_sheet {
        write_summary_sheet(workbook.add_worksheet(), result)?;
    }
    if output.include_entries_sheet {
        write_entries_sheet(workbook.add_worksheet(), &result.entries)?;
    }

    let bytes = workbook.save_to_buffer().map_err(write_err)?;
    debug!(bytes = bytes.len(), rows = result.rows.len(), "wrote reconciliation workbook");
    Ok(bytes)
}

/// Document metadata. The creation date is pinned so identical inputs
/// produce identical bytes.
fn doc_properties(result: &ReconResult) -> Result<DocProperties, ReconError> {
    let created = ExcelDateTime::from_ymd(2000, 1, 1).map_err(write_err)?;
    Ok(DocProperties::new()
        .set_title(&result.meta.config_name)
        .set_subject(format!("ICP {}", result.meta.icp_code))
        .set_comment(format!("icp-recon {}", result.meta.engine_version))
        .set_creation_datetime(&created))
}

fn write_headers(worksheet: &mut Worksheet, headers: &[(&str, f64)]) -> Result<(), ReconError> {
    let format = xlsx_styles::header_format();
    for (col, (title, width)) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *title, &format)
            .map_err(write_err)?;
        worksheet.set_column_width(col, *width).map_err(write_err)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(write_err)?;
    Ok(())
}

fn write_reconciliation_sheet(
    worksheet: &mut Worksheet,
    name: &str,
    result: &ReconResult,
) -> Result<(), ReconError> {
    worksheet.set_name(name).map_err(write_err)?;
    write_headers(worksheet, &RECON_HEADERS)?;

    for (i, row) in result.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let status = Some(row.status);
        let text = xlsx_styles::text_format(status);
        let amount = xlsx_styles::amount_format(status);

        worksheet
            .write_string_with_format(r, 0, &row.account_code, &text)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(r, 1, &row.icp_code, &text)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(r, 2, &row.description, &text)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 3, to_number(row.trial_balance_amount), &amount)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 4, to_number(row.entries_total), &amount)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 5, to_number(row.variance), &amount)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 6, row.entry_count as f64, &text)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(r, 7, row.status.label(), &xlsx_styles::status_format(row.status))
            .map_err(write_err)?;
    }

    let last_row = result.rows.len().max(1) as u32;
    worksheet
        .autofilter(0, 0, last_row, (RECON_HEADERS.len() - 1) as u16)
        .map_err(write_err)?;
    worksheet.set_active(true);
    Ok(())
}

fn write_summary_sheet(worksheet: &mut Worksheet, result: &ReconResult) -> Result<(), ReconError> {
    worksheet.set_name(SUMMARY_SHEET).map_err(write_err)?;
    worksheet.set_column_width(0, 24.0).map_err(write_err)?;
    worksheet.set_column_width(1, 24.0).map_err(write_err)?;

    let label = xlsx_styles::label_format();
    let amount = xlsx_styles::amount_format(None);
    let plain = Format::new();
    let meta = &result.meta;
    let s = &result.summary;

    let text_rows = [
        ("Reconciliation", meta.config_name.clone()),
        ("ICP code", meta.icp_code.clone()),
        ("Engine version", meta.engine_version.clone()),
    ];
    let count_rows = [
        ("Trial balance lines", meta.trial_balance_lines),
        ("Entry lines", meta.entry_lines),
        ("Accounts", s.total_rows),
        ("Matched", s.matched),
        ("Variance", s.variances),
        ("Trial balance only", s.trial_balance_only),
        ("Entries only", s.entries_only),
    ];
    let amount_rows = [
        ("Tolerance", meta.tolerance),
        ("Trial balance total", s.trial_balance_total),
        ("Entries total", s.entries_total),
        ("Net variance", s.net_variance),
    ];

    let mut r: u32 = 0;
    for (title, value) in &text_rows {
        worksheet.write_string_with_format(r, 0, *title, &label).map_err(write_err)?;
        worksheet.write_string_with_format(r, 1, value, &plain).map_err(write_err)?;
        r += 1;
    }
    for (title, value) in &count_rows {
        worksheet.write_string_with_format(r, 0, *title, &label).map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 1, *value as f64, &plain)
            .map_err(write_err)?;
        r += 1;
    }
    for (title, value) in &amount_rows {
        worksheet.write_string_with_format(r, 0, *title, &label).map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 1, to_number(*value), &amount)
            .map_err(write_err)?;
        r += 1;
    }
    Ok(())
}

fn write_entries_sheet(worksheet: &mut Worksheet, entries: &[JournalEntryLine]) -> Result<(), ReconError> {
    worksheet.set_name(ENTRIES_SHEET).map_err(write_err)?;
    write_headers(worksheet, &ENTRY_HEADERS)?;

    let mut sorted: Vec<&JournalEntryLine> = entries.iter().collect();
    sorted.sort_by(|a, b| a.account_code.cmp(&b.account_code).then(a.row.cmp(&b.row)));

    let plain = Format::new();
    let amount = xlsx_styles::amount_format(None);
    let date = xlsx_styles::date_format();

    for (i, line) in sorted.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string_with_format(r, 0, &line.account_code, &plain)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(r, 1, &line.icp_code, &plain)
            .map_err(write_err)?;
        worksheet
            .write_string_with_format(r, 2, &line.entry_id, &plain)
            .map_err(write_err)?;
        if let Some(d) = line.date {
            let dt = excel_date(d)?;
            worksheet
                .write_datetime_with_format(r, 3, &dt, &date)
                .map_err(write_err)?;
        }
        worksheet
            .write_string_with_format(r, 4, &line.description, &plain)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 5, to_number(line.amount), &amount)
            .map_err(write_err)?;
        worksheet
            .write_number_with_format(r, 6, line.row as f64, &plain)
            .map_err(write_err)?;
    }

    if !sorted.is_empty() {
        worksheet
            .autofilter(0, 0, sorted.len() as u32, (ENTRY_HEADERS.len() - 1) as u16)
            .map_err(write_err)?;
    }
    Ok(())
}

fn excel_date(date: chrono::NaiveDate) -> Result<ExcelDateTime, ReconError> {
    use chrono::Datelike;
    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Xlsx;
    use icp_recon::model::{ReconMeta, ReconSummary, ReconciliationRow};
    use icp_recon::MatchStatus;
    use rust_decimal_macros::dec;

    fn build_xlsx(sheet_name: &str, rows: &[Vec<RawCell>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(sheet_name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    RawCell::Text(s) => {
                        ws.write_string(r, c, s).unwrap();
                    }
                    RawCell::Number(n) => {
                        ws.write_number(r, c, *n).unwrap();
                    }
                    _ => {}
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn t(s: &str) -> RawCell {
        RawCell::Text(s.into())
    }

    fn sample_result() -> ReconResult {
        let row = |account: &str, tb, je, status| ReconciliationRow {
            account_code: account.into(),
            icp_code: "ABC".into(),
            description: "desc".into(),
            trial_balance_amount: tb,
            entries_total: je,
            variance: tb - je,
            entry_count: 1,
            status,
        };
        ReconResult {
            meta: ReconMeta {
                config_name: "Test".into(),
                icp_code: "ABC".into(),
                tolerance: dec!(0),
                engine_version: "0.0.0".into(),
                trial_balance_lines: 2,
                entry_lines: 1,
            },
            summary: ReconSummary::default(),
            rows: vec![
                row("4000", dec!(100.00), dec!(100.00), MatchStatus::Matched),
                row("5000", dec!(20.00), dec!(0), MatchStatus::TrialBalanceOnly),
            ],
            entries: vec![JournalEntryLine {
                row: 2,
                account_code: "4000".into(),
                icp_code: "ABC".into(),
                entry_id: "JE-1".into(),
                description: String::new(),
                amount: dec!(100.00),
                date: chrono::NaiveDate::from_ymd_opt(2026, 1, 15),
            }],
        }
    }

    #[test]
    fn read_first_sheet_with_numeric_cells() {
        let bytes = build_xlsx(
            "TB",
            &[
                vec![t("Account Code"), t("ICP Code"), t("Balance Amount")],
                vec![RawCell::Number(4000.0), t("ABC"), RawCell::Number(100.1)],
            ],
        );
        let table = read_table(&bytes, None, Role::TrialBalance).unwrap();
        assert_eq!(table.headers, vec!["Account Code", "ICP Code", "Balance Amount"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0].as_text(), "4000");
        assert_eq!(table.rows[0][2], RawCell::Number(100.1));
        assert_eq!(table.first_data_row, 2);
    }

    #[test]
    fn header_below_blank_rows_keeps_sheet_row_numbers() {
        let bytes = build_xlsx(
            "Sheet1",
            &[
                vec![],
                vec![],
                vec![t("account_code"), t("icp_code"), t("amount")],
                vec![t("4000"), t("ABC"), t("1")],
            ],
        );
        let table = read_table(&bytes, None, Role::Entries).unwrap();
        assert_eq!(table.headers[0], "account_code");
        // Header on sheet row 3, first data row on sheet row 4
        assert_eq!(table.sheet_row(0), 4);
    }

    #[test]
    fn select_sheet_by_name() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Cover").unwrap().write_string(0, 0, "ignore me").unwrap();
        let ws = workbook.add_worksheet().set_name("Data").unwrap();
        ws.write_string(0, 0, "account_code").unwrap();
        ws.write_string(1, 0, "4000").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = read_table(&bytes, Some("data"), Role::Entries).unwrap();
        assert_eq!(table.headers, vec!["account_code"]);

        let err = read_table(&bytes, Some("Missing"), Role::Entries).unwrap_err();
        assert!(err.to_string().contains("sheet 'Missing' not found"));
    }

    #[test]
    fn garbage_bytes_are_read_error() {
        let err = read_table(b"PK\x03\x04not really a zip", None, Role::TrialBalance).unwrap_err();
        assert!(matches!(err, ReconError::Read { role: Role::TrialBalance, .. }));
    }

    #[test]
    fn export_has_expected_sheets_and_cells() {
        let bytes = write_workbook(&sample_result(), &OutputConfig::default()).unwrap();

        let mut wb: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Reconciliation", "Summary", "Entries"]);

        let range = wb.worksheet_range("Reconciliation").unwrap();
        assert_eq!(range.get_size(), (3, 8));
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("Account Code".into())));
        assert_eq!(range.get_value((1, 3)), Some(&Data::Float(100.0)));
        assert_eq!(range.get_value((2, 7)), Some(&Data::String("Trial balance only".into())));

        let summary = wb.worksheet_range("Summary").unwrap();
        assert_eq!(summary.get_value((1, 1)), Some(&Data::String("ABC".into())));

        let entries = wb.worksheet_range("Entries").unwrap();
        assert_eq!(entries.get_value((1, 2)), Some(&Data::String("JE-1".into())));
    }

    #[test]
    fn optional_sheets_can_be_disabled() {
        let output = OutputConfig {
            sheet_name: "Recon".into(),
            include_summary_sheet: false,
            include_entries_sheet: false,
        };
        let bytes = write_workbook(&sample_result(), &output).unwrap();
        let wb: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Recon"]);
    }

    #[test]
    fn identical_results_give_identical_bytes() {
        let a = write_workbook(&sample_result(), &OutputConfig::default()).unwrap();
        let b = write_workbook(&sample_result(), &OutputConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
