//! Typed record loading from raw tables: header resolution, key extraction,
//! amount and date parsing.

use tracing::{debug, warn};

use crate::amount::{parse_amount_cell, parse_date_cell};
use crate::config::{EntriesColumns, ReconConfig, TrialBalanceColumns};
use crate::error::ReconError;
use crate::model::{JournalEntryLine, ReconInput, Role, TrialBalanceLine};
use crate::table::{RawCell, RawTable};

/// Normalize a header for comparison: trimmed, lower-case, with runs of
/// spaces, hyphens, dots and underscores collapsed to one `_`.
pub fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut pending_sep = false;
    for c in header.trim().chars() {
        if matches!(c, ' ' | '-' | '_' | '.') || c.is_whitespace() {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.extend(c.to_lowercase());
    }
    out
}

/// Normalized header positions for one table.
struct HeaderIndex<'a> {
    role: Role,
    normalized: Vec<String>,
    raw: &'a [String],
}

impl<'a> HeaderIndex<'a> {
    fn new(role: Role, headers: &'a [String]) -> Self {
        Self {
            role,
            normalized: headers.iter().map(|h| normalize_header(h)).collect(),
            raw: headers,
        }
    }

    /// First alias (in alias order) that matches a header.
    fn find(&self, aliases: &[String]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let want = normalize_header(alias);
            if want.is_empty() {
                return None;
            }
            self.normalized.iter().position(|h| *h == want)
        })
    }

    fn required(&self, column: &str, aliases: &[String]) -> Result<usize, ReconError> {
        self.find(aliases).ok_or_else(|| ReconError::Schema {
            role: self.role,
            column: column.into(),
        })
    }

    fn header_name(&self, idx: usize) -> &str {
        &self.raw[idx]
    }
}

fn cell(row: &[RawCell], idx: usize) -> &RawCell {
    row.get(idx).unwrap_or(&RawCell::Empty)
}

fn text_at(row: &[RawCell], idx: Option<usize>) -> String {
    idx.map(|i| cell(row, i).as_text()).unwrap_or_default()
}

fn row_has_content(row: &[RawCell]) -> bool {
    row.iter().any(|c| !c.is_blank())
}

/// A keyed row must name its account; it is never dropped from the totals.
fn require_account(
    headers: &HeaderIndex<'_>,
    account_idx: usize,
    account_code: &str,
    sheet_row: usize,
) -> Result<(), ReconError> {
    if account_code.is_empty() {
        return Err(ReconError::Data {
            role: headers.role,
            row: sheet_row,
            column: headers.header_name(account_idx).into(),
            value: String::new(),
        });
    }
    Ok(())
}

/// Load Trial Balance lines. Rows with neither an account nor an ICP code
/// are skipped; a row with an ICP code but no account is a `Data` error.
pub fn load_trial_balance(
    table: &RawTable,
    columns: &TrialBalanceColumns,
) -> Result<Vec<TrialBalanceLine>, ReconError> {
    let role = Role::TrialBalance;
    let headers = HeaderIndex::new(role, &table.headers);

    let account_idx = headers.required("account_code", &columns.account_code)?;
    let icp_idx = headers.required("icp_code", &columns.icp_code)?;
    let amount_idx = headers.required("balance_amount", &columns.balance_amount)?;
    let description_idx = headers.find(&columns.description);
    let period_idx = headers.find(&columns.period);

    let mut lines = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        let sheet_row = table.sheet_row(i);
        let account_code = cell(row, account_idx).as_text();
        let icp_code = cell(row, icp_idx).as_text();
        if account_code.is_empty() && icp_code.is_empty() {
            if row_has_content(row) {
                warn!(%role, row = sheet_row, "skipping row without account or ICP code");
            }
            skipped += 1;
            continue;
        }

        let amount_cell = cell(row, amount_idx);
        let balance_amount = parse_amount_cell(amount_cell).ok_or_else(|| ReconError::Data {
            role,
            row: sheet_row,
            column: headers.header_name(amount_idx).into(),
            value: amount_cell.as_text(),
        })?;
        require_account(&headers, account_idx, &account_code, sheet_row)?;

        lines.push(TrialBalanceLine {
            row: sheet_row,
            account_code,
            icp_code,
            description: text_at(row, description_idx),
            period: text_at(row, period_idx),
            balance_amount,
        });
    }

    debug!(%role, lines = lines.len(), skipped, "loaded trial balance");
    Ok(lines)
}

/// Load journal entry lines. Same skipping rule as the trial balance.
pub fn load_entries(
    table: &RawTable,
    columns: &EntriesColumns,
) -> Result<Vec<JournalEntryLine>, ReconError> {
    let role = Role::Entries;
    let headers = HeaderIndex::new(role, &table.headers);

    let account_idx = headers.required("account_code", &columns.account_code)?;
    let icp_idx = headers.required("icp_code", &columns.icp_code)?;
    let amount_idx = headers.required("amount", &columns.amount)?;
    let entry_id_idx = headers.find(&columns.entry_id);
    let description_idx = headers.find(&columns.description);
    let date_idx = headers.find(&columns.date);

    let mut lines = Vec::new();
    let mut skipped = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        let sheet_row = table.sheet_row(i);
        let account_code = cell(row, account_idx).as_text();
        let icp_code = cell(row, icp_idx).as_text();
        if account_code.is_empty() && icp_code.is_empty() {
            if row_has_content(row) {
                warn!(%role, row = sheet_row, "skipping row without account or ICP code");
            }
            skipped += 1;
            continue;
        }

        let amount_cell = cell(row, amount_idx);
        let amount = parse_amount_cell(amount_cell).ok_or_else(|| ReconError::Data {
            role,
            row: sheet_row,
            column: headers.header_name(amount_idx).into(),
            value: amount_cell.as_text(),
        })?;
        require_account(&headers, account_idx, &account_code, sheet_row)?;

        let date = match date_idx {
            Some(di) => {
                let date_cell = cell(row, di);
                parse_date_cell(date_cell).map_err(|_| ReconError::Data {
                    role,
                    row: sheet_row,
                    column: headers.header_name(di).into(),
                    value: date_cell.as_text(),
                })?
            }
            None => None,
        };

        let entry_id = match entry_id_idx {
            Some(ei) => cell(row, ei).as_text(),
            None => String::new(),
        };

        lines.push(JournalEntryLine {
            row: sheet_row,
            account_code,
            icp_code,
            entry_id: if entry_id.is_empty() {
                format!("row {sheet_row}")
            } else {
                entry_id
            },
            description: text_at(row, description_idx),
            amount,
            date,
        });
    }

    debug!(%role, lines = lines.len(), skipped, "loaded entries");
    Ok(lines)
}

/// Load both tables with the configured column aliases.
pub fn load_input(
    config: &ReconConfig,
    trial_balance: &RawTable,
    entries: &RawTable,
) -> Result<ReconInput, ReconError> {
    Ok(ReconInput {
        trial_balance: load_trial_balance(trial_balance, &config.trial_balance.columns)?,
        entries: load_entries(entries, &config.entries.columns)?,
    })
}
