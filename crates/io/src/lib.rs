//! Byte-level entry points for ICP reconciliation.
//!
//! Decodes Trial Balance and journal entry files (xlsx, xls, ods or
//! delimited text), runs the engine and serializes the result as xlsx.
//! Everything happens in memory; callers own file access.

pub mod csv;
pub mod input;
pub mod xlsx;
pub mod xlsx_styles;

use icp_recon::load::load_input;
use icp_recon::{ReconConfig, ReconError, ReconResult, Role};
use tracing::debug;

pub use input::{detect_format, read_input, InputFormat};

/// One reconciliation request: two source files and the ICP code to scope to.
#[derive(Debug, Clone, Copy)]
pub struct ReconRequest<'a> {
    pub trial_balance: &'a [u8],
    pub entries: &'a [u8],
    pub icp_code: &'a str,
}

/// Decode both inputs and reconcile them. Returns structured rows; nothing
/// is serialized.
pub fn reconcile(request: &ReconRequest<'_>, config: &ReconConfig) -> Result<ReconResult, ReconError> {
    config.validate()?;

    let tb_table = read_input(
        request.trial_balance,
        Role::TrialBalance,
        config.trial_balance.sheet.as_deref(),
    )?;
    let je_table = read_input(request.entries, Role::Entries, config.entries.sheet.as_deref())?;
    debug!(
        tb_rows = tb_table.rows.len(),
        entry_rows = je_table.rows.len(),
        "decoded inputs"
    );

    let input = load_input(config, &tb_table, &je_table)?;
    icp_recon::run(config, &input, request.icp_code)
}

/// Reconcile and return the xlsx workbook bytes.
pub fn generate_with_config(
    trial_balance: &[u8],
    entries: &[u8],
    icp_code: &str,
    config: &ReconConfig,
) -> Result<Vec<u8>, ReconError> {
    let request = ReconRequest { trial_balance, entries, icp_code };
    let result = reconcile(&request, config)?;
    xlsx::write_workbook(&result, &config.output)
}

/// Reconcile with the default configuration (zero tolerance, standard
/// column aliases) and return the xlsx workbook bytes.
pub fn generate_reconciliation_file(
    trial_balance: &[u8],
    entries: &[u8],
    icp_code: &str,
) -> Result<Vec<u8>, ReconError> {
    generate_with_config(trial_balance, entries, icp_code, &ReconConfig::default())
}
