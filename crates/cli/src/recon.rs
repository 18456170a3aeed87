//! `icp-recon run` / `icp-recon validate`

use std::path::{Path, PathBuf};

use icp_recon::ReconConfig;
use icp_recon_io::{reconcile, xlsx, ReconRequest};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::exit_codes::{EXIT_RECON_VARIANCES, EXIT_RECON_WRITE};
use crate::CliError;

pub struct RunArgs {
    pub trial_balance: PathBuf,
    pub entries: PathBuf,
    pub icp: String,
    pub config: Option<PathBuf>,
    pub tolerance: Option<Decimal>,
    pub output: Option<PathBuf>,
    pub json: bool,
}

fn write_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_RECON_WRITE, message: msg.into(), hint: None }
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReconConfig::from_toml(&text)?;
    debug!(config = %path.display(), name = %config.name, "loaded config");
    Ok(config)
}

fn read_input_file(path: &Path, what: &str) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|e| {
        CliError::args(format!("cannot read {what} file {}: {e}", path.display()))
            .with_hint(format!("pass the {what} path with --{}", what.replace(' ', "-")))
    })
}

/// `<ICP>_reconciliation.xlsx` with anything unsafe for a file name replaced.
fn default_output(icp_code: &str) -> PathBuf {
    let stem: String = icp_code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    PathBuf::from(format!("{stem}_reconciliation.xlsx"))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance)?;
    }

    let trial_balance = read_input_file(&args.trial_balance, "trial balance")?;
    let entries = read_input_file(&args.entries, "entries")?;

    let request = ReconRequest {
        trial_balance: &trial_balance,
        entries: &entries,
        icp_code: &args.icp,
    };
    let result = reconcile(&request, &config)?;
    let bytes = xlsx::write_workbook(&result, &config.output)?;

    let output = args.output.unwrap_or_else(|| default_output(&result.meta.icp_code));
    std::fs::write(&output, &bytes)
        .map_err(|e| write_err(format!("cannot write {}: {e}", output.display())))?;
    info!(path = %output.display(), bytes = bytes.len(), "wrote workbook");

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| write_err(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    let s = &result.summary;
    eprintln!(
        "ICP {}: {} accounts, {} matched, {} variances, {} trial balance only, {} entries only (net variance {})",
        result.meta.icp_code,
        s.total_rows,
        s.matched,
        s.variances,
        s.trial_balance_only,
        s.entries_only,
        s.net_variance,
    );
    eprintln!("wrote {}", output.display());

    if s.is_clean() {
        Ok(())
    } else {
        Err(CliError::silent(EXIT_RECON_VARIANCES))
    }
}

pub fn cmd_validate(path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&path))?;
    eprintln!(
        "config OK: \"{}\" (tolerance {}, output sheet \"{}\")",
        config.name, config.tolerance.amount, config.output.sheet_name
    );
    Ok(())
}
