// icp-recon CLI - reconcile a trial balance against journal entries for one ICP code

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;

use exit_codes::{recon_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "icp-recon")]
#[command(about = "Reconcile trial balance accounts against journal entries for one ICP code")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and write the result workbook (exit 0 = all matched, exit 1 = differences)
    #[command(after_help = "\
Inputs may be xlsx, xlsm, xls, xlsb, ods or delimited text (comma, semicolon,
tab or pipe); the format is detected from the file contents.

Examples:
  icp-recon run --trial-balance tb.xlsx --entries je.xlsx --icp ABC
  icp-recon run --trial-balance tb.csv --entries je.csv --icp ABC --tolerance 0.01
  icp-recon run --trial-balance tb.xlsx --entries je.xlsx --icp ABC -o abc.xlsx --json
  icp-recon run --trial-balance tb.xlsx --entries je.xlsx --icp ABC --config month-end.toml")]
    Run {
        /// Trial balance file
        #[arg(long, value_name = "FILE")]
        trial_balance: PathBuf,

        /// Journal entries file
        #[arg(long, value_name = "FILE")]
        entries: PathBuf,

        /// ICP code to reconcile (case-insensitive)
        #[arg(long, value_name = "CODE", env = "ICP_RECON_ICP")]
        icp: String,

        /// TOML config (column aliases, sheets, tolerance, output layout)
        #[arg(long, short = 'c', value_name = "FILE")]
        config: Option<PathBuf>,

        /// Absolute variance tolerance; overrides the config value
        #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
        tolerance: Option<Decimal>,

        /// Output workbook (default: <ICP>_reconciliation.xlsx)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the reconciliation result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  icp-recon validate month-end.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  icp-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            trial_balance,
            entries,
            icp,
            config,
            tolerance,
            output,
            json,
        } => recon::cmd_run(recon::RunArgs {
            trial_balance,
            entries,
            icp,
            config,
            tolerance,
            output,
            json,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Exit with a code but print nothing beyond what the command already wrote.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<icp_recon::ReconError> for CliError {
    fn from(err: icp_recon::ReconError) -> Self {
        use icp_recon::ErrorKind;

        let kind = err.kind();
        let hint = match kind {
            ErrorKind::Schema => Some("map the header with a [*.columns] alias list in --config".to_string()),
            ErrorKind::NoMatch => Some("check the ICP code column of the trial balance".to_string()),
            ErrorKind::DuplicateKey => {
                Some("each account may appear once per ICP code in the trial balance".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(kind), message: err.to_string(), hint }
    }
}
