//! CLI Exit Code Registry
//!
//! Single source of truth for `icp-recon` exit codes. Scripts and schedulers
//! branch on these, so treat them as part of the shell contract.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Every account matched within tolerance               |
//! | 1    | Reconciliation ran; variances or one-sided accounts  |
//! | 2    | Usage error (bad arguments, unreadable file)         |
//! | 3    | Invalid configuration                                |
//! | 4    | Input could not be decoded                           |
//! | 5    | Required column missing                              |
//! | 6    | Cell value could not be parsed                       |
//! | 7    | ICP code not present in the trial balance            |
//! | 8    | Duplicate trial balance account                      |
//! | 9    | Output workbook could not be written                 |

use icp_recon::ErrorKind;

/// Success - all accounts reconciled.
pub const EXIT_SUCCESS: u8 = 0;

/// Like `diff(1)`, exit 1 means "the sides differ".
pub const EXIT_RECON_VARIANCES: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

pub const EXIT_RECON_CONFIG: u8 = 3;
pub const EXIT_RECON_READ: u8 = 4;
pub const EXIT_RECON_SCHEMA: u8 = 5;
pub const EXIT_RECON_DATA: u8 = 6;
pub const EXIT_RECON_NO_MATCH: u8 = 7;
pub const EXIT_RECON_DUPLICATE: u8 = 8;

/// Serialization or output file failure.
pub const EXIT_RECON_WRITE: u8 = 9;

/// Map a library error category to its exit code.
pub fn recon_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Config => EXIT_RECON_CONFIG,
        ErrorKind::Read => EXIT_RECON_READ,
        ErrorKind::Schema => EXIT_RECON_SCHEMA,
        ErrorKind::Data => EXIT_RECON_DATA,
        ErrorKind::NoMatch => EXIT_RECON_NO_MATCH,
        ErrorKind::DuplicateKey => EXIT_RECON_DUPLICATE,
        ErrorKind::Write => EXIT_RECON_WRITE,
    }
}
