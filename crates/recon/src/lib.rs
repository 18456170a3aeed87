//! `icp-recon` — Trial balance vs. journal entry reconciliation engine.
//!
//! Pure engine crate: receives pre-decoded tables, returns classified rows.
//! No file or workbook format dependencies; see `icp-recon-io` for those.

pub mod aggregate;
pub mod amount;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod filter;
pub mod load;
pub mod matcher;
pub mod model;
pub mod table;

pub use config::ReconConfig;
pub use engine::run;
pub use error::{ErrorKind, ReconError};
pub use model::{MatchStatus, ReconInput, ReconResult, ReconciliationRow, Role};
pub use table::{RawCell, RawTable};
