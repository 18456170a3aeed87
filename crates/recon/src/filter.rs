use tracing::debug;

use crate::error::ReconError;
use crate::model::{FilteredInput, JournalEntryLine, ReconInput, ReconciliationRow, TrialBalanceLine};

/// Records that belong to a single ICP code.
pub trait IcpScoped {
    fn icp_code(&self) -> &str;
}

impl IcpScoped for TrialBalanceLine {
    fn icp_code(&self) -> &str {
        &self.icp_code
    }
}

impl IcpScoped for JournalEntryLine {
    fn icp_code(&self) -> &str {
        &self.icp_code
    }
}

impl IcpScoped for ReconciliationRow {
    fn icp_code(&self) -> &str {
        &self.icp_code
    }
}

/// Canonical ICP code: trimmed and upper-cased.
pub fn normalize_icp(code: &str) -> String {
    code.trim().to_uppercase()
}

fn icp_matches(candidate: &str, normalized: &str) -> bool {
    normalize_icp(candidate) == normalized
}

/// Records whose ICP code equals `icp_code`, in input order.
pub fn filter_by_icp<T: IcpScoped + Clone>(records: &[T], icp_code: &str) -> Vec<T> {
    let wanted = normalize_icp(icp_code);
    records
        .iter()
        .filter(|r| icp_matches(r.icp_code(), &wanted))
        .cloned()
        .collect()
}

/// Scope both inputs to one ICP code.
///
/// Fails with `NoMatch` when the code is blank or has no trial balance
/// lines. An empty entry set is allowed.
pub fn apply_icp_filter(input: &ReconInput, icp_code: &str) -> Result<FilteredInput, ReconError> {
    let icp = normalize_icp(icp_code);
    if icp.is_empty() {
        return Err(ReconError::NoMatch { icp_code: icp });
    }

    let trial_balance = filter_by_icp(&input.trial_balance, &icp);
    if trial_balance.is_empty() {
        return Err(ReconError::NoMatch { icp_code: icp });
    }
    let entries = filter_by_icp(&input.entries, &icp);

    debug!(
        icp = %icp,
        trial_balance = trial_balance.len(),
        entries = entries.len(),
        "applied ICP filter"
    );

    Ok(FilteredInput {
        icp_code: icp,
        trial_balance,
        entries,
    })
}
