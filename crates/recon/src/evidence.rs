use crate::error::ReconError;
use crate::model::{MatchStatus, ReconSummary, ReconciliationRow};

/// Compute summary statistics from reconciliation rows.
pub fn compute_summary(rows: &[ReconciliationRow], icp_code: &str) -> Result<ReconSummary, ReconError> {
    let overflow = |what: &str| ReconError::AmountOverflow {
        icp_code: icp_code.to_string(),
        what: what.to_string(),
    };

    let mut summary = ReconSummary {
        total_rows: rows.len(),
        ..ReconSummary::default()
    };

    for r in rows {
        match r.status {
            MatchStatus::Matched => summary.matched += 1,
            MatchStatus::Variance => summary.variances += 1,
            MatchStatus::TrialBalanceOnly => summary.trial_balance_only += 1,
            MatchStatus::EntriesOnly => summary.entries_only += 1,
        }

        summary.trial_balance_total = summary
            .trial_balance_total
            .checked_add(r.trial_balance_amount)
            .ok_or_else(|| overflow("trial balance total"))?;
        summary.entries_total = summary
            .entries_total
            .checked_add(r.entries_total)
            .ok_or_else(|| overflow("entries total"))?;
    }

    summary.net_variance = summary
        .trial_balance_total
        .checked_sub(summary.entries_total)
        .ok_or_else(|| overflow("net variance"))?;
    Ok(summary)
}
