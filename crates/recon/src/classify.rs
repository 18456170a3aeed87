use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{AccountMatch, AccountSides, MatchStatus, ReconciliationRow};

/// Signed difference between the trial balance and the summed entries.
/// None when the result leaves the decimal range.
pub fn compute_variance(trial_balance_amount: Decimal, entries_total: Decimal) -> Option<Decimal> {
    trial_balance_amount.checked_sub(entries_total)
}

/// Status for an account present on both sides.
pub fn classify_variance(variance: Decimal, tolerance: Decimal) -> MatchStatus {
    if variance.abs() <= tolerance {
        MatchStatus::Matched
    } else {
        MatchStatus::Variance
    }
}

/// Turn account matches into reconciliation rows. Order is preserved.
///
/// Absent sides contribute zero; the status records which side was absent.
pub fn classify_matches(
    matches: &[AccountMatch],
    icp_code: &str,
    tolerance: Decimal,
) -> Result<Vec<ReconciliationRow>, ReconError> {
    let mut rows = Vec::with_capacity(matches.len());

    for m in matches {
        let (trial_balance_amount, entries_total, entry_count, description) = match &m.sides {
            AccountSides::Both(tb, group) => (
                tb.balance_amount,
                group.total,
                group.entry_count,
                if tb.description.is_empty() {
                    group.description.clone().unwrap_or_default()
                } else {
                    tb.description.clone()
                },
            ),
            AccountSides::TrialBalanceOnly(tb) => {
                (tb.balance_amount, Decimal::ZERO, 0, tb.description.clone())
            }
            AccountSides::EntriesOnly(group) => (
                Decimal::ZERO,
                group.total,
                group.entry_count,
                group.description.clone().unwrap_or_default(),
            ),
        };

        let variance = compute_variance(trial_balance_amount, entries_total).ok_or_else(|| {
            ReconError::AmountOverflow {
                icp_code: icp_code.to_string(),
                what: format!("variance for account '{}'", m.account_code),
            }
        })?;
        let status = match &m.sides {
            AccountSides::Both(..) => classify_variance(variance, tolerance),
            AccountSides::TrialBalanceOnly(_) => MatchStatus::TrialBalanceOnly,
            AccountSides::EntriesOnly(_) => MatchStatus::EntriesOnly,
        };

        rows.push(ReconciliationRow {
            account_code: m.account_code.clone(),
            icp_code: icp_code.to_string(),
            description,
            trial_balance_amount,
            entries_total,
            variance,
            entry_count,
            status,
        });
    }

    Ok(rows)
}
