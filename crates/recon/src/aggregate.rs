use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{EntryGroup, JournalEntryLine, TrialBalanceLine};

/// Group entries by account code and sum amounts exactly.
///
/// A running total that leaves the decimal range fails with
/// `AmountOverflow` naming the account.
pub fn group_entries(
    entries: &[JournalEntryLine],
    icp_code: &str,
) -> Result<BTreeMap<String, EntryGroup>, ReconError> {
    let mut groups: BTreeMap<String, EntryGroup> = BTreeMap::new();

    for line in entries {
        let group = groups
            .entry(line.account_code.clone())
            .or_insert_with(|| EntryGroup {
                account_code: line.account_code.clone(),
                total: Decimal::ZERO,
                entry_count: 0,
                description: None,
            });
        group.total = group
            .total
            .checked_add(line.amount)
            .ok_or_else(|| ReconError::AmountOverflow {
                icp_code: icp_code.to_string(),
                what: format!("entries total for account '{}'", line.account_code),
            })?;
        group.entry_count += 1;
        if group.description.is_none() && !line.description.is_empty() {
            group.description = Some(line.description.clone());
        }
    }

    Ok(groups)
}

/// Index trial balance lines by account code.
///
/// Lines are expected to be scoped to one ICP code already. A repeated
/// account is ambiguous and fails with `DuplicateKey` naming the first
/// duplicated account (in account order) and every row it appears on.
pub fn index_trial_balance(
    lines: &[TrialBalanceLine],
    icp_code: &str,
) -> Result<BTreeMap<String, TrialBalanceLine>, ReconError> {
    let mut rows_by_account: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for line in lines {
        rows_by_account
            .entry(line.account_code.as_str())
            .or_default()
            .push(line.row);
    }

    if let Some((account, rows)) = rows_by_account.iter().find(|(_, rows)| rows.len() > 1) {
        return Err(ReconError::DuplicateKey {
            account_code: account.to_string(),
            icp_code: icp_code.to_string(),
            rows: rows.clone(),
        });
    }

    Ok(lines
        .iter()
        .map(|line| (line.account_code.clone(), line.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn je(account: &str, amount: Decimal, id: &str, desc: &str) -> JournalEntryLine {
        JournalEntryLine {
            row: 2,
            account_code: account.into(),
            icp_code: "ABC".into(),
            entry_id: id.into(),
            description: desc.into(),
            amount,
            date: None,
        }
    }

    fn tb(account: &str, row: usize) -> TrialBalanceLine {
        TrialBalanceLine {
            row,
            account_code: account.into(),
            icp_code: "ABC".into(),
            description: String::new(),
            period: String::new(),
            balance_amount: dec!(1),
        }
    }

    #[test]
    fn basic_grouping() {
        let entries = vec![
            je("4000", dec!(60.00), "JE-1", ""),
            je("5000", dec!(-5), "JE-2", "fees"),
            je("4000", dec!(40.00), "JE-3", "sales"),
        ];
        let groups = group_entries(&entries, "ABC").unwrap();
        assert_eq!(groups.len(), 2);

        let g = &groups["4000"];
        assert_eq!(g.total, dec!(100.00));
        assert_eq!(g.entry_count, 2);
        assert_eq!(g.description.as_deref(), Some("sales"));

        assert_eq!(groups["5000"].total, dec!(-5));
    }

    #[test]
    fn sums_are_exact() {
        // 0.1 + 0.2 drifts in binary floating point; decimals must not
        let entries = vec![je("1", dec!(0.1), "a", ""), je("1", dec!(0.2), "b", "")];
        let groups = group_entries(&entries, "ABC").unwrap();
        assert_eq!(groups["1"].total, dec!(0.3));
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let entries = vec![
            je("4000", Decimal::MAX, "JE-1", ""),
            je("4000", Decimal::MAX, "JE-2", ""),
        ];
        let err = group_entries(&entries, "ABC").unwrap_err();
        match err {
            ReconError::AmountOverflow { icp_code, what } => {
                assert_eq!(icp_code, "ABC");
                assert!(what.contains("'4000'"));
            }
            other => panic!("expected AmountOverflow, got {other:?}"),
        }
    }

    #[test]
    fn unique_accounts_index() {
        let idx = index_trial_balance(&[tb("5000", 2), tb("4000", 3)], "ABC").unwrap();
        let keys: Vec<_> = idx.keys().cloned().collect();
        assert_eq!(keys, vec!["4000", "5000"]);
    }

    #[test]
    fn duplicate_account_rejected() {
        let err = index_trial_balance(&[tb("4000", 2), tb("5000", 3), tb("4000", 7)], "ABC")
            .unwrap_err();
        match err {
            ReconError::DuplicateKey { account_code, icp_code, rows } => {
                assert_eq!(account_code, "4000");
                assert_eq!(icp_code, "ABC");
                assert_eq!(rows, vec![2, 7]);
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }
}
