use std::collections::BTreeMap;

use crate::model::{AccountMatch, AccountSides, EntryGroup, TrialBalanceLine};

/// Pair trial balance lines with entry groups by exact account code.
///
/// Emits one match per account in the union of both sides, ascending by
/// account code.
pub fn match_by_account(
    trial_balance: &BTreeMap<String, TrialBalanceLine>,
    entries: &BTreeMap<String, EntryGroup>,
) -> Vec<AccountMatch> {
    let mut accounts: BTreeMap<&str, (Option<&TrialBalanceLine>, Option<&EntryGroup>)> = BTreeMap::new();
    for (account, line) in trial_balance {
        accounts.entry(account.as_str()).or_default().0 = Some(line);
    }
    for (account, group) in entries {
        accounts.entry(account.as_str()).or_default().1 = Some(group);
    }

    accounts
        .into_iter()
        .filter_map(|(account, pair)| {
            let sides = match pair {
                (Some(tb), Some(group)) => AccountSides::Both(tb.clone(), group.clone()),
                (Some(tb), None) => AccountSides::TrialBalanceOnly(tb.clone()),
                (None, Some(group)) => AccountSides::EntriesOnly(group.clone()),
                (None, None) => return None,
            };
            Some(AccountMatch {
                account_code: account.to_string(),
                sides,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tb(account: &str, amount: Decimal) -> (String, TrialBalanceLine) {
        (
            account.into(),
            TrialBalanceLine {
                row: 2,
                account_code: account.into(),
                icp_code: "ABC".into(),
                description: String::new(),
                period: String::new(),
                balance_amount: amount,
            },
        )
    }

    fn group(account: &str, total: Decimal) -> (String, EntryGroup) {
        (
            account.into(),
            EntryGroup {
                account_code: account.into(),
                total,
                entry_count: 1,
                description: None,
            },
        )
    }

    #[test]
    fn union_of_accounts_sorted() {
        let tb_map = BTreeMap::from([tb("4000", dec!(100)), tb("6000", dec!(5))]);
        let je_map = BTreeMap::from([group("4000", dec!(100)), group("1000", dec!(3))]);

        let out = match_by_account(&tb_map, &je_map);
        let accounts: Vec<&str> = out.iter().map(|m| m.account_code.as_str()).collect();
        assert_eq!(accounts, vec!["1000", "4000", "6000"]);

        assert!(matches!(out[0].sides, AccountSides::EntriesOnly(_)));
        assert!(matches!(out[1].sides, AccountSides::Both(_, _)));
        assert!(matches!(out[2].sides, AccountSides::TrialBalanceOnly(_)));
    }

    #[test]
    fn no_entries_means_all_trial_balance_only() {
        let tb_map = BTreeMap::from([tb("4000", dec!(1)), tb("4100", dec!(2))]);
        let out = match_by_account(&tb_map, &BTreeMap::new());
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|m| matches!(m.sides, AccountSides::TrialBalanceOnly(_))));
    }

    #[test]
    fn every_account_appears_once() {
        let tb_map = BTreeMap::from([tb("4000", dec!(1)), tb("9", dec!(2)), tb("10", dec!(3))]);
        let je_map = BTreeMap::from([group("10", dec!(3)), group("4000", dec!(1)), group("5000", dec!(4))]);

        let out = match_by_account(&tb_map, &je_map);
        let accounts: Vec<&str> = out.iter().map(|m| m.account_code.as_str()).collect();
        assert_eq!(accounts, vec!["10", "4000", "5000", "9"]);
        assert!(matches!(out[2].sides, AccountSides::EntriesOnly(ref g) if g.total == dec!(4)));
        assert!(matches!(out[3].sides, AccountSides::TrialBalanceOnly(ref l) if l.balance_amount == dec!(2)));
    }

    #[test]
    fn both_maps_empty_yields_nothing() {
        assert!(match_by_account(&BTreeMap::new(), &BTreeMap::new()).is_empty());
    }
}
