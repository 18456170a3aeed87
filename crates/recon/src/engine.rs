use tracing::{debug, info};

use crate::aggregate::{group_entries, index_trial_balance};
use crate::classify::classify_matches;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::filter::apply_icp_filter;
use crate::matcher::match_by_account;
use crate::model::{ReconInput, ReconMeta, ReconResult};

/// Reconcile one ICP code. Returns rows sorted by account code plus a summary.
pub fn run(config: &ReconConfig, input: &ReconInput, icp_code: &str) -> Result<ReconResult, ReconError> {
    let filtered = apply_icp_filter(input, icp_code)?;

    let trial_balance = index_trial_balance(&filtered.trial_balance, &filtered.icp_code)?;
    let groups = group_entries(&filtered.entries, &filtered.icp_code)?;
    debug!(
        accounts_tb = trial_balance.len(),
        accounts_entries = groups.len(),
        "indexed accounts"
    );

    let matches = match_by_account(&trial_balance, &groups);
    let rows = classify_matches(&matches, &filtered.icp_code, config.tolerance.amount)?;
    let summary = compute_summary(&rows, &filtered.icp_code)?;

    info!(
        icp = %filtered.icp_code,
        rows = summary.total_rows,
        matched = summary.matched,
        variances = summary.variances,
        trial_balance_only = summary.trial_balance_only,
        entries_only = summary.entries_only,
        net_variance = %summary.net_variance,
        "reconciliation complete"
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            icp_code: filtered.icp_code.clone(),
            tolerance: config.tolerance.amount,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            trial_balance_lines: filtered.trial_balance.len(),
            entry_lines: filtered.entries.len(),
        },
        summary,
        rows,
        entries: filtered.entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_input;
    use crate::model::MatchStatus;
    use crate::table::RawTable;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const TB_HEADERS: &[&str] = &["account_code", "ICP_code", "description", "period", "balance_amount"];
    const JE_HEADERS: &[&str] = &["account_code", "ICP_code", "entry_id", "description", "amount", "date"];

    fn run_tables(tb: &[&[&str]], je: &[&[&str]], icp: &str) -> Result<ReconResult, ReconError> {
        let config = ReconConfig::default();
        let tb = RawTable::from_strings(TB_HEADERS, tb);
        let je = RawTable::from_strings(JE_HEADERS, je);
        let input = load_input(&config, &tb, &je)?;
        run(&config, &input, icp)
    }

    #[test]
    fn scenario_matched() {
        let result = run_tables(
            &[&["4000", "ABC", "Revenue", "2026-01", "100.00"]],
            &[
                &["4000", "ABC", "JE-1", "", "60.00", "2026-01-10"],
                &["4000", "ABC", "JE-2", "", "40.00", "2026-01-20"],
            ],
            "ABC",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.status, MatchStatus::Matched);
        assert_eq!(row.variance, dec!(0.00));
        assert_eq!(row.entries_total, dec!(100.00));
        assert_eq!(row.entry_count, 2);
    }

    #[test]
    fn scenario_variance() {
        let result = run_tables(
            &[&["4000", "ABC", "Revenue", "2026-01", "100.00"]],
            &[&["4000", "ABC", "JE-1", "", "90.00", ""]],
            "ABC",
        )
        .unwrap();
        assert_eq!(result.rows[0].status, MatchStatus::Variance);
        assert_eq!(result.rows[0].variance, dec!(10.00));
    }

    #[test]
    fn scenario_trial_balance_only() {
        let result = run_tables(
            &[
                &["4000", "ABC", "Revenue", "2026-01", "100.00"],
                &["5000", "ABC", "COGS", "2026-01", "20.00"],
            ],
            &[&["5000", "ABC", "JE-1", "", "20.00", ""]],
            "ABC",
        )
        .unwrap();
        let row = &result.rows[0];
        assert_eq!(row.account_code, "4000");
        assert_eq!(row.status, MatchStatus::TrialBalanceOnly);
        assert_eq!(row.entries_total, dec!(0.00));
    }

    #[test]
    fn scenario_unknown_icp() {
        let err = run_tables(
            &[&["4000", "ABC", "Revenue", "2026-01", "100.00"]],
            &[&["4000", "XYZ", "JE-1", "", "100.00", ""]],
            "XYZ",
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::NoMatch { ref icp_code } if icp_code == "XYZ"));
    }

    #[test]
    fn scenario_duplicate_trial_balance_key() {
        let err = run_tables(
            &[
                &["4000", "ABC", "Revenue", "2026-01", "100.00"],
                &["4000", "ABC", "Revenue again", "2026-01", "50.00"],
            ],
            &[],
            "ABC",
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::DuplicateKey { ref account_code, .. } if account_code == "4000"));
    }

    #[test]
    fn duplicate_in_other_icp_is_ignored() {
        let result = run_tables(
            &[
                &["4000", "ABC", "", "", "100.00"],
                &["4000", "DEF", "", "", "1.00"],
                &["4000", "DEF", "", "", "2.00"],
            ],
            &[],
            "ABC",
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn entries_only_and_ordering() {
        let result = run_tables(
            &[&["4000", "ABC", "", "", "10"]],
            &[
                &["9000", "ABC", "JE-9", "Suspense", "3.50", ""],
                &["1000", "abc", "JE-1", "", "1", ""],
                &["4000", "ABC", "JE-4", "", "10", ""],
                &["4000", "XYZ", "JE-X", "", "999", ""],
            ],
            "abc",
        )
        .unwrap();
        let accounts: Vec<&str> = result.rows.iter().map(|r| r.account_code.as_str()).collect();
        assert_eq!(accounts, vec!["1000", "4000", "9000"]);
        assert_eq!(result.rows[2].status, MatchStatus::EntriesOnly);
        assert_eq!(result.rows[2].description, "Suspense");
        assert_eq!(result.meta.icp_code, "ABC");
        assert_eq!(result.meta.entry_lines, 3);
        assert_eq!(result.entries.len(), 3);
        assert_eq!(result.summary.entries_only, 2);
    }

    #[test]
    fn tolerance_from_config() {
        let config = ReconConfig::default().with_tolerance(dec!(0.05)).unwrap();
        let tb = RawTable::from_strings(TB_HEADERS, &[&["4000", "ABC", "", "", "100.04"]]);
        let je = RawTable::from_strings(JE_HEADERS, &[&["4000", "ABC", "", "", "100", ""]]);
        let input = load_input(&config, &tb, &je).unwrap();
        let result = run(&config, &input, "ABC").unwrap();
        assert_eq!(result.rows[0].status, MatchStatus::Matched);
        // Status is advisory; the figures are untouched
        assert_eq!(result.rows[0].variance, dec!(0.04));
        assert_eq!(result.meta.tolerance, dec!(0.05));
        assert_ne!(result.rows[0].variance, Decimal::ZERO);
    }

    #[test]
    fn entries_total_beyond_decimal_range_is_data_error() {
        let err = run_tables(
            &[&["4000", "ABC", "", "", "1"]],
            &[
                &["4000", "ABC", "", "", "79228162514264337593543950335", ""],
                &["4000", "ABC", "", "", "79228162514264337593543950335", ""],
            ],
            "ABC",
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::AmountOverflow { ref icp_code, .. } if icp_code == "ABC"));
        assert_eq!(err.kind(), crate::error::ErrorKind::Data);
    }
}
