use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which upload a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    TrialBalance,
    Entries,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrialBalance => write!(f, "trial balance"),
            Self::Entries => write!(f, "entries"),
        }
    }
}

/// One period-end balance line. `row` is the 1-based sheet row it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialBalanceLine {
    pub row: usize,
    pub account_code: String,
    pub icp_code: String,
    pub description: String,
    pub period: String,
    pub balance_amount: Decimal,
}

/// One journal entry line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntryLine {
    pub row: usize,
    pub account_code: String,
    pub icp_code: String,
    pub entry_id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

/// Typed records for both roles, before ICP filtering.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub trial_balance: Vec<TrialBalanceLine>,
    pub entries: Vec<JournalEntryLine>,
}

/// Records scoped to one ICP code.
#[derive(Debug, Clone)]
pub struct FilteredInput {
    pub icp_code: String,
    pub trial_balance: Vec<TrialBalanceLine>,
    pub entries: Vec<JournalEntryLine>,
}

// ---------------------------------------------------------------------------
// Aggregation + matching
// ---------------------------------------------------------------------------

/// Entries sharing one account code, summed exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryGroup {
    pub account_code: String,
    pub total: Decimal,
    pub entry_count: usize,
    /// First non-blank entry description, used when the account has no
    /// trial balance line to describe it.
    pub description: Option<String>,
}

/// Which inputs an account was found in.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountSides {
    Both(TrialBalanceLine, EntryGroup),
    TrialBalanceOnly(TrialBalanceLine),
    EntriesOnly(EntryGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountMatch {
    pub account_code: String,
    pub sides: AccountSides,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Variance,
    TrialBalanceOnly,
    EntriesOnly,
}

impl MatchStatus {
    /// Human-readable label used in the output workbook.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::Variance => "Variance",
            Self::TrialBalanceOnly => "Trial balance only",
            Self::EntriesOnly => "Entries only",
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Variance => write!(f, "variance"),
            Self::TrialBalanceOnly => write!(f, "trial_balance_only"),
            Self::EntriesOnly => write!(f, "entries_only"),
        }
    }
}

/// Per-account comparison of trial balance vs. summed entries.
///
/// `variance` is always `trial_balance_amount - entries_total`; `status` is
/// derived from it and never feeds back into the figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationRow {
    pub account_code: String,
    pub icp_code: String,
    pub description: String,
    pub trial_balance_amount: Decimal,
    pub entries_total: Decimal,
    pub variance: Decimal,
    pub entry_count: usize,
    pub status: MatchStatus,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub matched: usize,
    pub variances: usize,
    pub trial_balance_only: usize,
    pub entries_only: usize,
    pub trial_balance_total: Decimal,
    pub entries_total: Decimal,
    pub net_variance: Decimal,
}

impl ReconSummary {
    /// True when every row is `Matched`.
    pub fn is_clean(&self) -> bool {
        self.matched == self.total_rows
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub icp_code: String,
    pub tolerance: Decimal,
    pub engine_version: String,
    pub trial_balance_lines: usize,
    pub entry_lines: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<ReconciliationRow>,
    /// Filtered entry lines that fed the rows, in source order.
    #[serde(skip)]
    pub entries: Vec<JournalEntryLine>,
}
