use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Reconciliation settings. Every section is optional; `ReconConfig::default()`
/// is what the bare `generate_reconciliation_file` entry point uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub trial_balance: TrialBalanceSource,
    #[serde(default)]
    pub entries: EntriesSource,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "ICP reconciliation".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tolerance: ToleranceConfig::default(),
            trial_balance: TrialBalanceSource::default(),
            entries: EntriesSource::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Absolute variance at or below which an account counts as matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToleranceConfig {
    #[serde(default)]
    pub amount: Decimal,
}

// ---------------------------------------------------------------------------
// Sources + column aliases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrialBalanceSource {
    /// Worksheet to read; the first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: TrialBalanceColumns,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntriesSource {
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: EntriesColumns,
}

/// Header aliases per logical column, tried in order. Matching ignores case
/// and treats spaces, hyphens, dots and underscores alike.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrialBalanceColumns {
    pub account_code: Vec<String>,
    pub icp_code: Vec<String>,
    pub balance_amount: Vec<String>,
    pub description: Vec<String>,
    pub period: Vec<String>,
}

impl Default for TrialBalanceColumns {
    fn default() -> Self {
        Self {
            account_code: account_code_aliases(),
            icp_code: icp_code_aliases(),
            balance_amount: aliases(&[
                "balance_amount",
                "balance",
                "closing balance",
                "ending balance",
                "amount",
            ]),
            description: aliases(&["description", "account description", "account name"]),
            period: aliases(&["period", "fiscal period"]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntriesColumns {
    pub account_code: Vec<String>,
    pub icp_code: Vec<String>,
    pub amount: Vec<String>,
    pub entry_id: Vec<String>,
    pub description: Vec<String>,
    pub date: Vec<String>,
}

impl Default for EntriesColumns {
    fn default() -> Self {
        Self {
            account_code: account_code_aliases(),
            icp_code: icp_code_aliases(),
            amount: aliases(&["amount", "net amount", "value"]),
            entry_id: aliases(&[
                "entry_id",
                "journal id",
                "journal number",
                "je number",
                "document number",
            ]),
            description: aliases(&["description", "line description", "memo"]),
            date: aliases(&["date", "posting date", "entry date", "effective date"]),
        }
    }
}

fn account_code_aliases() -> Vec<String> {
    aliases(&[
        "account_code",
        "account",
        "account number",
        "account no",
        "gl account",
        "gl code",
    ])
}

fn icp_code_aliases() -> Vec<String> {
    aliases(&["icp_code", "icp", "intercompany", "company code", "entity"])
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub const SUMMARY_SHEET: &str = "Summary";
pub const ENTRIES_SHEET: &str = "Entries";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sheet_name: String,
    pub include_summary_sheet: bool,
    pub include_entries_sheet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Reconciliation".into(),
            include_summary_sheet: true,
            include_entries_sheet: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the tolerance, re-checking that it is non-negative.
    pub fn with_tolerance(mut self, amount: Decimal) -> Result<Self, ReconError> {
        self.tolerance.amount = amount;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.tolerance.amount < Decimal::ZERO {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must not be negative, got {}",
                self.tolerance.amount
            )));
        }

        let tb = &self.trial_balance.columns;
        let je = &self.entries.columns;
        let alias_lists: [(&str, &Vec<String>); 11] = [
            ("trial_balance.columns.account_code", &tb.account_code),
            ("trial_balance.columns.icp_code", &tb.icp_code),
            ("trial_balance.columns.balance_amount", &tb.balance_amount),
            ("trial_balance.columns.description", &tb.description),
            ("trial_balance.columns.period", &tb.period),
            ("entries.columns.account_code", &je.account_code),
            ("entries.columns.icp_code", &je.icp_code),
            ("entries.columns.amount", &je.amount),
            ("entries.columns.entry_id", &je.entry_id),
            ("entries.columns.description", &je.description),
            ("entries.columns.date", &je.date),
        ];
        for (field, list) in alias_lists {
            if list.iter().all(|a| a.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{field} needs at least one header name"
                )));
            }
        }

        validate_sheet_name(&self.output.sheet_name)?;
        if self.output.sheet_name.eq_ignore_ascii_case(SUMMARY_SHEET)
            || self.output.sheet_name.eq_ignore_ascii_case(ENTRIES_SHEET)
        {
            return Err(ReconError::ConfigValidation(format!(
                "output.sheet_name '{}' is reserved",
                self.output.sheet_name
            )));
        }

        Ok(())
    }
}

/// Excel's worksheet naming rules.
fn validate_sheet_name(name: &str) -> Result<(), ReconError> {
    if name.trim().is_empty() {
        return Err(ReconError::ConfigValidation(
            "output.sheet_name must not be empty".into(),
        ));
    }
    if name.chars().count() > 31 {
        return Err(ReconError::ConfigValidation(format!(
            "output.sheet_name '{name}' exceeds 31 characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(ReconError::ConfigValidation(format!(
            "output.sheet_name '{name}' contains invalid character '{c}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
