use thiserror::Error;

use crate::model::Role;

/// Error category, for callers that branch on the kind of failure
/// rather than on its detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Read,
    Schema,
    Data,
    NoMatch,
    DuplicateKey,
    Write,
}

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (negative tolerance, bad sheet name, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Input bytes could not be decoded as a workbook or delimited text.
    #[error("{role}: cannot read input: {detail}")]
    Read { role: Role, detail: String },
    /// Required column missing from the header row.
    #[error("{role}: missing required column '{column}'")]
    Schema { role: Role, column: String },
    /// Unparsable value in a keyed row. `row` is the 1-based sheet row.
    #[error("{role}, row {row}, column '{column}': cannot parse '{value}'")]
    Data {
        role: Role,
        row: usize,
        column: String,
        value: String,
    },
    /// ICP code has no trial balance lines.
    #[error("ICP code '{icp_code}' not found in trial balance")]
    NoMatch { icp_code: String },
    /// Same account appears more than once in the filtered trial balance.
    #[error(
        "duplicate trial balance account '{account_code}' for ICP '{icp_code}' (rows {})",
        join_rows(.rows)
    )]
    DuplicateKey {
        account_code: String,
        icp_code: String,
        rows: Vec<usize>,
    },
    /// A sum or difference left the exact decimal range. `what` names the
    /// figure, e.g. "entries total for account '4000'".
    #[error("{what} for ICP '{icp_code}' exceeds the supported amount range")]
    AmountOverflow { icp_code: String, what: String },
    /// Workbook serialization failed.
    #[error("cannot write reconciliation workbook: {0}")]
    Write(String),
}

impl ReconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigParse(_) | Self::ConfigValidation(_) => ErrorKind::Config,
            Self::Read { .. } => ErrorKind::Read,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Data { .. } | Self::AmountOverflow { .. } => ErrorKind::Data,
            Self::NoMatch { .. } => ErrorKind::NoMatch,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::Write(_) => ErrorKind::Write,
        }
    }
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        let err = ReconError::Schema {
            role: Role::TrialBalance,
            column: "balance_amount".into(),
        };
        assert_eq!(
            err.to_string(),
            "trial balance: missing required column 'balance_amount'"
        );

        let err = ReconError::Data {
            role: Role::Entries,
            row: 7,
            column: "amount".into(),
            value: "n/a".into(),
        };
        assert_eq!(err.to_string(), "entries, row 7, column 'amount': cannot parse 'n/a'");
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn duplicate_key_lists_rows() {
        let err = ReconError::DuplicateKey {
            account_code: "4000".into(),
            icp_code: "ABC".into(),
            rows: vec![2, 5],
        };
        assert_eq!(
            err.to_string(),
            "duplicate trial balance account '4000' for ICP 'ABC' (rows 2, 5)"
        );
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    }

    #[test]
    fn overflow_is_a_data_failure() {
        let err = ReconError::AmountOverflow {
            icp_code: "ABC".into(),
            what: "entries total for account '4000'".into(),
        };
        assert_eq!(
            err.to_string(),
            "entries total for account '4000' for ICP 'ABC' exceeds the supported amount range"
        );
        assert_eq!(err.kind(), ErrorKind::Data);
    }
}
