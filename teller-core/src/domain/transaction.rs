//! Transaction log domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a ledger posting. The serialized labels are the ones the legacy
/// tool wrote, so existing datastores read back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Credit,
    Debit,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    #[serde(rename = "Transfer In")]
    TransferIn,
}

impl TransactionKind {
    /// Stored label for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
            TransactionKind::TransferOut => "Transfer Out",
            TransactionKind::TransferIn => "Transfer In",
        }
    }

    /// Parse a stored label
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Credit" => Some(TransactionKind::Credit),
            "Debit" => Some(TransactionKind::Debit),
            "Transfer Out" => Some(TransactionKind::TransferOut),
            "Transfer In" => Some(TransactionKind::TransferIn),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable row in the transaction log.
///
/// `account_number` is a back-reference, not an ownership link; accounts are
/// never deleted so no cascade applies. Amount is always positive; the kind
/// says which direction the balance moved.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub account_number: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_legacy_store() {
        assert_eq!(TransactionKind::Credit.as_str(), "Credit");
        assert_eq!(TransactionKind::Debit.as_str(), "Debit");
        assert_eq!(TransactionKind::TransferOut.as_str(), "Transfer Out");
        assert_eq!(TransactionKind::TransferIn.as_str(), "Transfer In");
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert_eq!(TransactionKind::parse("Credit"), Some(TransactionKind::Credit));
        assert_eq!(TransactionKind::parse("Transfer In"), Some(TransactionKind::TransferIn));
        assert_eq!(TransactionKind::parse("credit"), None);
        assert_eq!(TransactionKind::parse("Withdrawal"), None);
    }
}
