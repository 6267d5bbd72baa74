//! Read-only balance ledger keyed by account id.

use crate::{Error, Result, types::BalanceRecord};
use std::collections::HashMap;

/// Balance-by-id reads.
pub trait LedgerLookup {
    /// Returns the balance record for `account_id`, or [`Error::NotFound`].
    fn balance(&self, account_id: &str) -> Result<&BalanceRecord>;
}

/// Immutable in-memory ledger.
pub struct Ledger {
    records: HashMap<String, BalanceRecord>,
}

impl Ledger {
    /// Builds a ledger from `records`. A later record with the same
    /// `account_id` replaces an earlier one.
    pub fn new(records: impl IntoIterator<Item = BalanceRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.account_id.clone(), r))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LedgerLookup for Ledger {
    fn balance(&self, account_id: &str) -> Result<&BalanceRecord> {
        self.records
            .get(account_id)
            .ok_or_else(|| Error::not_found("Account"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use rust_decimal::Decimal;

    fn ledger() -> Ledger {
        Ledger::new([
            BalanceRecord {
                account_id: "acc003".into(),
                balance: Decimal::new(-15_000_000, 2),
                currency: Currency::Cop,
            },
            BalanceRecord {
                account_id: "acc004".into(),
                balance: Decimal::new(250_075, 2),
                currency: Currency::Usd,
            },
        ])
    }

    #[test]
    fn finds_balance_by_account_id() {
        let ledger = ledger();
        let record = ledger.balance("acc003").unwrap();
        assert_eq!(record.balance, Decimal::new(-15_000_000, 2));
        assert_eq!(record.currency, Currency::Cop);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn unknown_account_is_not_found() {
        assert_eq!(ledger().balance("acc999"), Err(Error::not_found("Account")));
    }
}
