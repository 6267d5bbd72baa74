//! The process-wide lookup data: one [`Directory`] and one [`Ledger`], built
//! once at startup and shared read-only afterwards.
//!
//! [`Bank::new`] refuses data in which a profile lists an account the ledger
//! does not know (or knows under a different currency), so a missing balance
//! is caught at startup rather than surfacing as a `NotFound` for an account
//! the directory advertises.

use crate::{
    Error, Result,
    directory::{Directory, DirectoryLookup},
    ledger::{Ledger, LedgerLookup},
    types::{Account, AccountType, BalanceRecord, Currency, UserProfile},
};
use rust_decimal::Decimal;

pub struct Bank {
    directory: Directory,
    ledger: Ledger,
}

impl Bank {
    /// Pairs a directory with a ledger after checking that every account
    /// referenced by a profile has a matching balance record.
    pub fn new(directory: Directory, ledger: Ledger) -> Result<Self> {
        for profile in directory.profiles() {
            for account in &profile.accounts {
                let record = ledger.balance(&account.id).map_err(|_| Error::Integrity {
                    reason: format!(
                        "account {} of {} has no balance record",
                        account.id, profile.user_id
                    ),
                })?;
                if record.currency != account.currency {
                    return Err(Error::Integrity {
                        reason: format!(
                            "account {} is listed in {} but its balance is in {}",
                            account.id, account.currency, record.currency
                        ),
                    });
                }
            }
        }
        Ok(Self { directory, ledger })
    }

    /// The demo data set: three customers with a checking, a savings and a
    /// credit account each.
    pub fn seeded() -> Result<Self> {
        let (profiles, balances) = seed();
        Self::new(Directory::new(profiles), Ledger::new(balances))
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

fn seed() -> (Vec<UserProfile>, Vec<BalanceRecord>) {
    use AccountType::{Checking, Credit, Savings};

    // (user id, name, email, currency, [(account, balance in cents)])
    let customers: [(&str, &str, &str, Currency, [(&str, i64); 3]); 3] = [
        (
            "user123",
            "Pepito Pérez",
            "pepito.perez@contoso.com",
            Currency::Cop,
            [
                ("acc001", 125_000_050),
                ("acc002", 345_000_000),
                ("acc003", -15_000_000),
            ],
        ),
        (
            "user456",
            "María López",
            "maria.lopez@contoso.com",
            Currency::Usd,
            [("acc004", 250_075), ("acc005", 860_000), ("acc006", -120_000)],
        ),
        (
            "user789",
            "Carlos Torres",
            "carlos.torres@contoso.com",
            Currency::Eur,
            [("acc007", 98_030), ("acc008", 1_500_000), ("acc009", -50_000)],
        ),
    ];

    let mut profiles = Vec::with_capacity(customers.len());
    let mut balances = Vec::with_capacity(customers.len() * 3);

    for (user_id, name, email, currency, accounts) in customers {
        let kinds = [Checking, Savings, Credit];
        profiles.push(UserProfile {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            accounts: accounts
                .iter()
                .zip(kinds)
                .map(|((id, _), kind)| Account::new(*id, kind, currency))
                .collect(),
        });
        balances.extend(accounts.iter().map(|(id, cents)| BalanceRecord {
            account_id: id.to_string(),
            balance: Decimal::new(*cents, 2),
            currency,
        }));
    }

    (profiles, balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileQuery;

    #[test]
    fn seeded_data_is_consistent() {
        let bank = Bank::seeded().unwrap();
        assert_eq!(bank.directory().profiles().len(), 3);
        assert_eq!(bank.ledger().len(), 9);
    }

    #[test]
    fn seeded_balances_match_the_demo_data() {
        let bank = Bank::seeded().unwrap();
        let acc003 = bank.ledger().balance("acc003").unwrap();
        assert_eq!(acc003.balance, Decimal::new(-15_000_000, 2));
        assert_eq!(acc003.currency, Currency::Cop);

        let acc007 = bank.ledger().balance("acc007").unwrap();
        assert_eq!(acc007.balance.to_string(), "980.30");
        assert_eq!(acc007.currency, Currency::Eur);
    }

    #[test]
    fn seeded_profiles_list_accounts_in_order() {
        let bank = Bank::seeded().unwrap();
        let maria = bank
            .directory()
            .find(&ProfileQuery::by_user_id("user456"))
            .unwrap();
        let accounts: Vec<_> = maria
            .accounts
            .iter()
            .map(|a| (a.id.as_str(), a.kind))
            .collect();
        assert_eq!(
            accounts,
            [
                ("acc004", AccountType::Checking),
                ("acc005", AccountType::Savings),
                ("acc006", AccountType::Credit)
            ]
        );
    }

    #[test]
    fn rejects_profile_account_without_balance() {
        let (profiles, mut balances) = seed();
        balances.retain(|b| b.account_id != "acc005");
        let err = Bank::new(Directory::new(profiles), Ledger::new(balances))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Integrity { reason } if reason.contains("acc005")));
    }

    #[test]
    fn rejects_currency_mismatch() {
        let (profiles, mut balances) = seed();
        for b in balances.iter_mut().filter(|b| b.account_id == "acc001") {
            b.currency = Currency::Usd;
        }
        assert!(matches!(
            Bank::new(Directory::new(profiles), Ledger::new(balances)),
            Err(Error::Integrity { .. })
        ));
    }
}
