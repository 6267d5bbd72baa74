//! # Banking data model
//!
//! Profiles, accounts and balances served by the lookup endpoints, plus the
//! request/response payloads of the HTTP surface. All records are immutable
//! after startup; nothing here exposes a mutation API.
//!
//! JSON field names follow the wire contract (`userId`, `accountId`, `type`),
//! so the types can be handed straight to `axum::Json`.

use core::fmt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO-4217 currency code of an account or balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cop,
    Usd,
    Eur,
}

impl Currency {
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Cop => "COP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
}

/// An account as listed on a user's profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub currency: Currency,
}

impl Account {
    pub fn new(id: impl Into<String>, kind: AccountType, currency: Currency) -> Self {
        Self {
            id: id.into(),
            kind,
            currency,
        }
    }
}

/// A customer profile owned by the [`Directory`](crate::Directory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub accounts: Vec<Account>,
}

/// The balance of one account, owned by the [`Ledger`](crate::Ledger).
///
/// Serialized as `{"accountId", "balance", "currency"}`, which is also the
/// response body of the balance endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    pub account_id: String,
    pub balance: Decimal,
    pub currency: Currency,
}

/// Body of `POST /account/balance`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    pub account_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_uses_wire_field_names() {
        let profile = UserProfile {
            user_id: "user123".into(),
            name: "Pepito Pérez".into(),
            email: "pepito.perez@contoso.com".into(),
            accounts: vec![Account::new("acc001", AccountType::Checking, Currency::Cop)],
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": "user123",
                "name": "Pepito Pérez",
                "email": "pepito.perez@contoso.com",
                "accounts": [{"id": "acc001", "type": "Checking", "currency": "COP"}]
            })
        );
    }

    #[test]
    fn balance_request_reads_camel_case() {
        let req: BalanceRequest = serde_json::from_str(r#"{"accountId":"acc003"}"#).unwrap();
        assert_eq!(req.account_id, "acc003");
    }

    #[test]
    fn balance_is_a_json_number() {
        let record = BalanceRecord {
            account_id: "acc003".into(),
            balance: Decimal::new(-15_000_000, 2),
            currency: Currency::Cop,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["balance"].as_f64(), Some(-150000.0));
        assert_eq!(value["currency"], "COP");
    }
}
