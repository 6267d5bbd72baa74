//! Read-only profile directory.
//!
//! The [`Directory`] owns every [`UserProfile`] for the lifetime of the
//! process. Profiles are resolved by `userId` (exact), `email` or `name`. The
//! latter two are matched after folding case and diacritics, so
//! `PEPITO.PEREZ@CONTOSO.COM` and `maria lopez` both resolve.
//!
//! Keys are tried in precedence order across the *whole* directory: a
//! `userId` match always beats an `email` match, which always beats a `name`
//! match.

use crate::{Error, Result, types::UserProfile};
use serde::Deserialize;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Profile lookup keys, as accepted by `GET /user/profile`.
///
/// Empty values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl ProfileQuery {
    pub fn by_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Profile-by-key reads.
pub trait DirectoryLookup {
    /// Every profile, in seeding order.
    fn profiles(&self) -> &[UserProfile];

    /// Resolves `query` to a single profile, or [`Error::NotFound`].
    fn find(&self, query: &ProfileQuery) -> Result<&UserProfile>;
}

struct SearchKeys {
    email: String,
    name: String,
}

/// Immutable in-memory directory.
pub struct Directory {
    profiles: Vec<UserProfile>,
    keys: Vec<SearchKeys>,
}

impl Directory {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        let keys = profiles
            .iter()
            .map(|p| SearchKeys {
                email: fold(&p.email),
                name: fold(&p.name),
            })
            .collect();
        Self { profiles, keys }
    }

    fn position(&self, query: &ProfileQuery) -> Option<usize> {
        if let Some(user_id) = present(&query.user_id) {
            if let Some(idx) = self.profiles.iter().position(|p| p.user_id == user_id) {
                return Some(idx);
            }
        }
        if let Some(email) = present(&query.email) {
            let email = fold(email);
            if let Some(idx) = self.keys.iter().position(|k| k.email == email) {
                return Some(idx);
            }
        }
        if let Some(name) = present(&query.name) {
            let name = fold(name);
            if let Some(idx) = self.keys.iter().position(|k| k.name == name) {
                return Some(idx);
            }
        }
        None
    }
}

impl DirectoryLookup for Directory {
    fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    fn find(&self, query: &ProfileQuery) -> Result<&UserProfile> {
        match self.position(query) {
            Some(idx) => Ok(&self.profiles[idx]),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?query, "no profile matched");
                Err(Error::not_found("User"))
            }
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Lower-cases `value` and strips combining marks after canonical
/// decomposition (`"María"` → `"maria"`).
fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
