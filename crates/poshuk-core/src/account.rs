//! Accounts and the ownership guard.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// The authenticated session identity, as returned by `GET /me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub id:       i64,
  pub username: String,
  pub email:    String,
}

/// The owner reference embedded in every record payload (wire key `user`).
/// Shape-compatible with [`Account`] but kept separate: it is read-only
/// data about someone else, never the session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
  pub id:       i64,
  pub username: String,
  pub email:    String,
}

impl Account {
  /// Whether this account created `record`.
  pub fn owns(&self, record: &Record) -> bool {
    self.id == record.owner.id
  }
}

/// Ownership check used to gate edit/delete affordances. Anonymous sessions
/// own nothing. This is a UX convenience; the server is the authority.
pub fn is_owner(account: Option<&Account>, record: &Record) -> bool {
  account.is_some_and(|a| a.owns(record))
}
