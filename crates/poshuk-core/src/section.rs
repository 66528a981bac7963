//! Sections — the three browse surfaces of the registry.
//!
//! `Archive` is a routing concept only: it displays records whose stored
//! status is `deceased` or `reunited` and is never itself a stored status.

use crate::record::{Status, StatusScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Searching,
  Informed,
  Archive,
}

impl Section {
  /// The list route for this section, and the destination after a
  /// successful create originating from it.
  pub fn list_path(&self) -> &'static str {
    match self {
      // "informated" is the route the deployed frontend shipped with;
      // changing it would break saved links.
      Self::Searching => "/searching",
      Self::Informed => "/informated",
      Self::Archive => "/archive",
    }
  }

  /// Detail route for a record shown under this section.
  pub fn detail_path(&self, id: i64) -> String {
    format!("{}/{id}", self.list_path())
  }

  /// The fetch scope backing this section's list.
  pub fn scope(&self) -> StatusScope {
    match self {
      Self::Searching => StatusScope::One(Status::Searching),
      Self::Informed => StatusScope::One(Status::Informed),
      Self::Archive => StatusScope::Archive,
    }
  }
}

/// Section-independent detail route, the fallback when no section context
/// exists.
pub fn generic_detail_path(id: i64) -> String {
  format!("/captives/{id}")
}
