//! Record — the person-of-interest entry at the heart of the registry.
//!
//! The wire shape mirrors the backend's JSON exactly: integer ids, lowercase
//! enum strings, every optional field present as an explicit `null`, and the
//! owning account nested under the `user` key.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, account::Owner, section::Section};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Whether the person is military or civilian. `brigade` is only meaningful
/// for military records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
  Military,
  Civilian,
}

impl PersonType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Military => "military",
      Self::Civilian => "civilian",
    }
  }
}

impl FromStr for PersonType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "military" => Ok(Self::Military),
      "civilian" => Ok(Self::Civilian),
      other => Err(Error::UnknownPersonType(other.to_owned())),
    }
  }
}

impl fmt::Display for PersonType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Lifecycle stage of a record. This is always one of the four stored
/// values; "archive" is a [`Section`], not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Searching,
  Informed,
  Deceased,
  Reunited,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Searching => "searching",
      Self::Informed => "informed",
      Self::Deceased => "deceased",
      Self::Reunited => "reunited",
    }
  }

  /// Whether the record belongs to the archive section.
  pub fn is_archived(&self) -> bool {
    matches!(self, Self::Deceased | Self::Reunited)
  }

  /// The section that displays records with this status, and the
  /// destination after a successful save.
  pub fn section(&self) -> Section {
    match self {
      Self::Searching => Section::Searching,
      Self::Informed => Section::Informed,
      Self::Deceased | Self::Reunited => Section::Archive,
    }
  }
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "searching" => Ok(Self::Searching),
      "informed" => Ok(Self::Informed),
      "deceased" => Ok(Self::Deceased),
      "reunited" => Ok(Self::Reunited),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Status scope ────────────────────────────────────────────────────────────

/// The status scope of a list fetch or a remote search. The archive scope
/// covers both of its stored statuses in one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScope {
  One(Status),
  Archive,
}

impl StatusScope {
  /// Value for the backend's `status` query parameter. The backend splits
  /// the value on `|` and ORs the parts.
  pub fn query_value(&self) -> &'static str {
    match self {
      Self::One(status) => status.as_str(),
      Self::Archive => "deceased|reunited",
    }
  }
}

impl From<Status> for StatusScope {
  fn from(status: Status) -> Self {
    Self::One(status)
  }
}

impl FromStr for StatusScope {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "archive" => Ok(Self::Archive),
      other => Ok(Self::One(other.parse()?)),
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One person-of-interest entry. `id`, `last_update`, and `owner` are
/// server-assigned; the owner is set at creation and never transferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub id:            i64,
  pub name:          Option<String>,
  /// URL of the stored image, if one was uploaded.
  pub picture:       Option<String>,
  pub person_type:   PersonType,
  pub brigade:       Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub status:        Status,
  pub region:        Option<String>,
  pub settlement:    Option<String>,
  pub circumstances: Option<String>,
  pub appearance:    Option<String>,
  pub last_update:   Option<DateTime<Utc>>,
  #[serde(rename = "user")]
  pub owner:         Owner,
}

impl Record {
  /// Canonical detail destination for this record, derived from its status.
  pub fn detail_path(&self) -> String {
    self.status.section().detail_path(self.id)
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// An image payload awaiting upload: raw bytes plus the metadata the
/// multipart encoding needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUpload {
  pub file_name:  String,
  pub media_type: String,
  pub bytes:      Vec<u8>,
}

/// Input to record creation and editing. Validated before any request is
/// issued; the server re-validates on its side.
#[derive(Debug, Clone)]
pub struct RecordDraft {
  pub name:          Option<String>,
  pub person_type:   PersonType,
  pub brigade:       Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub status:        Status,
  pub region:        Option<String>,
  pub settlement:    Option<String>,
  pub circumstances: Option<String>,
  /// Free-text appearance description. Required non-empty.
  pub appearance:    String,
  pub picture:       Option<PictureUpload>,
}

impl RecordDraft {
  /// A minimal valid draft. The archive creation flow must pick
  /// [`Status::Deceased`] or [`Status::Reunited`] explicitly — there is no
  /// "archive" status to fall back on.
  pub fn new(status: Status, appearance: impl Into<String>) -> Self {
    Self {
      name: None,
      person_type: PersonType::Civilian,
      brigade: None,
      date_of_birth: None,
      status,
      region: None,
      settlement: None,
      circumstances: None,
      appearance: appearance.into(),
      picture: None,
    }
  }

  /// Build a draft pre-filled from an existing record, for the edit flow.
  /// The stored picture URL does not survive into the draft; a new upload
  /// replaces it, absence keeps it.
  pub fn from_record(record: &Record) -> Self {
    Self {
      name: record.name.clone(),
      person_type: record.person_type,
      brigade: record.brigade.clone(),
      date_of_birth: record.date_of_birth,
      status: record.status,
      region: record.region.clone(),
      settlement: record.settlement.clone(),
      circumstances: record.circumstances.clone(),
      appearance: record.appearance.clone().unwrap_or_default(),
      picture: None,
    }
  }

  /// Client-side validation, run before anything touches the network.
  pub fn validate(&self) -> Result<()> {
    if self.appearance.trim().is_empty() {
      return Err(Error::AppearanceRequired);
    }
    if self.brigade.as_deref().is_some_and(|b| !b.is_empty())
      && self.person_type != PersonType::Military
    {
      return Err(Error::BrigadeWithoutMilitary);
    }
    Ok(())
  }
}
