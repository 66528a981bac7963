//! Error types for `poshuk-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("unknown status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown person type: {0:?}")]
  UnknownPersonType(String),

  #[error("appearance description must not be empty")]
  AppearanceRequired,

  #[error("brigade is only valid for military records")]
  BrigadeWithoutMilitary,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
