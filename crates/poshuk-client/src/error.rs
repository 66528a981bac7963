//! Error types for `poshuk-client`.
//!
//! The taxonomy mirrors what the UI needs to distinguish: transport
//! failures, pre-dispatch validation, ownership refusals, missing records,
//! and everything else the server said no to.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request could not complete at the transport level.
  #[error("network failure: {0}")]
  Network(#[from] reqwest::Error),

  /// Input rejected client-side, before any request was issued.
  #[error("validation failed: {0}")]
  Validation(#[from] poshuk_core::Error),

  /// The current session does not own the record it tried to mutate.
  #[error("forbidden")]
  Forbidden,

  #[error("not found")]
  NotFound,

  /// The session has no anti-forgery token; mutations cannot be sent.
  #[error("no anti-forgery token on this session")]
  MissingCsrf,

  /// Any other non-2xx response, with the server's message if it sent one.
  #[error("api error {status}: {message}")]
  Api { status: StatusCode, message: String },
}

impl Error {
  /// Localized message for inline display next to the triggering action.
  pub fn user_message(&self) -> &'static str {
    match self {
      Error::Network(_) => "Помилка з’єднання. Спробуйте ще раз.",
      Error::Validation(poshuk_core::Error::AppearanceRequired) => {
        "Опис зовнішності обов’язковий."
      }
      Error::Validation(_) => "Перевірте введені дані.",
      Error::Forbidden => "У вас немає прав редагувати цей запис",
      Error::NotFound => "Запис не знайдено",
      Error::MissingCsrf => "Сесія неактивна. Увійдіть ще раз.",
      Error::Api { .. } => "Щось пішло не так. Спробуйте ще раз.",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
