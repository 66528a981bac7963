//! Session and account endpoints.
//!
//! The session context (who is logged in, plus the anti-forgery token) is
//! an explicit value, not ambient state. It must be rebuilt via
//! [`ApiClient::session`] after the three operations that rotate it:
//! login, registration, and profile update — the helpers here do that and
//! hand the fresh context back.

use poshuk_core::account::Account;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::{
  Error, Result,
  client::{ApiClient, CsrfToken, WithCsrf, check},
};

/// The explicit session context passed into ownership checks and
/// mutations. `account` is `None` for anonymous browsing.
#[derive(Debug, Clone, Default)]
pub struct Session {
  pub account: Option<Account>,
  pub csrf:    Option<CsrfToken>,
}

impl Session {
  /// The anti-forgery token, or a typed error when the session has none.
  pub fn csrf(&self) -> Result<&CsrfToken> {
    self.csrf.as_ref().ok_or(Error::MissingCsrf)
  }
}

/// Registration payload for `POST /register/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
  pub username:   String,
  pub password:   String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
}

/// Profile update payload for `PATCH /users/<id>/`. The password is
/// write-only and only sent when set.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
  pub username: String,
  pub email:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
}

impl ApiClient {
  /// `GET /me/` — the logged-in account, or `None` when the session is
  /// anonymous.
  pub async fn me(&self) -> Result<Option<Account>> {
    let resp = self.http().get(self.url("/me/")).send().await?;
    if matches!(
      resp.status(),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    ) {
      return Ok(None);
    }
    Ok(Some(check(resp).await?.json().await?))
  }

  /// Build the current session context: the logged-in account (if any)
  /// plus the anti-forgery token from the cookie jar.
  pub async fn session(&self) -> Result<Session> {
    Ok(Session {
      account: self.me().await?,
      csrf:    self.csrf_token(),
    })
  }

  /// `POST /login/`. Returns the refreshed session context — the server
  /// rotates the session and token cookies on login.
  pub async fn login(
    &self,
    username: &str,
    password: &str,
    csrf: &CsrfToken,
  ) -> Result<Session> {
    debug!(username, "logging in");
    let resp = self
      .http()
      .post(self.url("/login/"))
      .with_csrf(csrf)
      .json(&json!({ "username": username, "password": password }))
      .send()
      .await?;
    check(resp).await?;
    self.session().await
  }

  /// `POST /logout/`.
  pub async fn logout(&self, csrf: &CsrfToken) -> Result<()> {
    debug!("logging out");
    let resp = self
      .http()
      .post(self.url("/logout/"))
      .with_csrf(csrf)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }

  /// `POST /register/`. Primes a fresh anti-forgery token first (a new
  /// visitor has none), registers, and returns the refreshed session —
  /// the server logs the new account in as part of registration.
  pub async fn register(&self, new_account: &NewAccount) -> Result<Session> {
    let csrf = self.prime_csrf().await?.ok_or(Error::MissingCsrf)?;
    debug!(username = %new_account.username, "registering account");
    let resp = self
      .http()
      .post(self.url("/register/"))
      .with_csrf(&csrf)
      .json(new_account)
      .send()
      .await?;
    check(resp).await?;
    self.session().await
  }

  /// `PATCH /users/<id>/`. Returns the refreshed session context — a
  /// changed password rotates the session cookie server-side.
  pub async fn update_profile(
    &self,
    account_id: i64,
    update: &ProfileUpdate,
    csrf: &CsrfToken,
  ) -> Result<Session> {
    debug!(account_id, "updating profile");
    let resp = self
      .http()
      .patch(self.url(&format!("/users/{account_id}/")))
      .with_csrf(csrf)
      .json(update)
      .send()
      .await?;
    check(resp).await?;
    self.session().await
  }

  /// `DELETE /users/<id>/`. Irreversible; callers confirm first.
  pub async fn delete_account(
    &self,
    account_id: i64,
    csrf: &CsrfToken,
  ) -> Result<()> {
    debug!(account_id, "deleting account");
    let resp = self
      .http()
      .delete(self.url(&format!("/users/{account_id}/")))
      .with_csrf(csrf)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }
}
