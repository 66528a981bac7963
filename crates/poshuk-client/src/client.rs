//! Async HTTP client wrapping the registry JSON API.

use std::{sync::Arc, time::Duration};

use reqwest::{
  Client, RequestBuilder, Response, StatusCode, Url,
  cookie::{CookieStore, Jar},
};

use crate::{Error, Result};

/// Header carrying the anti-forgery token on every mutating request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Session cookie the server stores the anti-forgery token in.
const CSRF_COOKIE: &str = "csrftoken";

/// Connection settings for the registry API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Opaque anti-forgery token, read from the session cookie jar. Obtained
/// via [`ApiClient::csrf_token`] and passed explicitly into every mutating
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Async HTTP client for the registry REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based, and the
/// cookie jar holding the session is shared between clones.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  jar:    Arc<Jar>,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let jar = Arc::new(Jar::default());
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .cookie_provider(jar.clone())
      .build()?;
    Ok(Self {
      client,
      jar,
      config,
    })
  }

  pub(crate) fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  pub(crate) fn http(&self) -> &Client {
    &self.client
  }

  /// The current anti-forgery token, if the server has set one on this
  /// session. Must be re-read after login, registration, and profile
  /// updates — the server rotates the cookie on those operations.
  pub fn csrf_token(&self) -> Option<CsrfToken> {
    let url = Url::parse(&self.url("/")).ok()?;
    let header = self.jar.cookies(&url)?;
    let raw = header.to_str().ok()?;
    raw.split(';').find_map(|pair| {
      let (name, value) = pair.trim().split_once('=')?;
      (name == CSRF_COOKIE).then(|| CsrfToken::new(value))
    })
  }

  /// Bare GET against the API root so the server sets a fresh `csrftoken`
  /// cookie, then read it back. The registration flow and first-run
  /// sessions start here.
  pub async fn prime_csrf(&self) -> Result<Option<CsrfToken>> {
    self.client.get(self.url("/")).send().await?;
    Ok(self.csrf_token())
  }
}

/// Attach the anti-forgery header to a request builder.
pub(crate) trait WithCsrf {
  fn with_csrf(self, token: &CsrfToken) -> Self;
}

impl WithCsrf for RequestBuilder {
  fn with_csrf(self, token: &CsrfToken) -> Self {
    self.header(CSRF_HEADER, token.as_str())
  }
}

/// Map non-2xx responses onto the error taxonomy. The server sends its
/// message under `error` or `detail` depending on the endpoint.
pub(crate) async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  Err(match status {
    StatusCode::NOT_FOUND => Error::NotFound,
    StatusCode::FORBIDDEN => Error::Forbidden,
    _ => {
      let body = resp.text().await.unwrap_or_default();
      let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
          v.get("error")
            .or_else(|| v.get("detail"))
            .and_then(|m| m.as_str())
            .map(str::to_owned)
        })
        .unwrap_or(body);
      Error::Api { status, message }
    }
  })
}
