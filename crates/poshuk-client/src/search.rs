//! Remote search delegate — appearance-text and photo-similarity search.
//!
//! Both searches are computed server-side against stored embeddings; the
//! results come back ranked and replace the working list wholesale (see
//! [`poshuk_core::listing::Listing`]). Local filtering stays suppressed
//! until the listing is reset.

use poshuk_core::record::{PictureUpload, Record, StatusScope};
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::debug;

use crate::{
  Error, Result,
  client::{ApiClient, CsrfToken, WithCsrf, check},
};

impl ApiClient {
  /// `POST /appearance_search/` with `{ "appearance": ..., "status": ... }`.
  /// An empty description is rejected before any request is issued.
  pub async fn search_by_appearance(
    &self,
    description: &str,
    scope: StatusScope,
    csrf: &CsrfToken,
  ) -> Result<Vec<Record>> {
    if description.trim().is_empty() {
      return Err(Error::Validation(poshuk_core::Error::AppearanceRequired));
    }
    debug!(status = scope.query_value(), "appearance search");
    let resp = self
      .http()
      .post(self.url("/appearance_search/"))
      .with_csrf(csrf)
      .json(&json!({
        "appearance": description,
        "status": scope.query_value(),
      }))
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  /// `POST /photo_search/` (multipart: a `photo` file part plus the
  /// `status` scope as a text part).
  pub async fn search_by_photo(
    &self,
    photo: &PictureUpload,
    scope: StatusScope,
    csrf: &CsrfToken,
  ) -> Result<Vec<Record>> {
    debug!(status = scope.query_value(), "photo search");
    let part = Part::bytes(photo.bytes.clone())
      .file_name(photo.file_name.clone())
      .mime_str(&photo.media_type)?;
    let form = Form::new()
      .part("photo", part)
      .text("status", scope.query_value());
    let resp = self
      .http()
      .post(self.url("/photo_search/"))
      .with_csrf(csrf)
      .multipart(form)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }
}
