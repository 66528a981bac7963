//! Record store client and mutation gateway.
//!
//! Reads are plain cookie-credentialed GETs. Mutations go through the
//! ownership guard first, carry the anti-forgery token, and are encoded as
//! multipart forms because the create/edit flows may attach an image.

use poshuk_core::{
  account::{Account, is_owner},
  record::{Record, RecordDraft, StatusScope},
};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::{
  Error, Result,
  client::{ApiClient, CsrfToken, WithCsrf, check},
};

impl ApiClient {
  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /captives/?status=<scope>`
  pub async fn records_by_scope(
    &self,
    scope: StatusScope,
  ) -> Result<Vec<Record>> {
    debug!(status = scope.query_value(), "listing records");
    let resp = self
      .http()
      .get(self.url("/captives/"))
      .query(&[("status", scope.query_value())])
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  /// `GET /captives/<id>/`
  pub async fn record(&self, id: i64) -> Result<Record> {
    debug!(id, "fetching record");
    let resp = self
      .http()
      .get(self.url(&format!("/captives/{id}/")))
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  /// `GET /captives/?user_id=<id>` — every record owned by one account.
  pub async fn records_by_owner(&self, account_id: i64) -> Result<Vec<Record>> {
    debug!(account_id, "listing records by owner");
    let resp = self
      .http()
      .get(self.url("/captives/"))
      .query(&[("user_id", account_id.to_string())])
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  // ── Ownership guard ───────────────────────────────────────────────────────

  /// Fetch a record and verify `actor` owns it; the edit screen calls this
  /// before rendering the form. A UX pre-check only — the server
  /// re-validates every mutation.
  pub async fn check_ownership(
    &self,
    actor: Option<&Account>,
    id: i64,
  ) -> Result<Record> {
    let record = self.record(id).await?;
    if !is_owner(actor, &record) {
      return Err(Error::Forbidden);
    }
    Ok(record)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// `POST /captives/` (multipart). The draft is validated before anything
  /// is dispatched; an empty appearance never reaches the wire.
  pub async fn create_record(
    &self,
    draft: &RecordDraft,
    csrf: &CsrfToken,
  ) -> Result<Record> {
    draft.validate()?;
    debug!(status = draft.status.as_str(), "creating record");
    let resp = self
      .http()
      .post(self.url("/captives/"))
      .with_csrf(csrf)
      .multipart(draft_form(draft)?)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  /// `PATCH /captives/<id>/` (multipart). Only the owner may succeed; the
  /// guard runs before any PATCH is dispatched.
  pub async fn update_record(
    &self,
    actor: Option<&Account>,
    id: i64,
    draft: &RecordDraft,
    csrf: &CsrfToken,
  ) -> Result<Record> {
    draft.validate()?;
    self.check_ownership(actor, id).await?;
    debug!(id, status = draft.status.as_str(), "updating record");
    let resp = self
      .http()
      .patch(self.url(&format!("/captives/{id}/")))
      .with_csrf(csrf)
      .multipart(draft_form(draft)?)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  /// `DELETE /captives/<id>/`. Irreversible — interactive callers must get
  /// explicit confirmation before calling this. The DELETE is only
  /// dispatched once the ownership guard passes.
  pub async fn delete_record(
    &self,
    actor: Option<&Account>,
    id: i64,
    csrf: &CsrfToken,
  ) -> Result<()> {
    self.check_ownership(actor, id).await?;
    debug!(id, "deleting record");
    let resp = self
      .http()
      .delete(self.url(&format!("/captives/{id}/")))
      .with_csrf(csrf)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }
}

/// Assemble the multipart form for create and update. Empty optional
/// fields are left out entirely, matching what the backend expects from
/// the web form; dates go over as `YYYY-MM-DD`.
fn draft_form(draft: &RecordDraft) -> Result<Form> {
  let mut form = Form::new()
    .text("person_type", draft.person_type.as_str())
    .text("status", draft.status.as_str())
    .text("appearance", draft.appearance.clone());

  form = text_opt(form, "name", draft.name.as_deref());
  form = text_opt(form, "brigade", draft.brigade.as_deref());
  form = text_opt(form, "region", draft.region.as_deref());
  form = text_opt(form, "settlement", draft.settlement.as_deref());
  form = text_opt(form, "circumstances", draft.circumstances.as_deref());

  if let Some(date) = draft.date_of_birth {
    form = form.text("date_of_birth", date.format("%Y-%m-%d").to_string());
  }

  if let Some(picture) = &draft.picture {
    let part = Part::bytes(picture.bytes.clone())
      .file_name(picture.file_name.clone())
      .mime_str(&picture.media_type)?;
    form = form.part("picture", part);
  }

  Ok(form)
}

fn text_opt(form: Form, key: &'static str, value: Option<&str>) -> Form {
  match value {
    Some(v) if !v.is_empty() => form.text(key, v.to_owned()),
    _ => form,
  }
}
