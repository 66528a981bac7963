//! Subcommand implementations and plain-text output.

use std::{
  io::{self, Write},
  path::Path,
};

use anyhow::{Context, Result};
use poshuk_client::{ApiClient, Session, auth::NewAccount};
use poshuk_core::{
  filter::{FilterCriteria, apply_filters},
  record::{PictureUpload, Record, RecordDraft, StatusScope},
};

use crate::{AddArgs, EditArgs, RegisterArgs};

/// Surface the localized message first, the technical error after it.
pub fn user_err(e: poshuk_client::Error) -> anyhow::Error {
  anyhow::anyhow!("{} ({e})", e.user_message())
}

// ─── Browsing ─────────────────────────────────────────────────────────────────

pub async fn list(
  client: &ApiClient,
  scope: StatusScope,
  criteria: &FilterCriteria,
  query: &str,
) -> Result<()> {
  let fetched = client.records_by_scope(scope).await.map_err(user_err)?;
  let visible = apply_filters(&fetched, criteria, query);
  print_records(&visible);
  Ok(())
}

pub async fn show(client: &ApiClient, id: i64) -> Result<()> {
  let record = client.record(id).await.map_err(user_err)?;
  print_record(&record);
  Ok(())
}

pub async fn mine(client: &ApiClient, session: &Session) -> Result<()> {
  let account = session
    .account
    .as_ref()
    .context("потрібно увійти (передайте --user і --password)")?;
  let records = client
    .records_by_owner(account.id)
    .await
    .map_err(user_err)?;
  print_records(&records);
  Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
  match &session.account {
    Some(account) => {
      println!("{} <{}> (id {})", account.username, account.email, account.id);
    }
    None => println!("Анонімний сеанс."),
  }
  Ok(())
}

// ─── Remote search ────────────────────────────────────────────────────────────

pub async fn search_appearance(
  client: &ApiClient,
  session: &Session,
  description: &str,
  scope: StatusScope,
) -> Result<()> {
  let csrf = session.csrf().map_err(user_err)?;
  let results = client
    .search_by_appearance(description, scope, csrf)
    .await
    .map_err(user_err)?;
  print_records(&results);
  Ok(())
}

pub async fn search_photo(
  client: &ApiClient,
  session: &Session,
  photo: &Path,
  scope: StatusScope,
) -> Result<()> {
  let csrf = session.csrf().map_err(user_err)?;
  let upload = read_picture(photo)?;
  let results = client
    .search_by_photo(&upload, scope, csrf)
    .await
    .map_err(user_err)?;
  print_records(&results);
  Ok(())
}

// ─── Mutations ────────────────────────────────────────────────────────────────

pub async fn add(
  client: &ApiClient,
  session: &Session,
  args: AddArgs,
) -> Result<()> {
  let csrf = session.csrf().map_err(user_err)?;

  let mut draft = RecordDraft::new(args.status, args.appearance);
  draft.name = args.name;
  draft.person_type = args.person_type;
  draft.brigade = args.brigade;
  draft.date_of_birth = args.date_of_birth;
  draft.region = args.region;
  draft.settlement = args.settlement;
  draft.circumstances = args.circumstances;
  if let Some(path) = &args.picture {
    draft.picture = Some(read_picture(path)?);
  }

  let record = client.create_record(&draft, csrf).await.map_err(user_err)?;
  println!(
    "Створено запис {} → {}",
    record.id,
    record.status.section().list_path()
  );
  Ok(())
}

pub async fn edit(
  client: &ApiClient,
  session: &Session,
  args: EditArgs,
) -> Result<()> {
  let csrf = session.csrf().map_err(user_err)?;

  let existing = client
    .check_ownership(session.account.as_ref(), args.id)
    .await
    .map_err(user_err)?;

  let mut draft = RecordDraft::from_record(&existing);
  if let Some(status) = args.status {
    draft.status = status;
  }
  if let Some(appearance) = args.appearance {
    draft.appearance = appearance;
  }
  if let Some(person_type) = args.person_type {
    draft.person_type = person_type;
  }
  if args.name.is_some() {
    draft.name = args.name;
  }
  if args.brigade.is_some() {
    draft.brigade = args.brigade;
  }
  if args.date_of_birth.is_some() {
    draft.date_of_birth = args.date_of_birth;
  }
  if args.region.is_some() {
    draft.region = args.region;
  }
  if args.settlement.is_some() {
    draft.settlement = args.settlement;
  }
  if args.circumstances.is_some() {
    draft.circumstances = args.circumstances;
  }
  if let Some(path) = &args.picture {
    draft.picture = Some(read_picture(path)?);
  }

  let updated = client
    .update_record(session.account.as_ref(), args.id, &draft, csrf)
    .await
    .map_err(user_err)?;
  println!("Збережено → {}", updated.detail_path());
  Ok(())
}

pub async fn delete(
  client: &ApiClient,
  session: &Session,
  id: i64,
  yes: bool,
) -> Result<()> {
  if !yes {
    let prompt =
      format!("Видалити запис {id}? Цю дію не можна скасувати");
    if !confirm(&prompt)? {
      println!("Скасовано.");
      return Ok(());
    }
  }

  let csrf = session.csrf().map_err(user_err)?;
  client
    .delete_record(session.account.as_ref(), id, csrf)
    .await
    .map_err(user_err)?;
  println!("Запис {id} видалено.");
  Ok(())
}

pub async fn register(client: &ApiClient, args: RegisterArgs) -> Result<()> {
  let new_account = NewAccount {
    username:   args.username,
    password:   args.password,
    email:      args.email,
    first_name: args.first_name,
    last_name:  args.last_name,
  };
  let session = client.register(&new_account).await.map_err(user_err)?;
  match session.account {
    Some(account) => {
      println!("Зареєстровано та увійшли як {}", account.username);
    }
    None => println!("Зареєстровано."),
  }
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn confirm(prompt: &str) -> Result<bool> {
  print!("{prompt} [y/N]: ");
  io::stdout().flush()?;
  let mut line = String::new();
  io::stdin().read_line(&mut line)?;
  Ok(matches!(line.trim(), "y" | "Y" | "так"))
}

fn read_picture(path: &Path) -> Result<PictureUpload> {
  let bytes = std::fs::read(path)
    .with_context(|| format!("reading image {}", path.display()))?;
  let file_name = path
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or("photo")
    .to_owned();
  let media_type = match path.extension().and_then(|e| e.to_str()) {
    Some("png") => "image/png",
    Some("webp") => "image/webp",
    _ => "image/jpeg",
  };
  Ok(PictureUpload {
    file_name,
    media_type: media_type.to_owned(),
    bytes,
  })
}

fn print_records(records: &[Record]) {
  if records.is_empty() {
    println!("Нічого не знайдено.");
    return;
  }
  for record in records {
    let name = record.name.as_deref().unwrap_or("Невідома особа");
    println!(
      "#{:<6} {:<10} {:<9} {name}",
      record.id,
      record.status.as_str(),
      record.person_type.as_str()
    );
  }
  println!("Всього: {}", records.len());
}

fn print_record(record: &Record) {
  let name = record.name.as_deref().unwrap_or("Невідома особа");
  println!("#{} {name}", record.id);
  println!("Статус: {}", record.status.as_str());
  println!("Тип особи: {}", record.person_type.as_str());
  if let Some(brigade) = &record.brigade {
    println!("Бригада: {brigade}");
  }
  let place: Vec<&str> = [record.region.as_deref(), record.settlement.as_deref()]
    .into_iter()
    .flatten()
    .collect();
  if !place.is_empty() {
    println!("Місце: {}", place.join(", "));
  }
  if let Some(date_of_birth) = record.date_of_birth {
    println!("Дата нар.: {date_of_birth}");
  }
  if let Some(circumstances) = &record.circumstances {
    println!("Обставини: {circumstances}");
  }
  if let Some(appearance) = &record.appearance {
    println!("Зовнішність: {appearance}");
  }
  if let Some(picture) = &record.picture {
    println!("Фото: {picture}");
  }
  if let Some(last_update) = record.last_update {
    println!("Оновлено: {last_update}");
  }
  println!("Додав: {} <{}>", record.owner.username, record.owner.email);
}
