//! `poshuk` — command-line client for the Poshuk missing-persons registry.
//!
//! # Usage
//!
//! ```
//! poshuk --url https://registry.example.org list informed --region харків
//! poshuk --config ~/.config/poshuk/config.toml --user olena --password secret delete 42
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use commands::user_err;
use poshuk_client::{ApiClient, ApiConfig, Session};
use poshuk_core::{
  filter::FilterCriteria,
  record::{PersonType, Status, StatusScope},
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "poshuk",
  about = "Command-line client for the Poshuk missing-persons registry"
)]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the registry API.
  #[arg(long, env = "POSHUK_URL")]
  url: Option<String>,

  /// Account username; required for mutating commands.
  #[arg(long, env = "POSHUK_USER")]
  user: Option<String>,

  /// Account password.
  #[arg(long, env = "POSHUK_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List records in a scope (searching, informed, archive, or any single
  /// status), filtered locally.
  List {
    scope: StatusScope,
    #[command(flatten)]
    filters: FilterArgs,
  },

  /// Show one record in full.
  Show { id: i64 },

  /// List records owned by the logged-in account.
  Mine,

  /// Server-side search by free-text appearance description.
  SearchAppearance {
    description: String,
    #[arg(long, default_value = "informed")]
    scope: StatusScope,
  },

  /// Server-side search by photo similarity.
  SearchPhoto {
    photo: PathBuf,
    #[arg(long, default_value = "informed")]
    scope: StatusScope,
  },

  /// Add a record.
  Add(AddArgs),

  /// Edit a record you own. Unset flags keep the stored values.
  Edit(EditArgs),

  /// Delete a record you own. Asks for confirmation.
  Delete {
    id: i64,

    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
  },

  /// Show the logged-in account.
  Whoami,

  /// Register a new account and log in.
  Register(RegisterArgs),
}

/// Local filter flags for `list`; each maps onto one criterion of the
/// filter engine.
#[derive(ClapArgs, Debug)]
struct FilterArgs {
  /// Case-insensitive name substring.
  #[arg(long, default_value = "")]
  query: String,

  /// military or civilian.
  #[arg(long)]
  person_type: Option<PersonType>,

  #[arg(long)]
  region: Option<String>,

  #[arg(long)]
  brigade: Option<String>,

  #[arg(long)]
  circumstances: Option<String>,

  #[arg(long)]
  appearance: Option<String>,

  /// Inclusive lower bound on date of birth (YYYY-MM-DD).
  #[arg(long)]
  born_after: Option<NaiveDate>,

  /// Inclusive upper bound on date of birth (YYYY-MM-DD).
  #[arg(long)]
  born_before: Option<NaiveDate>,
}

impl FilterArgs {
  fn criteria(&self) -> FilterCriteria {
    FilterCriteria {
      person_type: self.person_type,
      status: None,
      region: self.region.clone(),
      brigade: self.brigade.clone(),
      circumstances: self.circumstances.clone(),
      appearance: self.appearance.clone(),
      born_after: self.born_after,
      born_before: self.born_before,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
  /// Record status: searching, informed, deceased, or reunited. Archive
  /// entries must pick deceased or reunited explicitly.
  #[arg(long)]
  status: Status,

  /// Appearance description; the backend requires it non-empty.
  #[arg(long)]
  appearance: String,

  #[arg(long)]
  name: Option<String>,

  #[arg(long, default_value = "civilian")]
  person_type: PersonType,

  /// Brigade; military records only.
  #[arg(long)]
  brigade: Option<String>,

  #[arg(long)]
  date_of_birth: Option<NaiveDate>,

  #[arg(long)]
  region: Option<String>,

  #[arg(long)]
  settlement: Option<String>,

  #[arg(long)]
  circumstances: Option<String>,

  /// Path to an image to attach.
  #[arg(long, value_name = "FILE")]
  picture: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
  id: i64,

  #[arg(long)]
  status: Option<Status>,

  #[arg(long)]
  appearance: Option<String>,

  #[arg(long)]
  name: Option<String>,

  #[arg(long)]
  person_type: Option<PersonType>,

  #[arg(long)]
  brigade: Option<String>,

  #[arg(long)]
  date_of_birth: Option<NaiveDate>,

  #[arg(long)]
  region: Option<String>,

  #[arg(long)]
  settlement: Option<String>,

  #[arg(long)]
  circumstances: Option<String>,

  /// Path to a replacement image.
  #[arg(long, value_name = "FILE")]
  picture: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct RegisterArgs {
  #[arg(long)]
  username: String,

  #[arg(long)]
  password: String,

  #[arg(long)]
  email: String,

  #[arg(long, default_value = "")]
  first_name: String,

  #[arg(long, default_value = "")]
  last_name: String,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .context("no API url configured (pass --url or set one in the config file)")?;
  let username = args
    .user
    .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()));
  let password = args
    .password
    .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()));

  let client = ApiClient::new(ApiConfig { base_url }).map_err(user_err)?;

  // Registration builds its own session; everything else logs in up front
  // when credentials are present and browses anonymously otherwise.
  let session = if matches!(&args.command, Command::Register(_)) {
    Session::default()
  } else {
    match (&username, &password) {
      (Some(user), Some(pass)) => {
        let csrf = client
          .prime_csrf()
          .await
          .map_err(user_err)?
          .context("the server did not issue an anti-forgery token")?;
        let session = client.login(user, pass, &csrf).await.map_err(user_err)?;
        tracing::info!(user = %user, "logged in");
        session
      }
      _ => client.session().await.map_err(user_err)?,
    }
  };

  match args.command {
    Command::List { scope, filters } => {
      commands::list(&client, scope, &filters.criteria(), &filters.query).await
    }
    Command::Show { id } => commands::show(&client, id).await,
    Command::Mine => commands::mine(&client, &session).await,
    Command::SearchAppearance { description, scope } => {
      commands::search_appearance(&client, &session, &description, scope).await
    }
    Command::SearchPhoto { photo, scope } => {
      commands::search_photo(&client, &session, &photo, scope).await
    }
    Command::Add(add) => commands::add(&client, &session, add).await,
    Command::Edit(edit) => commands::edit(&client, &session, edit).await,
    Command::Delete { id, yes } => {
      commands::delete(&client, &session, id, yes).await
    }
    Command::Whoami => commands::whoami(&session),
    Command::Register(register) => commands::register(&client, register).await,
  }
}
