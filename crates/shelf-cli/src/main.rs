//! `shelf` demo binary.
//!
//! Runs the session and loan machinery against the in-memory backend with
//! its seeded demo dataset. `shelf demo` walks through the whole flow;
//! `shelf books` and `shelf loans` exercise the catalog and the loan view
//! directly.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use shelf_backend_mem::MemoryBackend;
use shelf_catalog::Catalog;
use shelf_core::{
  backend::LibraryBackend,
  book::Category,
  loan::LoanView,
  profile::Registration,
};
use shelf_session::{AuthSnapshot, LoanService, SessionManager};

#[derive(Parser)]
#[command(author, version, about = "Library catalog demo client")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shelf.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Walk through registration, sign-in, and the loan view.
  Demo,
  /// List or search the seeded catalog.
  Books {
    /// Substring matched against title and author.
    #[arg(default_value = "")]
    query: String,

    /// Restrict to one category (e.g. "Science", "Non-Fiction").
    #[arg(long)]
    category: Option<String>,
  },
  /// Sign in and print that student's loan view.
  Loans {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,

    /// Emit the loan view as JSON.
    #[arg(long)]
    json: bool,
  },
}

#[derive(Debug, Deserialize)]
struct Settings {
  #[serde(default = "default_session_ttl_secs")]
  session_ttl_secs: u64,
}

fn default_session_ttl_secs() -> u64 {
  3600
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SHELF"))
    .build()
    .context("failed to read config file")?;

  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise Settings")?;

  let backend = Arc::new(
    MemoryBackend::seeded()
      .with_session_ttl(chrono::Duration::seconds(settings.session_ttl_secs as i64)),
  );

  match cli.command {
    Command::Demo => demo(backend).await,
    Command::Books { query, category } => books(backend, &query, category).await,
    Command::Loans { email, password, json } => {
      loans(backend, &email, &password, json).await
    }
  }
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

async fn demo(backend: Arc<MemoryBackend>) -> anyhow::Result<()> {
  let manager = SessionManager::attach(Arc::clone(&backend));
  let service = LoanService::new(Arc::clone(&backend), manager.clone());
  wait_for(&manager, |s| !s.resolving).await?;

  println!("== register a new student ==");
  manager
    .register(Registration {
      email:      "dana@example.com".into(),
      password:   "secret".into(),
      full_name:  "Dana Rivers".into(),
      student_id: "STU042".into(),
      phone:      None,
    })
    .await
    .context("registration failed")?;
  let snap = wait_for(&manager, |s| s.profile.is_some()).await?;
  print_identity(&snap);

  println!("\n== switch to a seeded account ==");
  manager
    .login("alice@example.com", "secret")
    .await
    .context("sign-in failed")?;
  let snap = wait_for(&manager, |s| {
    s.profile.as_ref().is_some_and(|p| p.student_id == "STU001")
  })
  .await?;
  print_identity(&snap);

  println!("\n== loan view ==");
  if let Some(view) = service.current_loans().await? {
    print_loans(&view);
  }

  println!("\n== sign out ==");
  manager.logout().await;
  println!("phase: {:?}", manager.phase());
  Ok(())
}

async fn books(
  backend: Arc<MemoryBackend>,
  query: &str,
  category: Option<String>,
) -> anyhow::Result<()> {
  let category = category
    .map(|s| s.parse::<Category>())
    .transpose()
    .map_err(|e| anyhow::anyhow!(e))?;

  let catalog = Catalog::from_books(backend.list_books().await?);
  let hits = catalog.search(query, category);
  for book in &hits {
    let status = if book.available { "available" } else { "issued" };
    println!(
      "{:<40} {:<25} {:<12} {}",
      book.title, book.author, book.category, status
    );
  }
  println!(
    "\n{} of {} shown ({} available, {} issued)",
    hits.len(),
    catalog.len(),
    catalog.available_count(),
    catalog.issued_count()
  );
  Ok(())
}

async fn loans(
  backend: Arc<MemoryBackend>,
  email: &str,
  password: &str,
  json: bool,
) -> anyhow::Result<()> {
  let manager = SessionManager::attach(Arc::clone(&backend));
  let service = LoanService::new(Arc::clone(&backend), manager.clone());

  manager.login(email, password).await.context("sign-in failed")?;
  wait_for(&manager, |s| s.profile.is_some()).await?;

  let Some(view) = service.current_loans().await? else {
    anyhow::bail!("signed out before the loan view resolved");
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&view)?);
  } else {
    print_loans(&view);
  }
  Ok(())
}

// ─── Output helpers ──────────────────────────────────────────────────────────

async fn wait_for<F>(
  manager: &SessionManager<MemoryBackend>,
  pred: F,
) -> anyhow::Result<AuthSnapshot>
where
  F: Fn(&AuthSnapshot) -> bool,
{
  let mut rx = manager.subscribe();
  let snap = timeout(Duration::from_secs(5), rx.wait_for(|s| pred(s)))
    .await
    .context("timed out waiting for session state")?
    .context("session manager shut down")?;
  Ok(snap.clone())
}

fn print_identity(snap: &AuthSnapshot) {
  if let Some(identity) = &snap.identity {
    println!("signed in as {}", identity.email);
  }
  if let Some(profile) = &snap.profile {
    println!("profile: {} ({})", profile.full_name, profile.student_id);
  }
}

fn print_loans(view: &LoanView) {
  println!("active loans ({} overdue):", view.overdue_count());
  for loan in &view.active {
    let flag = if loan.overdue { " OVERDUE" } else { "" };
    println!(
      "  {} by {} — due {}{}",
      loan.record.title,
      loan.record.author,
      loan.record.due_at.format("%Y-%m-%d"),
      flag
    );
  }
  println!("returned:");
  for record in &view.returned {
    let returned = record
      .returned_at
      .map(|t| t.format("%Y-%m-%d").to_string())
      .unwrap_or_default();
    println!("  {} by {} — returned {}", record.title, record.author, returned);
  }
}
