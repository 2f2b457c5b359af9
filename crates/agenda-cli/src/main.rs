//! `agenda` — text menu for the Agenda appointment book.
//!
//! # Usage
//!
//! ```
//! agenda
//! agenda --store ~/clinic/appointments.csv
//! agenda --config ~/.config/agenda/agenda.toml
//! ```

mod app;
mod console;
mod settings;

use std::{io, path::PathBuf};

use agenda_core::Agenda;
use agenda_store_csv::CsvStore;
use anyhow::Context as _;
use app::App;
use clap::Parser;
use console::Console;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "agenda", author, version, about = "Appointment book with a text menu")]
struct Cli {
  /// Path to a TOML config file (store_path, contact, reload_per_command).
  #[arg(short, long, value_name = "FILE", default_value = "agenda.toml")]
  config: PathBuf,

  /// Appointment table to use, overriding the config file.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  // Logs go to stderr so they never interleave with menu prompts on stdout.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config, cli.store.as_deref())?;

  let store = CsvStore::open(&settings.store_path, settings.contact)
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let agenda = Agenda::open(store).with_context(|| {
    format!("failed to load appointments from {:?}", settings.store_path)
  })?;
  tracing::info!(
    path = %settings.store_path.display(),
    appointments = agenda.appointments().len(),
    "appointment book opened"
  );

  println!("Agenda");
  println!("{}", "-".repeat(30));

  let console = Console::new(io::stdin().lock(), io::stdout());
  App::new(agenda, console, settings.contact, settings.reload_per_command).run()
}
