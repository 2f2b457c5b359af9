//! Runtime settings: defaults, optional TOML file, `AGENDA_*` environment
//! variables and command-line overrides, in increasing precedence.

use std::path::{Path, PathBuf};

use agenda_core::client::ContactKind;
use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// The appointment table.
  pub store_path:         PathBuf,
  /// Which contact column the table carries.
  pub contact:            ContactKind,
  /// Reload the table before every menu command instead of working on the
  /// snapshot taken at startup.
  pub reload_per_command: bool,
}

impl Settings {
  pub fn load(file: &Path, store_override: Option<&Path>) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder()
      .set_default("store_path", "appointments.csv")?
      .set_default("contact", "email")?
      .set_default("reload_per_command", false)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("AGENDA"));

    if let Some(path) = store_override {
      builder = builder.set_override("store_path", path.to_string_lossy().into_owned())?;
    }

    let mut settings: Self = builder
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn defaults_apply_without_a_file() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load(&dir.path().join("missing.toml"), None).unwrap();

    assert_eq!(settings.store_path, PathBuf::from("appointments.csv"));
    assert_eq!(settings.contact, ContactKind::Email);
    assert!(!settings.reload_per_command);
  }

  #[test]
  fn file_values_and_flag_override() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("agenda.toml");
    fs::write(
      &file,
      "store_path = \"from-file.csv\"\ncontact = \"phone\"\nreload_per_command = true\n",
    )
    .unwrap();

    let settings = Settings::load(&file, None).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("from-file.csv"));
    assert_eq!(settings.contact, ContactKind::Phone);
    assert!(settings.reload_per_command);

    let settings = Settings::load(&file, Some(Path::new("flag.csv"))).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("flag.csv"));
  }

  #[test]
  fn unknown_contact_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("agenda.toml");
    fs::write(&file, "contact = \"fax\"\n").unwrap();

    assert!(Settings::load(&file, None).is_err());
  }
}
