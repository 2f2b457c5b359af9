//! [`CsvStore`] — the flat-file implementation of [`AppointmentStore`].

use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
  rc::Rc,
};

use agenda_core::{
  appointment::Appointment,
  client::{Client, ContactKind},
  store::AppointmentStore,
};
use tempfile::NamedTempFile;

use crate::{
  Error, Result,
  encode::{RawRow, encode_row},
  schema::{Columns, header},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An appointment book backed by a single CSV file.
///
/// The file is opened, fully read or fully rewritten, and closed within each
/// call. No handle or lock is held between calls.
#[derive(Debug, Clone)]
pub struct CsvStore {
  path:    PathBuf,
  contact: ContactKind,
}

impl CsvStore {
  /// Open the table at `path`, creating it (and its parent directories) with a
  /// header row if it does not exist.
  pub fn open(path: impl Into<PathBuf>, contact: ContactKind) -> Result<Self> {
    let store = Self { path: path.into(), contact };
    store.ensure_store()?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  pub fn contact_kind(&self) -> ContactKind { self.contact }

  /// Directory that receives the temporary file during a rewrite. It must be
  /// on the same filesystem as the table for the final rename.
  fn parent_dir(&self) -> &Path {
    match self.path.parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir,
      _ => Path::new("."),
    }
  }
}

// ─── AppointmentStore impl ───────────────────────────────────────────────────

impl AppointmentStore for CsvStore {
  type Error = Error;

  fn ensure_store(&self) -> Result<()> {
    if self.path.exists() {
      return Ok(());
    }

    fs::create_dir_all(self.parent_dir())?;
    self.save_all(&[])?;
    tracing::info!(path = %self.path.display(), "created appointment table");
    Ok(())
  }

  fn load_all(&self) -> Result<Vec<Appointment>> {
    let mut reader = csv::ReaderBuilder::new()
      .flexible(true)
      .from_path(&self.path)?;

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
      return Ok(Vec::new());
    }
    let columns = Columns::resolve(&headers, self.contact)?;

    let mut clients: HashMap<u32, Rc<Client>> = HashMap::new();
    let mut appointments = Vec::new();

    for record in reader.records() {
      let record = record?;
      let row = RawRow::read(&record, &columns)?;

      let client_id = row.client_id()?;
      let client = Rc::clone(
        clients
          .entry(client_id)
          .or_insert_with(|| Rc::new(row.to_client(client_id))),
      );

      appointments.push(row.into_appointment(client)?);
    }

    tracing::debug!(
      path = %self.path.display(),
      appointments = appointments.len(),
      clients = clients.len(),
      "loaded appointment table"
    );
    Ok(appointments)
  }

  fn save_all(&self, appointments: &[Appointment]) -> Result<()> {
    let mut file = NamedTempFile::new_in(self.parent_dir())?;

    {
      let mut writer = csv::Writer::from_writer(file.as_file_mut());
      writer.write_record(header(self.contact))?;
      for appointment in appointments {
        writer.write_record(encode_row(appointment))?;
      }
      writer.flush()?;
    }

    // The temp file is created private; keep the table's existing mode.
    if let Ok(metadata) = fs::metadata(&self.path) {
      file.as_file().set_permissions(metadata.permissions())?;
    }
    file.as_file().sync_all()?;
    file.persist(&self.path)?;

    tracing::debug!(
      path = %self.path.display(),
      appointments = appointments.len(),
      "saved appointment table"
    );
    Ok(())
  }
}
