//! Error type for `agenda-store-csv`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("could not replace the backing file: {0}")]
  Persist(#[from] tempfile::PersistError),

  #[error("header has no {0:?} column")]
  MissingColumn(&'static str),

  /// A row whose identifier, date or time field does not parse.
  #[error("line {line}: {message}")]
  Parse { line: u64, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
