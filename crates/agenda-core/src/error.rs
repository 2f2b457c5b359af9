//! Error types for `agenda-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("appointment not found: {0}")]
  AppointmentNotFound(u32),

  #[error("client not found: {0}")]
  ClientNotFound(u32),

  #[error("invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("invalid time {0:?}, expected HH:MM")]
  InvalidTime(String),

  #[error("invalid identifier {0:?}, expected a positive integer")]
  InvalidId(String),

  #[error("invalid selection {0:?}")]
  InvalidSelection(String),

  #[error("selection {selection} is out of range 1-{len}")]
  SelectionOutOfRange { selection: usize, len: usize },

  #[error("no identifiers left: the table already uses {max}", max = u32::MAX)]
  IdExhausted,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Errors caused by operator input rather than by the backing file.
  pub fn is_input(&self) -> bool {
    !matches!(self, Self::Store(_) | Self::IdExhausted)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
