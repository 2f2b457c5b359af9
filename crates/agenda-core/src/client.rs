//! Client — a person who books appointments.
//!
//! Clients are immutable once created and are deduplicated by their contact
//! value. Every appointment of the same client shares one [`Rc<Client>`].

use std::fmt;

use serde::Deserialize;
use strum::{Display, EnumString};

// ─── Contact kind ────────────────────────────────────────────────────────────

/// Which contact attribute the appointment table carries for every client.
///
/// This is a property of the whole table, not of an individual client.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
  #[default]
  Email,
  Phone,
}

impl ContactKind {
  /// Header name of the contact column in the backing table.
  pub fn column(self) -> &'static str {
    match self {
      Self::Email => "client_email",
      Self::Phone => "client_phone",
    }
  }

  /// Human-readable prompt label.
  pub fn label(self) -> &'static str {
    match self {
      Self::Email => "Email",
      Self::Phone => "Phone",
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
  pub client_id:  u32,
  pub first_name: String,
  pub last_name:  String,
  /// Email address or phone number, depending on the table's [`ContactKind`].
  pub contact:    String,
}

impl fmt::Display for Client {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} (ID: {})", self.first_name, self.last_name, self.client_id)
  }
}

/// Input to [`crate::Agenda::register_client`]. The identifier is assigned by
/// the session.
#[derive(Debug, Clone)]
pub struct NewClient {
  pub first_name: String,
  pub last_name:  String,
  pub contact:    String,
}

impl NewClient {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    contact: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name:  last_name.into(),
      contact:    contact.into(),
    }
  }
}
