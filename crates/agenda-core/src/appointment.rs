//! Appointment types.
//!
//! An appointment belongs to exactly one client. Its service and status may
//! change after booking; cancelling removes it from the table entirely.

use std::{fmt, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime};
use strum::{Display, EnumIter, EnumString};

use crate::client::Client;

/// `chrono` format of the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `chrono` format of the time column.
pub const TIME_FORMAT: &str = "%H:%M";

// ─── Status ──────────────────────────────────────────────────────────────────

/// The conventional statuses, offered as hints when editing.
///
/// An appointment's status is free text; values outside this set are stored
/// and reloaded unchanged.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter,
)]
pub enum KnownStatus {
  #[default]
  Pending,
  Confirmed,
  Completed,
  Cancelled,
}

// ─── Appointment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
  pub appointment_id: u32,
  pub client:         Rc<Client>,
  pub service:        String,
  /// Minute precision; seconds are never written to the table.
  pub scheduled_at:   NaiveDateTime,
  pub status:         String,
}

impl Appointment {
  pub fn date(&self) -> NaiveDate { self.scheduled_at.date() }
}

impl fmt::Display for Appointment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Appointment {}: {} - {} ({}) [{}]",
      self.appointment_id,
      self.client,
      self.service,
      self.scheduled_at.format("%Y-%m-%d %H:%M"),
      self.status,
    )
  }
}

/// Input to [`crate::Agenda::book`]. Identifier and status are assigned by
/// the session.
#[derive(Debug, Clone)]
pub struct NewAppointment {
  pub client:       Rc<Client>,
  pub service:      String,
  pub scheduled_at: NaiveDateTime,
}

impl NewAppointment {
  pub fn new(
    client: Rc<Client>,
    service: impl Into<String>,
    scheduled_at: NaiveDateTime,
  ) -> Self {
    Self { client, service: service.into(), scheduled_at }
  }
}

// ─── Edits ───────────────────────────────────────────────────────────────────

/// A single edit to an existing appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
  Service(String),
  Status(String),
}

/// The operator's answer when asked to confirm a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
  Confirmed,
  Declined,
}
