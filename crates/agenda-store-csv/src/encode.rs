//! Encoding and decoding between domain types and the text fields of a table
//! row.
//!
//! Identifiers are decimal integers. The combined date+time is split across
//! two columns using the fixed formats from [`agenda_core::appointment`].

use std::rc::Rc;

use agenda_core::{
  appointment::{Appointment, DATE_FORMAT, TIME_FORMAT},
  client::Client,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;

use crate::{Error, Result, schema::Columns};

// ─── Write ───────────────────────────────────────────────────────────────────

/// One denormalized row, in header order.
pub fn encode_row(appointment: &Appointment) -> [String; 9] {
  let client = &appointment.client;
  [
    appointment.appointment_id.to_string(),
    client.client_id.to_string(),
    client.first_name.clone(),
    client.last_name.clone(),
    client.contact.clone(),
    appointment.service.clone(),
    appointment.scheduled_at.format(DATE_FORMAT).to_string(),
    appointment.scheduled_at.format(TIME_FORMAT).to_string(),
    appointment.status.clone(),
  ]
}

// ─── Read ────────────────────────────────────────────────────────────────────

fn parse_error(line: u64, message: String) -> Error { Error::Parse { line, message } }

pub fn decode_id(line: u64, column: &str, s: &str) -> Result<u32> {
  s.trim()
    .parse()
    .map_err(|_| parse_error(line, format!("{column} {s:?} is not an integer")))
}

pub fn decode_datetime(line: u64, date: &str, time: &str) -> Result<NaiveDateTime> {
  let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
    .map_err(|e| parse_error(line, format!("date {date:?}: {e}")))?;
  let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
    .map_err(|e| parse_error(line, format!("time {time:?}: {e}")))?;
  Ok(date.and_time(time))
}

/// Raw fields of a single table row, borrowed from the CSV record.
pub struct RawRow<'r> {
  pub line:              u64,
  pub appointment_id:    &'r str,
  pub client_id:         &'r str,
  pub client_first_name: &'r str,
  pub client_last_name:  &'r str,
  pub client_contact:    &'r str,
  pub service:           &'r str,
  pub date:              &'r str,
  pub time:              &'r str,
  pub status:            &'r str,
}

impl<'r> RawRow<'r> {
  pub fn read(record: &'r StringRecord, columns: &Columns) -> Result<Self> {
    let line = record.position().map_or(0, |p| p.line());
    let field = |index: usize| {
      record
        .get(index)
        .ok_or_else(|| parse_error(line, format!("row has no field {}", index + 1)))
    };

    Ok(Self {
      line,
      appointment_id:    field(columns.appointment_id)?,
      client_id:         field(columns.client_id)?,
      client_first_name: field(columns.client_first_name)?,
      client_last_name:  field(columns.client_last_name)?,
      client_contact:    field(columns.client_contact)?,
      service:           field(columns.service)?,
      date:              field(columns.date)?,
      time:              field(columns.time)?,
      status:            field(columns.status)?,
    })
  }

  pub fn client_id(&self) -> Result<u32> {
    decode_id(self.line, "client_id", self.client_id)
  }

  pub fn to_client(&self, client_id: u32) -> Client {
    Client {
      client_id,
      first_name: self.client_first_name.to_owned(),
      last_name:  self.client_last_name.to_owned(),
      contact:    self.client_contact.to_owned(),
    }
  }

  /// Build the appointment, attaching the already-resolved shared `client`.
  pub fn into_appointment(self, client: Rc<Client>) -> Result<Appointment> {
    Ok(Appointment {
      appointment_id: decode_id(self.line, "appointment_id", self.appointment_id)?,
      client,
      service:        self.service.to_owned(),
      scheduled_at:   decode_datetime(self.line, self.date, self.time)?,
      status:         self.status.to_owned(),
    })
  }
}
