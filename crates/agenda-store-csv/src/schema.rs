//! Column layout of the appointment table.
//!
//! Rows are written in [`header`] order. On read, columns are located by
//! header name, so a table whose columns were reordered by hand still loads.

use agenda_core::client::ContactKind;
use csv::StringRecord;

use crate::{Error, Result};

pub const APPOINTMENT_ID: &str = "appointment_id";
pub const CLIENT_ID: &str = "client_id";
pub const CLIENT_FIRST_NAME: &str = "client_first_name";
pub const CLIENT_LAST_NAME: &str = "client_last_name";
pub const SERVICE: &str = "service";
pub const DATE: &str = "date";
pub const TIME: &str = "time";
pub const STATUS: &str = "status";

/// The header row for a table carrying `contact` as its contact column.
pub fn header(contact: ContactKind) -> [&'static str; 9] {
  [
    APPOINTMENT_ID,
    CLIENT_ID,
    CLIENT_FIRST_NAME,
    CLIENT_LAST_NAME,
    contact.column(),
    SERVICE,
    DATE,
    TIME,
    STATUS,
  ]
}

/// Field positions resolved from a table's header row.
#[derive(Debug, Clone, Copy)]
pub struct Columns {
  pub appointment_id:    usize,
  pub client_id:         usize,
  pub client_first_name: usize,
  pub client_last_name:  usize,
  pub client_contact:    usize,
  pub service:           usize,
  pub date:              usize,
  pub time:              usize,
  pub status:            usize,
}

impl Columns {
  pub fn resolve(header: &StringRecord, contact: ContactKind) -> Result<Self> {
    let find = |name: &'static str| {
      header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(Error::MissingColumn(name))
    };

    Ok(Self {
      appointment_id:    find(APPOINTMENT_ID)?,
      client_id:         find(CLIENT_ID)?,
      client_first_name: find(CLIENT_FIRST_NAME)?,
      client_last_name:  find(CLIENT_LAST_NAME)?,
      client_contact:    find(contact.column())?,
      service:           find(SERVICE)?,
      date:              find(DATE)?,
      time:              find(TIME)?,
      status:            find(STATUS)?,
    })
  }
}
