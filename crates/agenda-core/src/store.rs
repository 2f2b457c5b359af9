//! The `AppointmentStore` trait.
//!
//! Implemented by storage backends (e.g. `agenda-store-csv`). The booking
//! workflow depends on this abstraction, not on any concrete backend.

use std::rc::Rc;

use crate::{Error, appointment::Appointment, client::Client, scan};

/// Abstraction over the system of record for appointments.
///
/// A backend stores whole snapshots: [`save_all`](Self::save_all) is the only
/// write path and always replaces everything previously stored. The derived
/// lookups reload the store on every call; nothing is cached between calls.
pub trait AppointmentStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an empty store if none exists yet. Succeeds if one already does.
  fn ensure_store(&self) -> Result<(), Self::Error>;

  /// Read every stored appointment in storage order.
  ///
  /// Appointments of the same client share a single [`Client`] instance; the
  /// first stored occurrence of a client identifier defines its fields.
  fn load_all(&self) -> Result<Vec<Appointment>, Self::Error>;

  /// Replace the stored contents with `appointments`.
  fn save_all(&self, appointments: &[Appointment]) -> Result<(), Self::Error>;

  /// Fails with [`Error::IdExhausted`] when the store already holds
  /// `u32::MAX`.
  fn next_appointment_id(&self) -> crate::Result<u32> {
    scan::next_appointment_id(&self.load_all().map_err(Error::store)?)
  }

  fn next_client_id(&self) -> crate::Result<u32> {
    scan::next_client_id(&self.load_all().map_err(Error::store)?)
  }

  fn find_client_by_contact(
    &self,
    contact: &str,
  ) -> Result<Option<Rc<Client>>, Self::Error> {
    Ok(scan::find_client_by_contact(&self.load_all()?, contact))
  }

  fn unique_clients(&self) -> Result<Vec<Rc<Client>>, Self::Error> {
    Ok(scan::unique_clients(&self.load_all()?))
  }
}
