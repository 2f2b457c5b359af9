//! [`Agenda`] — a booking session over an [`AppointmentStore`].
//!
//! The session loads a snapshot of the store once and serves every query from
//! it. Each mutation rewrites the whole store from the snapshot. Call
//! [`Agenda::reload`] to pick up changes written by someone else; nothing
//! guards against a second process writing the same store.

use std::rc::Rc;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  appointment::{Appointment, Change, Confirmation, KnownStatus, NewAppointment},
  client::{Client, NewClient},
  scan,
  store::AppointmentStore,
};

/// Outcome of [`Agenda::register_client`].
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
  /// A client with the same contact already existed and is returned as is.
  Existing(Rc<Client>),
  Created(Rc<Client>),
}

impl Registration {
  pub fn client(&self) -> &Rc<Client> {
    match self {
      Self::Existing(c) | Self::Created(c) => c,
    }
  }

  pub fn into_client(self) -> Rc<Client> {
    match self {
      Self::Existing(c) | Self::Created(c) => c,
    }
  }
}

pub struct Agenda<S: AppointmentStore> {
  store:               S,
  appointments:        Vec<Appointment>,
  /// Registered clients that no appointment references yet. The table has no
  /// row for them, so they only exist in this session until booked.
  pending_clients:     Vec<Rc<Client>>,
  /// Highest identifiers handed out or seen on disk this session.
  last_appointment_id: u32,
  last_client_id:      u32,
}

impl<S: AppointmentStore> Agenda<S> {
  /// Create the store if needed and load the initial snapshot.
  pub fn open(store: S) -> Result<Self> {
    store.ensure_store().map_err(Error::store)?;

    let mut agenda = Self {
      store,
      appointments: Vec::new(),
      pending_clients: Vec::new(),
      last_appointment_id: 0,
      last_client_id: 0,
    };
    agenda.reload()?;
    Ok(agenda)
  }

  pub fn store(&self) -> &S { &self.store }

  /// Replace the snapshot with the current store contents.
  ///
  /// Identifier counters never move backwards, so identifiers handed out
  /// earlier in this session are not reissued even if their appointments were
  /// cancelled. Pending clients whose contact now appears in the store are
  /// dropped in favour of the stored client.
  pub fn reload(&mut self) -> Result<()> {
    let appointments = self.store.load_all().map_err(Error::store)?;

    self
      .pending_clients
      .retain(|c| scan::find_client_by_contact(&appointments, &c.contact).is_none());

    self.last_appointment_id = self
      .last_appointment_id
      .max(scan::max_appointment_id(&appointments));
    self.last_client_id =
      self.last_client_id.max(scan::max_client_id(&appointments));

    tracing::debug!(
      appointments = appointments.len(),
      pending_clients = self.pending_clients.len(),
      "snapshot loaded"
    );
    self.appointments = appointments;
    Ok(())
  }

  /// Write the current snapshot to the store.
  pub fn save(&self) -> Result<()> {
    self.store.save_all(&self.appointments).map_err(Error::store)
  }

  /// Save and end the session.
  pub fn close(self) -> Result<()> {
    self.save()?;
    for client in &self.pending_clients {
      tracing::warn!(
        client_id = client.client_id,
        "client has no appointment and was not saved"
      );
    }
    Ok(())
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  /// Register a client, or return the existing one with the same contact.
  ///
  /// A new client is not written to the store until an appointment is booked
  /// for it.
  pub fn register_client(&mut self, input: NewClient) -> Result<Registration> {
    if let Some(existing) = self.find_client_by_contact(&input.contact) {
      tracing::debug!(client_id = existing.client_id, "client already registered");
      return Ok(Registration::Existing(existing));
    }

    let client_id = scan::successor(self.last_client_id)?;
    let client = Rc::new(Client {
      client_id,
      first_name: input.first_name,
      last_name:  input.last_name,
      contact:    input.contact,
    });
    self.last_client_id = client_id;
    self.pending_clients.push(Rc::clone(&client));

    tracing::info!(client_id, "client registered");
    Ok(Registration::Created(client))
  }

  pub fn find_client_by_contact(&self, contact: &str) -> Option<Rc<Client>> {
    scan::find_client_by_contact(&self.appointments, contact).or_else(|| {
      self
        .pending_clients
        .iter()
        .find(|c| c.contact == contact)
        .cloned()
    })
  }

  /// Stored clients in first-occurrence order, followed by pending clients in
  /// registration order.
  pub fn clients(&self) -> Vec<Rc<Client>> {
    let mut clients = scan::unique_clients(&self.appointments);
    clients.extend(self.pending_clients.iter().cloned());
    clients
  }

  pub fn client(&self, client_id: u32) -> Result<Rc<Client>> {
    self
      .appointments
      .iter()
      .map(|a| &a.client)
      .chain(&self.pending_clients)
      .find(|c| c.client_id == client_id)
      .cloned()
      .ok_or(Error::ClientNotFound(client_id))
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  /// Book an appointment with status `Pending` and persist the full list.
  ///
  /// The client must be known to this session, either stored or pending.
  pub fn book(&mut self, input: NewAppointment) -> Result<Appointment> {
    let client = self.client(input.client.client_id)?;
    let appointment_id = scan::successor(self.last_appointment_id)?;

    let appointment = Appointment {
      appointment_id,
      client:       Rc::clone(&client),
      service:      input.service,
      scheduled_at: input.scheduled_at,
      status:       KnownStatus::Pending.to_string(),
    };
    self.last_appointment_id = appointment_id;

    let pending_at = self
      .pending_clients
      .iter()
      .position(|c| c.client_id == client.client_id);
    let was_pending = pending_at.map(|i| self.pending_clients.remove(i));
    self.appointments.push(appointment.clone());

    if let Err(e) = self.save() {
      self.appointments.pop();
      if let (Some(i), Some(c)) = (pending_at, was_pending) {
        self.pending_clients.insert(i, c);
      }
      return Err(e);
    }

    tracing::info!(
      appointment_id = appointment.appointment_id,
      client_id = client.client_id,
      "appointment booked"
    );
    Ok(appointment)
  }

  /// Apply `change` to an appointment and persist the full list.
  pub fn modify(&mut self, appointment_id: u32, change: Change) -> Result<Appointment> {
    let index = self.index_of(appointment_id)?;
    let previous = self.appointments[index].clone();

    let target = &mut self.appointments[index];
    match change {
      Change::Service(service) => target.service = service,
      Change::Status(status) => target.status = status,
    }

    if let Err(e) = self.save() {
      self.appointments[index] = previous;
      return Err(e);
    }

    tracing::info!(appointment_id, "appointment modified");
    Ok(self.appointments[index].clone())
  }

  /// Remove an appointment and persist the full list.
  ///
  /// Returns `Ok(None)` without touching anything when the cancellation is
  /// declined. Unknown identifiers are an error either way.
  pub fn cancel(
    &mut self,
    appointment_id: u32,
    confirmation: Confirmation,
  ) -> Result<Option<Appointment>> {
    let index = self.index_of(appointment_id)?;
    if confirmation == Confirmation::Declined {
      return Ok(None);
    }

    let removed = self.appointments.remove(index);
    if let Err(e) = self.save() {
      self.appointments.insert(index, removed);
      return Err(e);
    }

    tracing::info!(appointment_id, "appointment cancelled");
    Ok(Some(removed))
  }

  pub fn appointment(&self, appointment_id: u32) -> Result<&Appointment> {
    self
      .appointments
      .iter()
      .find(|a| a.appointment_id == appointment_id)
      .ok_or(Error::AppointmentNotFound(appointment_id))
  }

  pub fn appointments(&self) -> &[Appointment] { &self.appointments }

  pub fn appointments_for_client(&self, client_id: u32) -> Vec<&Appointment> {
    self
      .appointments
      .iter()
      .filter(|a| a.client.client_id == client_id)
      .collect()
  }

  pub fn appointments_on(&self, date: NaiveDate) -> Vec<&Appointment> {
    self.appointments.iter().filter(|a| a.date() == date).collect()
  }

  fn index_of(&self, appointment_id: u32) -> Result<usize> {
    self
      .appointments
      .iter()
      .position(|a| a.appointment_id == appointment_id)
      .ok_or(Error::AppointmentNotFound(appointment_id))
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use chrono::NaiveDateTime;

  use super::*;
  use crate::input::{parse_date, parse_time};

  #[derive(Debug, thiserror::Error)]
  #[error("write refused")]
  struct WriteRefused;

  /// Keeps the "stored" snapshot in memory and counts writes.
  #[derive(Default)]
  struct MemoryStore {
    rows:        RefCell<Vec<Appointment>>,
    saves:       Cell<usize>,
    refuse_save: Cell<bool>,
  }

  impl AppointmentStore for MemoryStore {
    type Error = WriteRefused;

    fn ensure_store(&self) -> Result<(), WriteRefused> { Ok(()) }

    fn load_all(&self) -> Result<Vec<Appointment>, WriteRefused> {
      Ok(self.rows.borrow().clone())
    }

    fn save_all(&self, appointments: &[Appointment]) -> Result<(), WriteRefused> {
      if self.refuse_save.get() {
        return Err(WriteRefused);
      }
      self.saves.set(self.saves.get() + 1);
      *self.rows.borrow_mut() = appointments.to_vec();
      Ok(())
    }
  }

  fn at(date: &str, time: &str) -> NaiveDateTime {
    parse_date(date).unwrap().and_time(parse_time(time).unwrap())
  }

  fn agenda() -> Agenda<MemoryStore> { Agenda::open(MemoryStore::default()).unwrap() }

  fn book(agenda: &mut Agenda<MemoryStore>, contact: &str, date: &str) -> Appointment {
    let client = agenda
      .register_client(NewClient::new("Test", "Client", contact))
      .unwrap()
      .into_client();
    agenda
      .book(NewAppointment::new(client, "Consultation", at(date, "10:00")))
      .unwrap()
  }

  fn ids(appointments: &[Appointment]) -> Vec<u32> {
    appointments.iter().map(|a| a.appointment_id).collect()
  }

  #[test]
  fn registration_is_idempotent_by_contact() {
    let mut a = agenda();

    let first = a
      .register_client(NewClient::new("Ada", "Lovelace", "ada@example.com"))
      .unwrap();
    let again = a
      .register_client(NewClient::new("Someone", "Else", "ada@example.com"))
      .unwrap();

    assert!(matches!(first, Registration::Created(_)));
    assert!(matches!(again, Registration::Existing(_)));
    assert_eq!(first.client().client_id, again.client().client_id);
    assert_eq!(again.client().first_name, "Ada");
    assert_eq!(a.clients().len(), 1);
  }

  #[test]
  fn registration_does_not_write_the_store() {
    let mut a = agenda();
    a.register_client(NewClient::new("Ada", "Lovelace", "ada@example.com"))
      .unwrap();

    assert_eq!(a.store().saves.get(), 0);
    assert!(a.store().rows.borrow().is_empty());
  }

  #[test]
  fn booking_persists_with_pending_status() {
    let mut a = agenda();
    let appt = book(&mut a, "ada@example.com", "2025-01-10");

    assert_eq!(appt.appointment_id, 1);
    assert_eq!(appt.status, "Pending");
    assert_eq!(a.store().saves.get(), 1);
    assert_eq!(*a.store().rows.borrow(), vec![appt]);
  }

  #[test]
  fn booking_requires_a_known_client() {
    let mut a = agenda();
    let stranger = Rc::new(Client {
      client_id:  42,
      first_name: "No".into(),
      last_name:  "Body".into(),
      contact:    "nobody@example.com".into(),
    });

    let err = a
      .book(NewAppointment::new(stranger, "Consultation", at("2025-01-10", "10:00")))
      .unwrap_err();
    assert!(matches!(err, Error::ClientNotFound(42)));
    assert!(a.appointments().is_empty());
  }

  #[test]
  fn cancelled_ids_are_not_reissued() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");
    book(&mut a, "a@example.com", "2025-01-11");
    let third = book(&mut a, "a@example.com", "2025-01-12");

    a.cancel(third.appointment_id, Confirmation::Confirmed).unwrap();
    a.reload().unwrap();
    let fourth = book(&mut a, "a@example.com", "2025-01-13");

    assert_eq!(fourth.appointment_id, 4);
    assert_eq!(ids(a.appointments()), [1, 2, 4]);
  }

  #[test]
  fn cancel_removes_exactly_one_in_order() {
    let mut a = agenda();
    for contact in ["a@example.com", "b@example.com", "c@example.com"] {
      book(&mut a, contact, "2025-01-10");
    }

    let removed = a.cancel(2, Confirmation::Confirmed).unwrap().unwrap();

    assert_eq!(removed.appointment_id, 2);
    assert_eq!(ids(a.appointments()), [1, 3]);
    assert_eq!(ids(&a.store().rows.borrow()), [1, 3]);
  }

  #[test]
  fn declined_cancel_changes_nothing() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");
    let saves = a.store().saves.get();

    assert!(a.cancel(1, Confirmation::Declined).unwrap().is_none());
    assert_eq!(a.appointments().len(), 1);
    assert_eq!(a.store().saves.get(), saves);
  }

  #[test]
  fn unknown_appointment_is_not_found() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");

    assert!(matches!(
      a.modify(9, Change::Status("Confirmed".into())),
      Err(Error::AppointmentNotFound(9))
    ));
    assert!(matches!(
      a.cancel(9, Confirmation::Declined),
      Err(Error::AppointmentNotFound(9))
    ));
    assert!(matches!(a.appointment(9), Err(Error::AppointmentNotFound(9))));
  }

  #[test]
  fn modify_touches_only_the_target() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");
    book(&mut a, "b@example.com", "2025-01-11");
    book(&mut a, "c@example.com", "2025-01-12");

    a.modify(2, Change::Status("No-show".into())).unwrap();
    a.reload().unwrap();

    let statuses: Vec<&str> = a.appointments().iter().map(|x| x.status.as_str()).collect();
    let services: Vec<&str> = a.appointments().iter().map(|x| x.service.as_str()).collect();
    assert_eq!(statuses, ["Pending", "No-show", "Pending"]);
    assert_eq!(services, ["Consultation"; 3]);
  }

  #[test]
  fn failed_save_rolls_back_the_snapshot() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");
    let pending = a
      .register_client(NewClient::new("New", "Client", "new@example.com"))
      .unwrap()
      .into_client();
    a.store().refuse_save.set(true);

    assert!(matches!(
      a.book(NewAppointment::new(Rc::clone(&pending), "X", at("2025-01-11", "09:00"))),
      Err(Error::Store(_))
    ));
    assert!(a.modify(1, Change::Service("Other".into())).is_err());
    assert!(a.cancel(1, Confirmation::Confirmed).is_err());

    assert_eq!(ids(a.appointments()), [1]);
    assert_eq!(a.appointments()[0].service, "Consultation");
    assert_eq!(a.client(pending.client_id).unwrap(), pending);
  }

  #[test]
  fn searches_by_client_and_date() {
    let mut a = agenda();
    let first = book(&mut a, "a@example.com", "2025-01-10");
    let second = book(&mut a, "b@example.com", "2025-01-11");

    let on_10th = a.appointments_on(parse_date("2025-01-10").unwrap());
    assert_eq!(on_10th, [&first]);

    let for_b = a.appointments_for_client(second.client.client_id);
    assert_eq!(for_b, [&second]);

    assert!(a.appointments_on(parse_date("2025-01-12").unwrap()).is_empty());
  }

  #[test]
  fn pending_clients_are_listed_after_stored_ones() {
    let mut a = agenda();
    book(&mut a, "a@example.com", "2025-01-10");
    a.register_client(NewClient::new("Pending", "Person", "p@example.com"))
      .unwrap();

    let contacts: Vec<String> = a.clients().iter().map(|c| c.contact.clone()).collect();
    assert_eq!(contacts, ["a@example.com", "p@example.com"]);
    assert_eq!(a.clients()[1].client_id, 2);
  }

  #[test]
  fn exhausted_ids_refuse_new_entries_but_keep_the_snapshot() {
    let top = Rc::new(Client {
      client_id:  u32::MAX,
      first_name: "Last".into(),
      last_name:  "One".into(),
      contact:    "last@example.com".into(),
    });
    let store = MemoryStore::default();
    store.rows.borrow_mut().push(Appointment {
      appointment_id: u32::MAX,
      client:         Rc::clone(&top),
      service:        "Consultation".into(),
      scheduled_at:   at("2025-01-10", "10:00"),
      status:         "Pending".into(),
    });

    let mut a = Agenda::open(store).unwrap();
    assert_eq!(ids(a.appointments()), [u32::MAX]);

    let err = a
      .register_client(NewClient::new("New", "Client", "new@example.com"))
      .unwrap_err();
    assert!(matches!(err, Error::IdExhausted));
    assert!(!err.is_input());

    let err = a
      .book(NewAppointment::new(top, "Again", at("2025-01-11", "10:00")))
      .unwrap_err();
    assert!(matches!(err, Error::IdExhausted));
    assert_eq!(ids(a.appointments()), [u32::MAX]);
    assert_eq!(a.store().saves.get(), 0);
  }
}
