//! Linear scans over a loaded appointment list.
//!
//! Identifiers are derived, not stored: the next identifier of each entity
//! type is the current maximum plus one.

use std::{collections::HashSet, rc::Rc};

use crate::{Error, Result, appointment::Appointment, client::Client};

/// Highest appointment identifier in use, `0` for an empty list.
pub fn max_appointment_id(appointments: &[Appointment]) -> u32 {
  appointments.iter().map(|a| a.appointment_id).max().unwrap_or(0)
}

/// Highest client identifier in use, `0` for an empty list.
pub fn max_client_id(appointments: &[Appointment]) -> u32 {
  appointments.iter().map(|a| a.client.client_id).max().unwrap_or(0)
}

/// The identifier after `last`, or [`Error::IdExhausted`] past `u32::MAX`.
pub fn successor(last: u32) -> Result<u32> {
  last.checked_add(1).ok_or(Error::IdExhausted)
}

pub fn next_appointment_id(appointments: &[Appointment]) -> Result<u32> {
  successor(max_appointment_id(appointments))
}

pub fn next_client_id(appointments: &[Appointment]) -> Result<u32> {
  successor(max_client_id(appointments))
}

/// First client (in load order) whose contact equals `contact` exactly.
pub fn find_client_by_contact(
  appointments: &[Appointment],
  contact: &str,
) -> Option<Rc<Client>> {
  appointments
    .iter()
    .map(|a| &a.client)
    .find(|c| c.contact == contact)
    .cloned()
}

/// Distinct clients in first-occurrence order, deduplicated by identifier.
pub fn unique_clients(appointments: &[Appointment]) -> Vec<Rc<Client>> {
  let mut seen = HashSet::new();
  appointments
    .iter()
    .map(|a| &a.client)
    .filter(|c| seen.insert(c.client_id))
    .cloned()
    .collect()
}
