//! Core types and the booking workflow for the Agenda appointment book.
//!
//! This crate does no I/O of its own. Storage backends implement
//! [`store::AppointmentStore`]; front ends drive an [`Agenda`] session.

pub mod agenda;
pub mod appointment;
pub mod client;
pub mod error;
pub mod input;
pub mod scan;
pub mod store;

pub use agenda::Agenda;
pub use error::{Error, Result};
