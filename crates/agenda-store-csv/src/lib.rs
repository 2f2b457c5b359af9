//! Flat-file backend for the Agenda appointment book.
//!
//! The whole book lives in one CSV table with one denormalized row per
//! appointment. Every save rewrites the table through a temporary file that is
//! renamed over the original.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::CsvStore;
