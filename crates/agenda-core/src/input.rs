//! Parsing of operator-entered text.
//!
//! All parsers trim surrounding whitespace before parsing.

use chrono::{NaiveDate, NaiveTime};

use crate::{
  Error, Result,
  appointment::{DATE_FORMAT, TIME_FORMAT},
};

pub fn parse_date(text: &str) -> Result<NaiveDate> {
  let text = text.trim();
  NaiveDate::parse_from_str(text, DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(text.to_owned()))
}

pub fn parse_time(text: &str) -> Result<NaiveTime> {
  let text = text.trim();
  NaiveTime::parse_from_str(text, TIME_FORMAT)
    .map_err(|_| Error::InvalidTime(text.to_owned()))
}

/// Parse a positive entity identifier.
pub fn parse_id(text: &str) -> Result<u32> {
  let text = text.trim();
  match text.parse::<u32>() {
    Ok(id) if id > 0 => Ok(id),
    _ => Err(Error::InvalidId(text.to_owned())),
  }
}

/// Parse a 1-based menu selection into a 0-based index into a list of `len`
/// entries.
pub fn parse_selection(text: &str, len: usize) -> Result<usize> {
  let text = text.trim();
  let selection: usize = text
    .parse()
    .map_err(|_| Error::InvalidSelection(text.to_owned()))?;

  if (1..=len).contains(&selection) {
    Ok(selection - 1)
  } else {
    Err(Error::SelectionOutOfRange { selection, len })
  }
}
