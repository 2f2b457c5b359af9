//! Line-oriented prompts over any reader/writer pair.

use std::{
  fmt::Display,
  io::{self, BufRead, Write},
};

/// The input ran out while a prompt was waiting for an answer.
#[derive(Debug, thiserror::Error)]
#[error("end of input")]
pub struct EndOfInput;

pub struct Console<R, W> {
  input:  R,
  output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
  pub fn new(input: R, output: W) -> Self { Self { input, output } }

  pub fn say(&mut self, line: impl Display) -> io::Result<()> {
    writeln!(self.output, "{line}")
  }

  pub fn banner(&mut self, title: &str) -> io::Result<()> {
    let rule = "=".repeat(40);
    writeln!(self.output, "\n{rule}\n{title}\n{rule}")
  }

  /// Print `label` and read one trimmed line.
  pub fn prompt(&mut self, label: impl Display) -> anyhow::Result<String> {
    write!(self.output, "{label}")?;
    self.output.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Err(EndOfInput.into());
    }
    Ok(line.trim().to_owned())
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;

  #[test]
  fn prompt_trims_and_reports_eof() {
    let mut out = Vec::new();
    let mut console = Console::new(Cursor::new("  Ada \n"), &mut out);

    assert_eq!(console.prompt("Name: ").unwrap(), "Ada");
    let err = console.prompt("Again: ").unwrap_err();
    assert!(err.is::<EndOfInput>());

    assert_eq!(String::from_utf8(out).unwrap(), "Name: Again: ");
  }
}
