//! The numbered text menu and one handler per menu entry.
//!
//! Handlers report operator mistakes (bad dates, unknown identifiers,
//! out-of-range selections) and return to the menu. Only console I/O failures
//! end the session early; end of input exits like the "Exit" entry.

use std::{
  io::{self, BufRead, Write},
  rc::Rc,
};

use agenda_core::{
  Agenda, Error,
  agenda::Registration,
  appointment::{Change, Confirmation, KnownStatus, NewAppointment},
  client::{Client, ContactKind, NewClient},
  input::{parse_date, parse_id, parse_selection, parse_time},
  store::AppointmentStore,
};
use strum::IntoEnumIterator;

use crate::console::{Console, EndOfInput};

pub struct App<S: AppointmentStore, R, W> {
  agenda:             Agenda<S>,
  console:            Console<R, W>,
  contact:            ContactKind,
  reload_per_command: bool,
}

impl<S, R, W> App<S, R, W>
where
  S: AppointmentStore,
  R: BufRead,
  W: Write,
{
  pub fn new(
    agenda: Agenda<S>,
    console: Console<R, W>,
    contact: ContactKind,
    reload_per_command: bool,
  ) -> Self {
    Self { agenda, console, contact, reload_per_command }
  }

  /// Run the menu until the operator exits or input ends, then save.
  pub fn run(mut self) -> anyhow::Result<()> {
    loop {
      self.show_menu()?;
      let choice = match self.console.prompt("\nOption: ") {
        Ok(choice) => choice,
        Err(e) if e.is::<EndOfInput>() => break,
        Err(e) => return Err(e),
      };
      if choice == "0" {
        break;
      }

      let result = self.dispatch(&choice);
      match result {
        Ok(()) => {}
        Err(e) if e.is::<EndOfInput>() => break,
        Err(e) if e.is::<io::Error>() => return Err(e),
        Err(e) => {
          match e.downcast_ref::<Error>() {
            Some(err) if err.is_input() => {
              tracing::debug!(error = %e, option = %choice, "rejected input");
            }
            _ => tracing::warn!(error = %e, option = %choice, "menu command failed"),
          }
          self.console.say(format!("Error: {e}"))?;
        }
      }
    }

    let Self { agenda, mut console, .. } = self;
    agenda.close()?;
    console.say("Agenda closed")?;
    Ok(())
  }

  fn show_menu(&mut self) -> io::Result<()> {
    self.console.banner("APPOINTMENT BOOK")?;
    for entry in [
      "1. Register client",
      "2. Book appointment",
      "3. List appointments",
      "4. Modify appointment",
      "5. Cancel appointment",
      "6. Search appointments",
      "7. Save",
      "0. Exit",
    ] {
      self.console.say(entry)?;
    }
    Ok(())
  }

  fn dispatch(&mut self, choice: &str) -> anyhow::Result<()> {
    if self.reload_per_command {
      self.agenda.reload()?;
    }

    match choice {
      "1" => self.register_client().map(drop),
      "2" => self.book(),
      "3" => self.list(),
      "4" => self.modify(),
      "5" => self.cancel(),
      "6" => self.search(),
      "7" => {
        self.agenda.save()?;
        self.console.say("Data saved")?;
        Ok(())
      }
      _ => Ok(self.console.say("Invalid option")?),
    }
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  fn register_client(&mut self) -> anyhow::Result<Rc<Client>> {
    self.console.banner("REGISTER CLIENT")?;
    let first_name = self.console.prompt("First name: ")?;
    let last_name = self.console.prompt("Last name: ")?;
    let contact = self.console.prompt(format!("{}: ", self.contact.label()))?;

    let registration = self
      .agenda
      .register_client(NewClient::new(first_name, last_name, contact))?;
    match &registration {
      Registration::Existing(c) => {
        self.console.say(format!("Client already exists: {c}"))?;
      }
      Registration::Created(c) => {
        self.console.say(format!("Client created: {c}"))?;
        self
          .console
          .say("The client is saved together with their first appointment.")?;
      }
    }
    Ok(registration.into_client())
  }

  /// List clients and let the operator pick one. `None` when the selection is
  /// out of range or there is nobody to pick.
  fn select_client(&mut self) -> anyhow::Result<Option<Rc<Client>>> {
    let clients = self.agenda.clients();
    if clients.is_empty() {
      self.console.say("No clients")?;
      return Ok(None);
    }

    self.console.say("\nClients:")?;
    for (i, client) in clients.iter().enumerate() {
      self.console.say(format!("{}. {client}", i + 1))?;
    }

    let answer = self
      .console
      .prompt(format!("Select (1-{}): ", clients.len()))?;
    match parse_selection(&answer, clients.len()) {
      Ok(index) => Ok(Some(Rc::clone(&clients[index]))),
      Err(Error::SelectionOutOfRange { .. }) => {
        self.console.say("No client selected")?;
        Ok(None)
      }
      Err(e) => Err(e.into()),
    }
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  fn book(&mut self) -> anyhow::Result<()> {
    self.console.banner("BOOK APPOINTMENT")?;

    let client = if self.agenda.clients().is_empty() {
      self.console.say("No clients yet. Registering a new client...")?;
      self.register_client()?
    } else {
      self.console.say("1. Existing client")?;
      self.console.say("2. New client")?;
      if self.console.prompt("Select (1-2): ")? == "1" {
        match self.select_client()? {
          Some(client) => client,
          None => return Ok(()),
        }
      } else {
        self.register_client()?
      }
    };

    self.console.say(format!("\nAppointment for: {client}"))?;
    let date = parse_date(&self.console.prompt("Date (YYYY-MM-DD): ")?)?;
    let time = parse_time(&self.console.prompt("Time (HH:MM): ")?)?;
    let service = self.console.prompt("Service: ")?;

    let appointment = self
      .agenda
      .book(NewAppointment::new(client, service, date.and_time(time)))?;
    self.console.say(format!("Appointment booked: {appointment}"))?;
    Ok(())
  }

  fn list(&mut self) -> anyhow::Result<()> {
    self.console.banner("APPOINTMENTS")?;

    let appointments = self.agenda.appointments();
    if appointments.is_empty() {
      self.console.say("No appointments")?;
      return Ok(());
    }
    for appointment in appointments {
      self.console.say(appointment)?;
    }
    self
      .console
      .say(format!("\nTotal: {} appointments", appointments.len()))?;
    Ok(())
  }

  /// Ask for an appointment identifier and show the appointment. `None` when
  /// there are no appointments at all.
  fn pick_appointment(&mut self) -> anyhow::Result<Option<u32>> {
    if self.agenda.appointments().is_empty() {
      self.console.say("No appointments")?;
      return Ok(None);
    }

    let id = parse_id(&self.console.prompt("Appointment ID: ")?)?;
    let appointment = self.agenda.appointment(id)?;
    self.console.say(format!("Appointment: {appointment}"))?;
    Ok(Some(id))
  }

  fn modify(&mut self) -> anyhow::Result<()> {
    self.console.banner("MODIFY APPOINTMENT")?;
    let Some(id) = self.pick_appointment()? else {
      return Ok(());
    };

    self.console.say("\n1. Change service")?;
    self.console.say("2. Change status")?;
    let change = match self.console.prompt("Select (1-2): ")?.as_str() {
      "1" => Change::Service(self.console.prompt("New service: ")?),
      "2" => {
        let known: Vec<String> = KnownStatus::iter().map(|s| s.to_string()).collect();
        self.console.say(format!("Statuses: {}", known.join(", ")))?;
        Change::Status(self.console.prompt("New status: ")?)
      }
      _ => {
        self.console.say("Invalid option")?;
        return Ok(());
      }
    };

    let message = match change {
      Change::Service(_) => "Service updated",
      Change::Status(_) => "Status updated",
    };
    self.agenda.modify(id, change)?;
    self.console.say(message)?;
    Ok(())
  }

  fn cancel(&mut self) -> anyhow::Result<()> {
    self.console.banner("CANCEL APPOINTMENT")?;
    let Some(id) = self.pick_appointment()? else {
      return Ok(());
    };

    let answer = self.console.prompt("Cancel? (y/n): ")?.to_lowercase();
    let confirmation = if matches!(answer.as_str(), "y" | "yes") {
      Confirmation::Confirmed
    } else {
      Confirmation::Declined
    };

    match self.agenda.cancel(id, confirmation)? {
      Some(_) => self.console.say("Appointment cancelled")?,
      None => self.console.say("Not cancelled")?,
    }
    Ok(())
  }

  fn search(&mut self) -> anyhow::Result<()> {
    self.console.banner("SEARCH APPOINTMENTS")?;
    if self.agenda.appointments().is_empty() {
      self.console.say("No appointments")?;
      return Ok(());
    }

    self.console.say("1. By client")?;
    self.console.say("2. By date")?;
    match self.console.prompt("Select (1-2): ")?.as_str() {
      "1" => {
        let Some(client) = self.select_client()? else {
          return Ok(());
        };
        self.console.say(format!("\nAppointments for {client}:"))?;
        let found = self.agenda.appointments_for_client(client.client_id);
        if found.is_empty() {
          self.console.say("No appointments for this client")?;
        }
        for appointment in found {
          self.console.say(appointment)?;
        }
      }
      "2" => {
        let date = parse_date(&self.console.prompt("Date (YYYY-MM-DD): ")?)?;
        self.console.say(format!("\nAppointments on {date}:"))?;
        let found = self.agenda.appointments_on(date);
        if found.is_empty() {
          self.console.say("No appointments on this date")?;
        }
        for appointment in found {
          self.console.say(appointment)?;
        }
      }
      _ => self.console.say("Invalid option")?,
    }
    Ok(())
  }
}
