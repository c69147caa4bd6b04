//! Interactive menu session
//!
//! The session owns its `MenuState`. In `Main` a line picks a mode; in any
//! other state the line is handed to that mode's operation and the session
//! returns to `Main` whatever the outcome.

use std::io::Write;

use tracing::error;

use super::errors::CliResult;
use super::input::{parse_add_line, parse_find_line, parse_update_line};
use crate::directory::{DirectoryError, DirectoryService};
use crate::fields::{ValidationError, ValidationResult};
use crate::storage::{Contact, RecordStore};

pub const MAIN_MENU_TEXT: &str = "1. Add record\n\
                                  2. Update record\n\
                                  3. Find records\n\
                                  4. Get records by pages\n\
                                  5. Exit";

pub const ADD_RECORD_FORMAT: &str = "<name> <second_name> <middle_name> <organisation> <org_phone> <personal_phone>\n\
                                     Example: Vasya Pupkin Ivanovich Gazprom 12345 89214444444";

pub const UPDATE_RECORD_FORMAT: &str = "<id of record to update> name=<new name> second_name=<new second name> middle_name=<new middle name> organisation=<new organisation> org_phone=<new org_phone> personal_phone=<new personal_phone>\n\
                                        Example: 1 organisation=Gazprom personal_phone=+79214444444";

pub const FIND_RECORD_FORMAT: &str = "name=<name> second_name=<second_name> middle_name=<middle_name> organisation=<organisation> org_phone=<org_phone> personal_phone=<personal_phone>\n\
                                      You can skip fields\n\
                                      Example: name=Bob organisation=Gazprom";

pub const RECORDS_BY_PAGE_FORMAT: &str = "<page number>\nExample: 1";

pub const NO_RECORDS_FOUND: &str = "No records found on this page.";

/// Which line the session expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Main,
    AddRecord,
    UpdateRecord,
    FindRecords,
    GetPage,
}

impl MenuState {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(MenuState::AddRecord),
            "2" => Some(MenuState::UpdateRecord),
            "3" => Some(MenuState::FindRecords),
            "4" => Some(MenuState::GetPage),
            _ => None,
        }
    }

    fn input_format(&self) -> &'static str {
        match self {
            MenuState::Main => MAIN_MENU_TEXT,
            MenuState::AddRecord => ADD_RECORD_FORMAT,
            MenuState::UpdateRecord => UPDATE_RECORD_FORMAT,
            MenuState::FindRecords => FIND_RECORD_FORMAT,
            MenuState::GetPage => RECORDS_BY_PAGE_FORMAT,
        }
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive session over a directory.
pub struct MenuSession<S> {
    directory: DirectoryService<S>,
    state: MenuState,
}

impl<S: RecordStore> MenuSession<S> {
    pub fn new(directory: DirectoryService<S>) -> Self {
        Self {
            directory,
            state: MenuState::Main,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn directory(&self) -> &DirectoryService<S> {
        &self.directory
    }

    /// Prints the main menu if the session is waiting for a choice.
    pub fn prompt<W: Write>(&self, out: &mut W) -> CliResult<()> {
        if self.state == MenuState::Main {
            writeln!(out, "{}", MAIN_MENU_TEXT)?;
        }
        Ok(())
    }

    /// Handles one input line.
    ///
    /// # Errors
    ///
    /// Only output failures and storage failures; validation errors are
    /// printed and the session carries on.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> CliResult<Flow> {
        // Every mode returns to Main after one line.
        match std::mem::take(&mut self.state) {
            MenuState::Main => self.choose(line.trim(), out),
            mode => {
                self.dispatch(mode, line, out)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn choose<W: Write>(&mut self, choice: &str, out: &mut W) -> CliResult<Flow> {
        if choice == "5" {
            return Ok(Flow::Exit);
        }

        match MenuState::from_choice(choice) {
            Some(mode) => {
                writeln!(out, "Enter record data in format:\n{}", mode.input_format())?;
                self.state = mode;
            }
            None => writeln!(out, "Unknown action")?,
        }

        Ok(Flow::Continue)
    }

    fn dispatch<W: Write>(&mut self, mode: MenuState, line: &str, out: &mut W) -> CliResult<()> {
        match mode {
            MenuState::Main => Ok(()),
            MenuState::AddRecord => {
                let added = parsed(parse_add_line(line))
                    .and_then(|fields| self.directory.add_record(&fields));
                report(out, added, |out, _| {
                    writeln!(out, "Record added.")?;
                    Ok(())
                })
            }
            MenuState::UpdateRecord => {
                let updated = parsed(parse_update_line(line))
                    .and_then(|fields| self.directory.update_record(&fields));
                report(out, updated, |out, _| {
                    writeln!(out, "Record updated.")?;
                    Ok(())
                })
            }
            MenuState::FindRecords => {
                let found = parsed(parse_find_line(line))
                    .and_then(|filters| self.directory.find_records(&filters));
                report(out, found, |out, contacts| {
                    writeln!(out, "Found {} records:", contacts.len())?;
                    write_contacts(out, &contacts)
                })
            }
            MenuState::GetPage => {
                let page = self.directory.get_page(line);
                report(out, page, |out, contacts| {
                    writeln!(out, "Page {}:", line.trim())?;
                    if contacts.is_empty() {
                        writeln!(out, "{}", NO_RECORDS_FOUND)?;
                        return Ok(());
                    }
                    write_contacts(out, &contacts)
                })
            }
        }
    }
}

fn parsed<T>(result: ValidationResult<T>) -> Result<T, DirectoryError> {
    result.map_err(DirectoryError::from)
}

/// Writes the success output, prints validation errors, and escalates
/// storage errors.
fn report<W, T>(
    out: &mut W,
    result: Result<T, DirectoryError>,
    on_success: impl FnOnce(&mut W, T) -> CliResult<()>,
) -> CliResult<()>
where
    W: Write,
{
    match result {
        Ok(value) => on_success(out, value),
        Err(DirectoryError::Validation(e)) => write_validation_error(out, &e),
        Err(DirectoryError::Storage(e)) => {
            error!(
                code = e.code().code(),
                reason = e.message(),
                details = e.details(),
                "storage failure, ending session"
            );
            Err(e.into())
        }
    }
}

fn write_validation_error<W: Write>(out: &mut W, e: &ValidationError) -> CliResult<()> {
    match e {
        // Already ends with the format example.
        ValidationError::InvalidFormat { .. } => writeln!(out, "Error: {}", e)?,
        _ => writeln!(out, "Error: {}.", e)?,
    }
    Ok(())
}

fn write_contacts<W: Write>(out: &mut W, contacts: &[Contact]) -> CliResult<()> {
    for contact in contacts {
        writeln!(out, "{}", contact)?;
    }
    Ok(())
}
