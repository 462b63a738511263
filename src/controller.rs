use tracing::{debug, trace};

use crate::domain::{Field, Message, TablesError, Target};
use crate::inputter::{Inputter, Prompt};
use crate::model::Model;
use crate::ui::Trigger;

/// Turns user input into [`Message`]s for the model.
pub struct Controller<P> {
    inputter: Inputter<P>,
}

impl<P: Prompt> Controller<P> {
    pub fn new(inputter: Inputter<P>) -> Self {
        Self { inputter }
    }

    /// Reads the next command. End of input maps to [`Message::Quit`].
    pub fn handle_event(&mut self, model: &Model) -> Result<Option<Message>, TablesError> {
        let Some(line) = self.inputter.command()? else {
            return Ok(Some(Message::Quit));
        };
        let message = self.handle_command(model, &line)?;
        trace!("Mapped: {line:?} => {message:?}");
        Ok(message)
    }

    fn handle_command(&mut self, model: &Model, line: &str) -> Result<Option<Message>, TablesError> {
        let line = line.trim();
        let (command, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args = args.trim();

        let message = match command {
            "" => None,
            "quit" | "exit" => Some(Message::Quit),
            "help" => Some(Message::Help),
            "tables" => Some(Message::ListTables),
            "show" => Some(Message::Show(model.tables().resolve(args)?)),
            "sort" => {
                let (key, field) = split_key(args, "sort <table> <field>")?;
                Some(Message::Sort {
                    table: model.tables().resolve(key)?,
                    field: field.parse()?,
                })
            }
            "add" => {
                let table = model.tables().resolve(args)?;
                let form = self.inputter.add_form()?;
                Some(Message::Add { table, form })
            }
            "edit" => {
                let (key, name) = split_key(args, "edit <table> <name>")?;
                self.edit(model, key, Target::Name(name.to_string()))?
            }
            "delete" => {
                let (key, name) = split_key(args, "delete <table> <name>")?;
                Some(Message::Delete {
                    table: model.tables().resolve(key)?,
                    target: Target::Name(name.to_string()),
                })
            }
            "click" => {
                let (key, id) = split_key(args, "click <table> <trigger>")?;
                let id = id.parse().map_err(|_| {
                    TablesError::InvalidCommand(format!("'{id}' is not a trigger id"))
                })?;
                self.click(model, key, id)?
            }
            other => {
                return Err(TablesError::InvalidCommand(format!(
                    "Unknown command '{other}', try 'help'"
                )));
            }
        };
        Ok(message)
    }

    fn click(&mut self, model: &Model, key: &str, id: usize) -> Result<Option<Message>, TablesError> {
        let (table, trigger) = model.tables().trigger(key, id)?;
        debug!("Trigger {id} on {key}: {trigger:?}");
        let message = match trigger {
            Trigger::Sort(field) => Some(Message::Sort { table, field }),
            Trigger::Edit(row) => self.edit(model, key, Target::Row(row))?,
            Trigger::Delete(row) => Some(Message::Delete {
                table,
                target: Target::Row(row),
            }),
            Trigger::Add => Some(Message::Add {
                table,
                form: self.inputter.add_form()?,
            }),
        };
        Ok(message)
    }

    // Unknown records end the edit before anything is asked
    fn edit(&mut self, model: &Model, key: &str, target: Target) -> Result<Option<Message>, TablesError> {
        let table = model.tables().resolve(key)?;
        let records = model.tables().table(table).records();
        let current = match &target {
            Target::Name(name) => records.iter().find(|a| &a.name == name),
            Target::Row(row) => records.get(*row),
        };
        let Some(current) = current else {
            debug!("No record {target:?} in {key}");
            return Ok(None);
        };
        let form = self.inputter.edit_form(current)?;
        Ok(Some(Message::Edit {
            table,
            target,
            form,
        }))
    }
}

fn split_key<'a>(args: &'a str, usage: &str) -> Result<(&'a str, &'a str), TablesError> {
    match args.split_once(char::is_whitespace) {
        Some((key, rest)) if !rest.trim().is_empty() => Ok((key, rest.trim())),
        _ => Err(TablesError::InvalidCommand(format!("Usage: {usage}"))),
    }
}

/// Sortable fields of a table, for help and listings.
pub fn describe_sortable(fields: &[Field]) -> String {
    if fields.is_empty() {
        return "not sortable".to_string();
    }
    let names: Vec<&str> = fields.iter().map(Field::as_str).collect();
    format!("sortable by {}", names.join(", "))
}
