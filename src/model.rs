use tracing::{debug, info, warn};

use crate::controller::describe_sortable;
use crate::dispatcher::{Dispatcher, TableId};
use crate::domain::{HELP_TEXT, Message, TablesError, Target};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug)]
pub struct Model {
    pub status: Status,
    tables: Dispatcher,
    revision: u64,
    status_message: Option<String>,
}

impl Model {
    pub fn init(tables: Dispatcher) -> Self {
        Self {
            status: Status::READY,
            tables,
            revision: 0,
            status_message: None,
        }
    }

    pub fn tables(&self) -> &Dispatcher {
        &self.tables
    }

    /// Incremented after every change to a table.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn take_status_message(&mut self) -> Option<String> {
        self.status_message.take()
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Shows a rejected action to the user. Anything else is handed back.
    pub fn report(&mut self, err: TablesError) -> Result<(), TablesError> {
        if !err.is_rejection() {
            return Err(err);
        }
        warn!("{err}");
        self.set_status_message(err.to_string());
        Ok(())
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Message) -> Result<(), TablesError> {
        debug!("Update: {message:?}");
        match self.apply(message) {
            Ok(changed) => {
                if changed {
                    self.revision += 1;
                }
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    // Returns whether any table changed
    fn apply(&mut self, message: Message) -> Result<bool, TablesError> {
        match message {
            Message::Quit => {
                self.quit();
                Ok(false)
            }
            Message::Help => {
                self.set_status_message(HELP_TEXT);
                Ok(false)
            }
            Message::ListTables => {
                let listing: Vec<String> = self
                    .tables
                    .tables()
                    .iter()
                    .map(|t| {
                        format!(
                            "{}: {} animals, {}",
                            t.key(),
                            t.records().len(),
                            describe_sortable(t.sortable())
                        )
                    })
                    .collect();
                self.set_status_message(listing.join("\n"));
                Ok(false)
            }
            Message::Show(table) => {
                let markup = self.tables.table(table).markup().to_string();
                self.set_status_message(markup);
                Ok(false)
            }
            Message::Sort { table, field } => {
                self.tables.table_mut(table).sort(field);
                Ok(true)
            }
            Message::Add { table, form } => {
                self.tables.table_mut(table).request_add(form)?;
                info!("Added animal to {}", self.key(table));
                Ok(true)
            }
            Message::Edit { table, target, form } => {
                let t = self.tables.table_mut(table);
                let changed = match target {
                    Target::Name(name) => t.edit(&name, form)?,
                    Target::Row(row) => t.edit_at(row, form)?,
                };
                Ok(changed)
            }
            Message::Delete { table, target } => {
                let t = self.tables.table_mut(table);
                let removed = match target {
                    Target::Name(name) => t.delete(&name),
                    Target::Row(row) => usize::from(t.delete_at(row).is_some()),
                };
                if removed > 0 {
                    info!("Deleted {removed} animal(s) from {}", self.key(table));
                }
                Ok(removed > 0)
            }
        }
    }

    fn key(&self, table: TableId) -> &str {
        self.tables.table(table).key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnimalForm, AnimalRecord, EditForm, Field};
    use crate::table::AnimalTable;

    fn model() -> Model {
        Model::init(Dispatcher::new(vec![AnimalTable::new(
            vec![
                AnimalRecord::new("Dog", "Rex", "5 ft", "Yard"),
                AnimalRecord::new("Dog", "Fido", "2 ft", "Couch"),
            ],
            "dogsTable",
            vec![Field::Name, Field::Location],
        )]))
    }

    fn dogs(m: &Model) -> TableId {
        m.tables().resolve("dogsTable").unwrap()
    }

    #[test]
    fn mutations_bump_the_revision() {
        let mut m = model();
        let table = dogs(&m);
        m.update(Message::Sort {
            table,
            field: Field::Name,
        })
        .unwrap();
        assert_eq!(m.revision(), 1);
        assert_eq!(m.tables().table(table).records()[0].name, "Fido");
    }

    #[test]
    fn rejected_add_becomes_status_message() {
        let mut m = model();
        let table = dogs(&m);
        let form = AnimalForm {
            species: "Dog".into(),
            name: "Rex".into(),
            size: "3 ft".into(),
            location: "Park".into(),
            image: String::new(),
        };
        m.update(Message::Add { table, form }).unwrap();
        assert_eq!(m.revision(), 0);
        assert!(m.take_status_message().unwrap().contains("Duplicate entry"));
        assert_eq!(m.tables().table(table).records().len(), 2);
    }

    #[test]
    fn delete_of_missing_name_changes_nothing() {
        let mut m = model();
        let table = dogs(&m);
        m.update(Message::Delete {
            table,
            target: Target::Name("Nobody".into()),
        })
        .unwrap();
        assert_eq!(m.revision(), 0);
        assert!(m.status_message().is_none());
    }

    #[test]
    fn delete_by_row_removes_that_record() {
        let mut m = model();
        let table = dogs(&m);
        m.update(Message::Delete {
            table,
            target: Target::Row(1),
        })
        .unwrap();
        let names: Vec<&str> = m
            .tables()
            .table(table)
            .records()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, ["Rex"]);
        assert_eq!(m.revision(), 1);
    }

    #[test]
    fn edit_by_row_renames_record() {
        let mut m = model();
        let table = dogs(&m);
        m.update(Message::Edit {
            table,
            target: Target::Row(0),
            form: EditForm {
                name: "Max".into(),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(m.tables().table(table).records()[0].name, "Max");
    }

    #[test]
    fn listing_mentions_sortable_fields() {
        let mut m = model();
        m.update(Message::ListTables).unwrap();
        assert_eq!(
            m.status_message(),
            Some("dogsTable: 2 animals, sortable by name, location")
        );
    }

    #[test]
    fn fatal_errors_are_not_swallowed() {
        let mut m = model();
        let err = m.report(TablesError::Io(std::io::Error::other("disk full")));
        assert!(err.is_err());
    }

    #[test]
    fn quit_changes_status() {
        let mut m = model();
        m.update(Message::Quit).unwrap();
        assert_eq!(m.status, Status::QUITTING);
    }
}
