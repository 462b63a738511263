use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatcher::TableId;

/// Image used whenever a record is added or edited without one.
pub const DEFAULT_IMAGE: &str = "images/alabai.png";

pub const HELP_TEXT: &str = "\
Commands:
  sort <table> <field>       Sort a table by species, name, image, size or location
  add <table>                Add an animal (prompts for each field)
  edit <table> <name>        Edit the animal with the given name
  delete <table> <name>      Delete every animal with the given name
  click <table> <trigger>    Activate a trigger from the rendered markup
  show <table>               Print the current markup of a table
  tables                     List the loaded tables
  help                       Show this help
  quit                       Leave";

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub species: String,
    pub name: String,
    pub size: String,
    pub location: String,
    #[serde(default = "default_image")]
    pub image: String,
}

impl AnimalRecord {
    pub fn new(
        species: impl Into<String>,
        name: impl Into<String>,
        size: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            name: name.into(),
            size: size.into(),
            location: location.into(),
            image: default_image(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Species => &self.species,
            Field::Name => &self.name,
            Field::Image => &self.image,
            Field::Size => &self.size,
            Field::Location => &self.location,
        }
    }
}

/// Columns of an animal table, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Species,
    Name,
    Image,
    Size,
    Location,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Species,
        Field::Name,
        Field::Image,
        Field::Size,
        Field::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Species => "species",
            Field::Name => "name",
            Field::Image => "image",
            Field::Size => "size",
            Field::Location => "location",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Species => "Species",
            Field::Name => "Name",
            Field::Image => "Image",
            Field::Size => "Size",
            Field::Location => "Location",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = TablesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TablesError::UnknownField(s.to_string()))
    }
}

/// Raw values collected by the UI for a new animal. Nothing is validated
/// until the form is turned into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalForm {
    pub species: String,
    pub name: String,
    pub size: String,
    pub location: String,
    pub image: String,
}

impl AnimalForm {
    pub fn into_record(self) -> Result<AnimalRecord, TablesError> {
        let required = [
            (Field::Species, &self.species),
            (Field::Name, &self.name),
            (Field::Size, &self.size),
            (Field::Location, &self.location),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(TablesError::MissingField(*field));
        }

        let image = if self.image.is_empty() {
            default_image()
        } else {
            self.image
        };
        Ok(AnimalRecord {
            species: self.species,
            name: self.name,
            size: self.size,
            location: self.location,
            image,
        })
    }
}

/// Replacement values for an existing animal. Empty entries keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub name: String,
    pub size: String,
    pub location: String,
    pub image: String,
}

impl EditForm {
    /// Name the record will carry once the form is applied.
    pub fn resulting_name<'a>(&'a self, record: &'a AnimalRecord) -> &'a str {
        if self.name.is_empty() {
            &record.name
        } else {
            &self.name
        }
    }

    pub fn apply(self, record: &mut AnimalRecord) {
        let replace = |target: &mut String, value: String| {
            if !value.is_empty() {
                *target = value;
            }
        };
        replace(&mut record.name, self.name);
        replace(&mut record.size, self.size);
        replace(&mut record.location, self.location);
        replace(&mut record.image, self.image);
    }
}

/// Identifies a record inside one table, either by its name or by the row it
/// was rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    Row(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Sort { table: TableId, field: Field },
    Add { table: TableId, form: AnimalForm },
    Edit { table: TableId, target: Target, form: EditForm },
    Delete { table: TableId, target: Target },
    Show(TableId),
    ListTables,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid animal data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate entry is not allowed! '{0}' already exists")]
    DuplicateName(String),
    #[error("All fields are required! {0} is empty")]
    MissingField(Field),
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("table '{table}' has no trigger {trigger}")]
    UnknownTrigger { table: String, trigger: usize },
    #[error("{0}")]
    InvalidCommand(String),
    #[error("cannot expand path '{path}': {reason}")]
    PathExpansion { path: String, reason: String },
}

impl TablesError {
    /// Rejections are reported to the user and leave all state untouched.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            TablesError::Io(_) | TablesError::Json(_) | TablesError::PathExpansion { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AnimalForm {
        AnimalForm {
            species: "Tiger".into(),
            name: "Shere Khan".into(),
            size: "10 ft".into(),
            location: "India".into(),
            image: String::new(),
        }
    }

    #[test]
    fn form_without_image_gets_placeholder() {
        let record = form().into_record().unwrap();
        assert_eq!(record.image, DEFAULT_IMAGE);
        assert_eq!(record.name, "Shere Khan");
    }

    #[test]
    fn form_reports_first_missing_field() {
        let mut f = form();
        f.species.clear();
        f.location.clear();
        assert!(matches!(
            f.into_record(),
            Err(TablesError::MissingField(Field::Species))
        ));
    }

    #[test]
    fn edit_form_keeps_values_left_empty() {
        let mut record = AnimalRecord::new("Dog", "Rex", "5 ft", "Home").with_image("rex.png");
        EditForm {
            size: "6 ft".into(),
            ..Default::default()
        }
        .apply(&mut record);
        assert_eq!(record.name, "Rex");
        assert_eq!(record.size, "6 ft");
        assert_eq!(record.location, "Home");
        assert_eq!(record.image, "rex.png");
    }

    #[test]
    fn field_parses_case_insensitively() {
        assert_eq!("Size".parse::<Field>().unwrap(), Field::Size);
        assert!(matches!(
            "weight".parse::<Field>(),
            Err(TablesError::UnknownField(_))
        ));
    }

    #[test]
    fn record_without_image_deserializes_with_placeholder() {
        let json = r#"{"species":"Shark","name":"Bruce","size":"20 ft","location":"Ocean"}"#;
        let record: AnimalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.image, DEFAULT_IMAGE);
    }

    #[test]
    fn io_errors_are_not_rejections() {
        let io = TablesError::Io(std::io::Error::other("disk"));
        assert!(!io.is_rejection());
        assert!(TablesError::DuplicateName("Rex".into()).is_rejection());
    }
}
