use std::fs;
use std::path::{Path, PathBuf};

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Field, TablesError};

/// One table on the page and the resource it is populated from.
#[derive(Debug, Clone, PartialEq, Setters, Serialize, Deserialize)]
#[setters(into)]
pub struct TableSpec {
    pub key: String,
    pub title: String,
    pub resource: PathBuf,
    pub sortable: Vec<Field>,
}

impl TableSpec {
    pub fn new(key: impl Into<String>, resource: impl Into<PathBuf>) -> Self {
        let key = key.into();
        Self {
            title: key.clone(),
            key,
            resource: resource.into(),
            sortable: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Setters, Serialize, Deserialize)]
#[setters(into)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub tables: Vec<TableSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Animal Tables".to_string(),
            data_dir: PathBuf::from("data"),
            output: PathBuf::from("animals.html"),
            tables: vec![
                TableSpec::new("bigCatsTable", "bigCats.json")
                    .title("Big Cats")
                    .sortable([Field::Name, Field::Size, Field::Location]),
                TableSpec::new("dogsTable", "dogs.json")
                    .title("Dogs")
                    .sortable([Field::Name, Field::Location]),
                TableSpec::new("bigFishTable", "bigFish.json")
                    .title("Big Fish")
                    .sortable([Field::Size]),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, TablesError> {
        debug!("Reading config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Expands `~` and environment variables in the data directory and output path.
    pub fn expanded(mut self) -> Result<Self, TablesError> {
        self.data_dir = expand_path(&self.data_dir)?;
        self.output = expand_path(&self.output)?;
        Ok(self)
    }
}

pub fn expand_path(path: &Path) -> Result<PathBuf, TablesError> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw).map_err(|e| TablesError::PathExpansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
