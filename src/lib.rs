//! Sortable, editable animal tables rendered into an HTML page.
//!
//! Each category of animals lives in an [`AnimalTable`] that re-renders its
//! markup after every change. A [`Dispatcher`] owns all tables and routes
//! actions to them by key, and [`bootstrap`] loads the tables from JSON files.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod domain;
pub mod inputter;
pub mod loader;
pub mod model;
pub mod table;
pub mod ui;

pub use config::{AppConfig, TableSpec};
pub use dispatcher::{Dispatcher, TableId};
pub use domain::{AnimalForm, AnimalRecord, DEFAULT_IMAGE, EditForm, Field, Message, TablesError};
pub use loader::{DataLoader, bootstrap};
pub use table::AnimalTable;
