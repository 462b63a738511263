use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{error, info, instrument};
use tracing_error::SpanTrace;

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use crate::domain::{AnimalRecord, TablesError};
use crate::table::AnimalTable;

/// Reads animal lists from files below a base directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    base: PathBuf,
}

impl DataLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Loads the records of one resource. Any failure is logged and yields an
    /// empty list so that the remaining tables still come up.
    #[instrument(skip(self, resource), fields(resource = %resource.as_ref().display()))]
    pub async fn load(&self, resource: impl AsRef<Path>) -> Vec<AnimalRecord> {
        let path = self.base.join(resource.as_ref());
        match Self::try_load(&path).await {
            Ok(records) => {
                info!("Loaded {} records from {}", records.len(), path.display());
                records
            }
            Err(e) => {
                error!(
                    "Error fetching data from {}: {e}\n{}",
                    path.display(),
                    SpanTrace::capture()
                );
                Vec::new()
            }
        }
    }

    pub async fn try_load(path: &Path) -> Result<Vec<AnimalRecord>, TablesError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Loads every configured table concurrently and hands them to a dispatcher.
/// Each table is built as soon as its own data has arrived.
#[instrument(skip_all, fields(tables = config.tables.len()))]
pub async fn bootstrap(config: &AppConfig) -> Dispatcher {
    let loader = DataLoader::new(&config.data_dir);
    let tables = join_all(config.tables.iter().map(|spec| {
        let loader = &loader;
        async move {
            let records = loader.load(&spec.resource).await;
            AnimalTable::new(records, spec.key.clone(), spec.sortable.clone())
        }
    }))
    .await;
    Dispatcher::new(tables)
}
