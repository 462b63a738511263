use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{AnimalForm, EditForm, Field, TablesError};
use crate::table::AnimalTable;
use crate::ui::Trigger;

/// Index of a table inside its [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

/// Owns every table and routes actions to them by key.
#[derive(Debug, Default)]
pub struct Dispatcher {
    tables: Vec<AnimalTable>,
    index: HashMap<String, TableId>,
}

impl Dispatcher {
    pub fn new(tables: Vec<AnimalTable>) -> Self {
        let mut index = HashMap::new();
        for (idx, table) in tables.iter().enumerate() {
            if index.contains_key(table.key()) {
                warn!("Table key {} is used twice, keeping the first one", table.key());
                continue;
            }
            index.insert(table.key().to_string(), TableId(idx));
        }
        Self { tables, index }
    }

    pub fn resolve(&self, key: &str) -> Result<TableId, TablesError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| TablesError::UnknownTable(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&AnimalTable> {
        self.index.get(key).map(|id| &self.tables[id.0])
    }

    pub fn table(&self, id: TableId) -> &AnimalTable {
        &self.tables[id.0]
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut AnimalTable {
        &mut self.tables[id.0]
    }

    pub fn tables(&self) -> &[AnimalTable] {
        &self.tables
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.key())
    }

    fn lookup(&mut self, key: &str) -> Result<&mut AnimalTable, TablesError> {
        let id = self.resolve(key)?;
        debug!("Dispatching to {key}");
        Ok(self.table_mut(id))
    }

    pub fn sort(&mut self, key: &str, field: Field) -> Result<(), TablesError> {
        self.lookup(key)?.sort(field);
        Ok(())
    }

    pub fn add(&mut self, key: &str, form: AnimalForm) -> Result<(), TablesError> {
        self.lookup(key)?.request_add(form)
    }

    pub fn edit(&mut self, key: &str, name: &str, form: EditForm) -> Result<bool, TablesError> {
        self.lookup(key)?.edit(name, form)
    }

    pub fn delete(&mut self, key: &str, name: &str) -> Result<usize, TablesError> {
        Ok(self.lookup(key)?.delete(name))
    }

    /// Looks up a trigger from the table's latest render.
    pub fn trigger(&self, key: &str, id: usize) -> Result<(TableId, Trigger), TablesError> {
        let table_id = self.resolve(key)?;
        Ok((table_id, self.table(table_id).trigger(id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnimalRecord;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(vec![
            AnimalTable::new(
                vec![AnimalRecord::new("Lion", "Leo", "8 ft", "Savanna")],
                "bigCatsTable",
                vec![Field::Name, Field::Size, Field::Location],
            ),
            AnimalTable::new(
                vec![AnimalRecord::new("Dog", "Rex", "5 ft", "Yard")],
                "dogsTable",
                vec![Field::Name, Field::Location],
            ),
        ])
    }

    #[test]
    fn actions_reach_only_the_addressed_table() {
        let mut d = dispatcher();
        d.delete("dogsTable", "Rex").unwrap();
        assert!(d.get("dogsTable").unwrap().records().is_empty());
        assert_eq!(d.get("bigCatsTable").unwrap().records().len(), 1);
    }

    #[test]
    fn unknown_key_is_reported() {
        let mut d = dispatcher();
        assert!(matches!(
            d.sort("catsTable", Field::Name),
            Err(TablesError::UnknownTable(ref k)) if k == "catsTable"
        ));
    }

    #[test]
    fn first_table_wins_duplicate_keys() {
        let d = Dispatcher::new(vec![
            AnimalTable::new(vec![], "dogsTable", vec![]),
            AnimalTable::new(
                vec![AnimalRecord::new("Dog", "Rex", "5 ft", "Yard")],
                "dogsTable",
                vec![],
            ),
        ]);
        assert!(d.get("dogsTable").unwrap().records().is_empty());
    }

    #[test]
    fn triggers_resolve_to_typed_actions() {
        let d = dispatcher();
        let (id, trigger) = d.trigger("dogsTable", 2).unwrap();
        assert_eq!(id, d.resolve("dogsTable").unwrap());
        assert_eq!(trigger, Trigger::Edit(0));
    }

    #[test]
    fn add_through_dispatcher_validates_form() {
        let mut d = dispatcher();
        let form = AnimalForm {
            species: "Dog".into(),
            name: "Rex".into(),
            size: "3 ft".into(),
            location: "Park".into(),
            image: String::new(),
        };
        assert!(matches!(
            d.add("dogsTable", form),
            Err(TablesError::DuplicateName(_))
        ));
        assert_eq!(d.get("dogsTable").unwrap().records()[0].size, "5 ft");
    }
}
