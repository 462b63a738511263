use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::domain::{AnimalForm, AnimalRecord, EditForm, Field, TablesError};
use crate::ui::{self, Trigger};

/// One category of animals together with its rendered markup.
///
/// Every mutation re-renders immediately, so [`AnimalTable::markup`] always
/// reflects the current records.
#[derive(Debug, Clone)]
pub struct AnimalTable {
    records: Vec<AnimalRecord>,
    key: String,
    sortable: Vec<Field>,
    markup: String,
    triggers: Vec<Trigger>,
}

impl AnimalTable {
    pub fn new(records: Vec<AnimalRecord>, key: impl Into<String>, sortable: Vec<Field>) -> Self {
        let mut table = Self {
            records,
            key: key.into(),
            sortable,
            markup: String::new(),
            triggers: Vec::new(),
        };
        table.render();
        table
    }

    pub fn render(&mut self) -> &str {
        let (markup, triggers) = ui::render_table(self);
        trace!(
            "Rendered {} with {} rows and {} triggers",
            self.key,
            self.records.len(),
            triggers.len()
        );
        self.markup = markup;
        self.triggers = triggers;
        &self.markup
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[AnimalRecord] {
        &self.records
    }

    pub fn sortable(&self) -> &[Field] {
        &self.sortable
    }

    pub fn is_sortable(&self, field: Field) -> bool {
        self.sortable.contains(&field)
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn trigger(&self, id: usize) -> Result<Trigger, TablesError> {
        self.triggers
            .get(id)
            .copied()
            .ok_or_else(|| TablesError::UnknownTrigger {
                table: self.key.clone(),
                trigger: id,
            })
    }

    pub fn find(&self, name: &str) -> Option<&AnimalRecord> {
        self.records.iter().find(|a| a.name == name)
    }

    pub fn add(&mut self, animal: AnimalRecord) -> Result<(), TablesError> {
        if self.find(&animal.name).is_some() {
            warn!("Rejected duplicate '{}' in {}", animal.name, self.key);
            return Err(TablesError::DuplicateName(animal.name));
        }
        debug!("Adding '{}' to {}", animal.name, self.key);
        self.records.push(animal);
        self.render();
        Ok(())
    }

    pub fn request_add(&mut self, form: AnimalForm) -> Result<(), TablesError> {
        let animal = form.into_record().inspect_err(|e| {
            warn!("Rejected incomplete form for {}: {e}", self.key);
        })?;
        self.add(animal)
    }

    /// Applies the form to the first record called `name`. Returns false when
    /// there is no such record.
    pub fn edit(&mut self, name: &str, form: EditForm) -> Result<bool, TablesError> {
        match self.records.iter().position(|a| a.name == name) {
            Some(row) => self.edit_at(row, form),
            None => {
                debug!("Nothing to edit for '{name}' in {}", self.key);
                Ok(false)
            }
        }
    }

    pub fn edit_at(&mut self, row: usize, form: EditForm) -> Result<bool, TablesError> {
        let Some(animal) = self.records.get(row) else {
            return Ok(false);
        };

        let new_name = form.resulting_name(animal);
        let collides = new_name != animal.name
            && self
                .records
                .iter()
                .enumerate()
                .any(|(idx, other)| idx != row && other.name == new_name);
        if collides {
            warn!("Rejected rename to '{new_name}' in {}", self.key);
            return Err(TablesError::DuplicateName(new_name.to_string()));
        }

        form.apply(&mut self.records[row]);
        self.render();
        Ok(true)
    }

    /// Removes every record called `name` and returns how many were removed.
    pub fn delete(&mut self, name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|a| a.name != name);
        let removed = before - self.records.len();
        debug!("Deleted {removed} record(s) named '{name}' from {}", self.key);
        self.render();
        removed
    }

    pub fn delete_at(&mut self, row: usize) -> Option<AnimalRecord> {
        if row >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(row);
        self.render();
        Some(removed)
    }

    pub fn sort(&mut self, field: Field) {
        self.records.sort_by(|a, b| compare(a, b, field));
        debug!("Sorted {} by {field}", self.key);
        self.render();
    }
}

fn compare(a: &AnimalRecord, b: &AnimalRecord, field: Field) -> Ordering {
    match field {
        Field::Size => match (leading_number(&a.size), leading_number(&b.size)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less, // Sizes with a magnitude come first
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        _ => locale_cmp(a.field(field), b.field(field)),
    }
}

/// Magnitude at the start of a text such as "10 ft" or "2.5m". Trailing units
/// are ignored.
pub fn leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        mantissa_end = digits_from(int_end + 1);
    }
    // A lone sign or dot is not a number
    if mantissa_end == end || (int_end == end && mantissa_end == int_end + 1) {
        return None;
    }
    end = mantissa_end;

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Case-insensitive ordering where common Latin accents sort next to their
/// base letter. Unaccented text wins ties over accented, lowercase over uppercase.
/// Letters outside Latin-1 and a few Central European ones keep code point order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let (la, lb) = (lower(a), lower(b));
    la.iter()
        .map(|c| fold_accent(*c))
        .cmp(lb.iter().map(|c| fold_accent(*c)))
        .then_with(|| la.cmp(&lb))
        .then_with(|| b.cmp(a))
}

fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è'..='ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì'..='ï' | 'ī' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' => 's',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}
