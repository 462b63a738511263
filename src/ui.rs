use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::domain::{Field, TablesError};
use crate::model::Model;
use crate::table::AnimalTable;

/// Action bound to a clickable element of a rendered table. The position of a
/// trigger in the list returned by [`render_table`] is the id written into the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Sort(Field),
    Edit(usize),
    Delete(usize),
    Add,
}

/// Name column styling for the tables that have one.
const NAME_CLASSES: [(&str, &str); 2] = [
    ("dogsTable", "bold-text"),
    ("bigFishTable", "bold-italic-blue"),
];

const PAGE_STYLE: &str = "\
    .bold-text { font-weight: bold; }
    .bold-italic-blue { font-weight: bold; font-style: italic; color: blue; }
    .animal-image { width: 80px; height: auto; }";

pub fn name_class(key: &str) -> &'static str {
    NAME_CLASSES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, class)| *class)
        .unwrap_or("")
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

struct Triggers<'a> {
    key: &'a str,
    bound: Vec<Trigger>,
}

impl Triggers<'_> {
    // Attributes identifying the trigger in the markup
    fn bind(&mut self, trigger: Trigger) -> String {
        let id = self.bound.len();
        self.bound.push(trigger);
        format!("data-table=\"{}\" data-trigger=\"{id}\"", escape_html(self.key))
    }
}

/// Builds the inner markup of a table (head, body and foot) from its current
/// records together with the triggers the markup refers to.
pub fn render_table(table: &AnimalTable) -> (String, Vec<Trigger>) {
    let mut triggers = Triggers {
        key: table.key(),
        bound: Vec::new(),
    };
    let mut html = String::from("\n  <thead>\n    <tr>\n");

    for field in Field::ALL {
        if table.is_sortable(field) {
            let attrs = triggers.bind(Trigger::Sort(field));
            html.push_str(&format!("      <th {attrs}>{}</th>\n", field.label()));
        } else {
            html.push_str(&format!("      <th>{}</th>\n", field.label()));
        }
    }
    html.push_str("      <th>Actions</th>\n    </tr>\n  </thead>\n  <tbody>\n");

    let name_attr = match name_class(table.key()) {
        "" => String::new(),
        class => format!(" class=\"{class}\""),
    };
    for (row, animal) in table.records().iter().enumerate() {
        let name = escape_html(&animal.name);
        let edit = triggers.bind(Trigger::Edit(row));
        let delete = triggers.bind(Trigger::Delete(row));
        html.push_str(&format!(
            "    <tr>
      <td>{species}</td>
      <td{name_attr}>{name}</td>
      <td>
        <img src=\"{image}\" alt=\"{name}\" class=\"animal-image\" />
      </td>
      <td>{size}</td>
      <td>{location}</td>
      <td>
        <button class=\"btn btn-sm btn-warning\" {edit}>Edit</button>
        <button class=\"btn btn-sm btn-danger\" {delete}>Delete</button>
      </td>
    </tr>\n",
            species = escape_html(&animal.species),
            image = escape_html(&animal.image),
            size = escape_html(&animal.size),
            location = escape_html(&animal.location),
        ));
    }

    let add = triggers.bind(Trigger::Add);
    html.push_str(&format!(
        "  </tbody>
  <tfoot>
    <tr>
      <td colspan=\"6\">
        <button class=\"btn btn-sm btn-success\" {add}>Add Animal</button>
      </td>
    </tr>
  </tfoot>\n"
    ));

    (html, triggers.bound)
}

/// Complete HTML document holding every table in its own container. Only the
/// first table with a given key is shown, matching dispatch.
pub fn render_page(config: &AppConfig, tables: &[AnimalTable]) -> String {
    let mut body = String::new();
    let mut seen = HashSet::new();
    for table in tables {
        if !seen.insert(table.key()) {
            continue;
        }
        let heading = config
            .tables
            .iter()
            .find(|spec| spec.key == table.key())
            .map(|spec| spec.title.as_str())
            .unwrap_or(table.key());
        body.push_str(&format!(
            "  <section>\n    <h2>{}</h2>\n    <table id=\"{}\" class=\"table table-striped\">{}    </table>\n  </section>\n",
            escape_html(heading),
            escape_html(table.key()),
            table.markup(),
        ));
    }

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
  <meta charset=\"utf-8\"/>
  <title>{title}</title>
  <style>
{PAGE_STYLE}
  </style>
</head>
<body>
  <h1>{title}</h1>
{body}</body>
</html>
",
        title = escape_html(&config.title),
    )
}

/// Writes the page to disk whenever the model changed since the last draw.
#[derive(Debug)]
pub struct PageUI {
    config: AppConfig,
    output: PathBuf,
    drawn_revision: Option<u64>,
}

impl PageUI {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            output: config.output.clone(),
            drawn_revision: None,
        }
    }

    pub fn draw(&mut self, model: &Model) -> Result<bool, TablesError> {
        if self.drawn_revision == Some(model.revision()) {
            return Ok(false);
        }

        let page = render_page(&self.config, model.tables().tables());
        if let Some(parent) = self.output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output, page)?;
        info!("Wrote page to {}", self.output.display());
        debug!("Page revision {}", model.revision());

        self.drawn_revision = Some(model.revision());
        Ok(true)
    }
}
