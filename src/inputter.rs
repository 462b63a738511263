use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tracing::trace;

use crate::domain::{AnimalForm, AnimalRecord, EditForm, TablesError};

/// Source of answers for interactive questions.
pub trait Prompt {
    /// Asks a question, showing `current` as the value kept on an empty answer.
    /// Returns `None` once the input is exhausted.
    fn ask(&mut self, question: &str, current: Option<&str>) -> Result<Option<String>, TablesError>;
}

/// Prompt that writes questions to `writer` and reads one line per answer.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str, current: Option<&str>) -> Result<Option<String>, TablesError> {
        match current {
            Some(value) => write!(self.writer, "{question} [{value}] ")?,
            None => write!(self.writer, "{question} ")?,
        }
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim().to_string();
        trace!("{question} => {answer:?}");
        Ok(Some(answer))
    }
}

/// Prompt answering from a fixed list, mostly useful for scripted sessions.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, _question: &str, _current: Option<&str>) -> Result<Option<String>, TablesError> {
        Ok(self.answers.pop_front())
    }
}

/// Collects commands and forms from a [`Prompt`].
pub struct Inputter<P> {
    prompt: P,
}

impl<P: Prompt> Inputter<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    pub fn command(&mut self) -> Result<Option<String>, TablesError> {
        self.prompt.ask("tables>", None)
    }

    // End of input counts as an empty answer
    fn answer(&mut self, question: &str, current: Option<&str>) -> Result<String, TablesError> {
        Ok(self.prompt.ask(question, current)?.unwrap_or_default())
    }

    pub fn add_form(&mut self) -> Result<AnimalForm, TablesError> {
        Ok(AnimalForm {
            species: self.answer("Enter species:", None)?,
            name: self.answer("Enter name:", None)?,
            size: self.answer("Enter size (e.g., 10 ft):", None)?,
            location: self.answer("Enter location:", None)?,
            image: self.answer("Enter image URL (leave empty for default):", None)?,
        })
    }

    pub fn edit_form(&mut self, current: &AnimalRecord) -> Result<EditForm, TablesError> {
        Ok(EditForm {
            name: self.answer("Enter new name:", Some(&current.name))?,
            size: self.answer("Enter new size:", Some(&current.size))?,
            location: self.answer("Enter new location:", Some(&current.location))?,
            image: self.answer("Enter new image URL:", Some(&current.image))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn line_prompt_shows_current_value() {
        let mut out = Vec::new();
        let mut prompt = LinePrompt::new(Cursor::new("  Max \n"), &mut out);
        let answer = prompt.ask("Enter new name:", Some("Rex")).unwrap();
        assert_eq!(answer.as_deref(), Some("Max"));
        assert_eq!(String::from_utf8(out).unwrap(), "Enter new name: [Rex] ");
    }

    #[test]
    fn line_prompt_reports_end_of_input() {
        let mut prompt = LinePrompt::new(Cursor::new(""), Vec::new());
        assert_eq!(prompt.ask("tables>", None).unwrap(), None);
    }

    #[test]
    fn add_form_collects_fields_in_order() {
        let mut inputter = Inputter::new(ScriptedPrompt::new([
            "Dog", "Rex", "5 ft", "Yard", "",
        ]));
        let form = inputter.add_form().unwrap();
        assert_eq!(form.species, "Dog");
        assert_eq!(form.location, "Yard");
        assert!(form.image.is_empty());
    }

    #[test]
    fn exhausted_input_leaves_fields_empty() {
        let mut inputter = Inputter::new(ScriptedPrompt::new(["Dog"]));
        let form = inputter.add_form().unwrap();
        assert_eq!(form.species, "Dog");
        assert!(form.name.is_empty());
        assert!(form.into_record().is_err());
    }

    #[test]
    fn edit_form_keeps_empty_answers_empty() {
        let current = AnimalRecord::new("Dog", "Rex", "5 ft", "Yard");
        let mut inputter = Inputter::new(ScriptedPrompt::new(["", "6 ft", "", ""]));
        let form = inputter.edit_form(&current).unwrap();
        assert_eq!(form.size, "6 ft");
        assert!(form.name.is_empty());
    }
}
