//! Line codec for animal records
//!
//! One record per line: `id,name,age,species`. Text fields that contain a
//! comma or a double quote are wrapped in double quotes, with embedded
//! quotes doubled. Numeric fields are written bare.
//!
//! Decoding is best-effort: malformed quoting is not rejected, and an
//! unterminated quote is closed at end of line.

use thiserror::Error;

use crate::models::{Animal, AnimalId};

const DELIMITER: char = ',';
const QUOTE: char = '"';
const FIELD_COUNT: usize = 4;

/// Errors produced when a line cannot be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line split into fewer than four fields
    #[error("expected 4 fields, found {found}")]
    MissingFields { found: usize },

    /// A numeric field did not hold a valid value
    #[error("invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Encode a record as a single line (without a line terminator)
pub fn encode(animal: &Animal) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
        animal.id,
        escape(&animal.name),
        animal.age,
        escape(&animal.species)
    )
}

/// Decode one line into a record
pub fn decode(line: &str) -> Result<Animal, CodecError> {
    let fields = split_fields(line);
    let [id, name, age, species, ..] = fields.as_slice() else {
        return Err(CodecError::MissingFields {
            found: fields.len(),
        });
    };

    let id = id
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(AnimalId::new)
        .ok_or_else(|| CodecError::InvalidNumber {
            field: "id",
            value: id.to_string(),
        })?;
    let age = age
        .trim()
        .parse::<u32>()
        .map_err(|_| CodecError::InvalidNumber {
            field: "age",
            value: age.to_string(),
        })?;

    Ok(Animal {
        id,
        name: name.to_string(),
        age,
        species: species.to_string(),
    })
}

fn escape(field: &str) -> String {
    if field.contains([DELIMITER, QUOTE]) {
        format!("{QUOTE}{}{QUOTE}", field.replace(QUOTE, "\"\""))
    } else {
        field.to_string()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes && chars.peek() == Some(&QUOTE) => {
                current.push(QUOTE);
                chars.next();
            }
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
