//! Data models for Herdbook
//!
//! Defines the animal record and the editable field set used to create
//! and update records. Ids are assigned by the repository, so the
//! editable types carry no id at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repository-assigned record identifier (always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(u64);

impl AnimalId {
    /// The first id handed out by an empty repository
    pub const FIRST: AnimalId = AnimalId(1);

    /// Wrap a raw id, rejecting zero
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, `None` once the id space is used up
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnimalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid id", s))?;
        Self::new(raw).ok_or_else(|| "id must be a positive integer".to_string())
    }
}

/// A stored animal record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Animal {
    /// Unique identifier, immutable once assigned
    pub id: AnimalId,
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Species, e.g. "Cow"
    pub species: String,
}

impl Animal {
    /// Build a record from an id and its editable fields
    pub fn from_draft(id: AnimalId, draft: AnimalDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
            species: draft.species,
        }
    }

    /// Copy out the editable fields
    pub fn draft(&self) -> AnimalDraft {
        AnimalDraft {
            name: self.name.clone(),
            age: self.age,
            species: self.species.clone(),
        }
    }

    fn assign(&mut self, draft: AnimalDraft) {
        self.name = draft.name;
        self.age = draft.age;
        self.species = draft.species;
    }

    /// Run a field mutation against this record; the id is out of reach
    ///
    /// The record is left unchanged when the mutated fields fail validation.
    pub(crate) fn apply<F>(&mut self, mutation: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut AnimalDraft),
    {
        let mut draft = self.draft();
        mutation(&mut draft);
        draft.validate()?;
        self.assign(draft);
        Ok(())
    }
}

/// The caller-editable fields of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalDraft {
    pub name: String,
    pub age: u32,
    pub species: String,
}

impl AnimalDraft {
    pub fn new(name: impl Into<String>, age: u32, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            species: species.into(),
        }
    }

    /// Check the text-field invariants
    ///
    /// Names and species must be non-empty and fit on a single line,
    /// since the storage format is one record per line.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name)?;
        check_text("species", &self.species)
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::LineBreak { field });
    }
    Ok(())
}

/// Partial update: only fields that are `Some` are changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub species: Option<String>,
}

impl AnimalPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.species.is_none()
    }

    /// Apply the set fields to a draft
    pub fn apply(self, draft: &mut AnimalDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(age) = self.age {
            draft.age = age;
        }
        if let Some(species) = self.species {
            draft.species = species;
        }
    }
}

/// Rejected field values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be a single line")]
    LineBreak { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bessie() -> Animal {
        Animal::from_draft(AnimalId::FIRST, AnimalDraft::new("Bessie", 4, "Cow"))
    }

    #[test]
    fn test_animal_id_rejects_zero() {
        assert!(AnimalId::new(0).is_none());
        assert_eq!(AnimalId::new(7).unwrap().get(), 7);
        assert_eq!(AnimalId::FIRST.next().unwrap().get(), 2);
    }

    #[test]
    fn test_animal_id_next_stops_at_max() {
        let last = AnimalId::new(u64::MAX).unwrap();
        assert!(last.next().is_none());
        assert_eq!(
            AnimalId::new(u64::MAX - 1).unwrap().next(),
            Some(last)
        );
    }

    #[test]
    fn test_animal_id_from_str() {
        assert_eq!("12".parse::<AnimalId>().unwrap().get(), 12);
        assert_eq!(" 3 ".parse::<AnimalId>().unwrap().get(), 3);
        assert!("0".parse::<AnimalId>().is_err());
        assert!("-1".parse::<AnimalId>().is_err());
        assert!("abc".parse::<AnimalId>().is_err());
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut animal = bessie();
        animal.apply(|draft| {
            draft.name = "Daisy".to_string();
            draft.age = 5;
        })
        .unwrap();

        assert_eq!(animal.id, AnimalId::FIRST);
        assert_eq!(animal.name, "Daisy");
        assert_eq!(animal.age, 5);
        assert_eq!(animal.species, "Cow");
    }

    #[test]
    fn test_apply_rejects_line_breaks() {
        let mut animal = bessie();
        let err = animal
            .apply(|draft| draft.species = "Cow\nPig".to_string())
            .unwrap_err();

        assert_eq!(err, ValidationError::LineBreak { field: "species" });
        assert_eq!(animal, bessie());
    }

    #[test]
    fn test_patch_only_changes_set_fields() {
        let mut draft = bessie().draft();
        let patch = AnimalPatch {
            age: Some(9),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        patch.apply(&mut draft);
        assert_eq!(draft, AnimalDraft::new("Bessie", 9, "Cow"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(AnimalPatch::default().is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(AnimalDraft::new("Wilbur", 1, "Pig").validate().is_ok());
        assert_eq!(
            AnimalDraft::new("  ", 1, "Pig").validate(),
            Err(ValidationError::Empty { field: "name" })
        );
        assert_eq!(
            AnimalDraft::new("Wilbur", 1, "").validate(),
            Err(ValidationError::Empty { field: "species" })
        );
        assert_eq!(
            AnimalDraft::new("Wil\nbur", 1, "Pig").validate(),
            Err(ValidationError::LineBreak { field: "name" })
        );
    }

    #[test]
    fn test_serializes_id_as_number() {
        let serialized = toml::to_string(&bessie()).unwrap();
        assert!(serialized.contains("id = 1"));
    }
}
