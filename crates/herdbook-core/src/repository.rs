//! Animal record repository
//!
//! The `AnimalRepository` owns the canonical in-memory collection and keeps
//! the backing storage in step with it:
//!
//! - On open, every line of storage is decoded; blank lines are skipped and
//!   corrupt lines are skipped with a [`LoadWarning`] instead of failing.
//! - Created and updated records are validated first, so every record
//!   encodes to exactly one line.
//! - Every mutation rewrites the whole collection before returning, so a
//!   successful return means storage mirrors memory.
//! - Reads hand out clones. Nothing outside the repository can reach into
//!   the collection.
//!
//! ## Usage
//!
//! ```ignore
//! let mut repo = AnimalRepository::open("animals.csv")?;
//!
//! let bessie = repo.create(AnimalDraft::new("Bessie", 4, "Cow"))?;
//! repo.update(bessie.id, |draft| draft.age += 1)?;
//!
//! for animal in repo.list() {
//!     println!("{} {}", animal.id, animal.name);
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{self, CodecError};
use crate::models::{Animal, AnimalDraft, AnimalId, AnimalPatch, ValidationError};
use crate::storage::{FileStorage, RecordStorage, StorageError, StorageResult};

/// Errors from repository mutations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The record could not be written
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The fields would not fit the record format
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Every id has been handed out
    #[error("No ids left to assign")]
    IdsExhausted,
}

impl RepositoryError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            RepositoryError::Storage(err) => err.recovery_suggestion(),
            _ => None,
        }
    }
}

/// Result type for repository mutations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Why a stored line was left out when loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The line could not be decoded
    Malformed(CodecError),
    /// An earlier line already holds this id
    DuplicateId(AnimalId),
    /// The id leaves no room for a following id
    IdOutOfRange(AnimalId),
    /// The line is not valid UTF-8
    InvalidText,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadIssue::Malformed(err) => write!(f, "{}", err),
            LoadIssue::DuplicateId(id) => write!(f, "duplicate id {}", id),
            LoadIssue::IdOutOfRange(id) => write!(f, "id {} is out of range", id),
            LoadIssue::InvalidText => write!(f, "not valid UTF-8 text"),
        }
    }
}

/// A stored line that was skipped on load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// 1-based line number in storage
    pub line: usize,
    pub issue: LoadIssue,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.issue)
    }
}

/// Owning store of animal records with persist-on-mutate semantics
pub struct AnimalRepository<S = FileStorage> {
    /// Records in insertion order
    animals: Vec<Animal>,
    /// Next id to hand out; above every id ever held
    next_id: AnimalId,
    storage: S,
    warnings: Vec<LoadWarning>,
}

impl AnimalRepository<FileStorage> {
    /// Open the record file at `path`, creating it empty if missing
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::open_with_storage(FileStorage::new(path))
    }
}

impl<S: RecordStorage> AnimalRepository<S> {
    /// Open a repository over any storage backend
    pub fn open_with_storage(mut storage: S) -> StorageResult<Self> {
        if !storage.exists() {
            info!("Creating empty record store at {}", storage.location());
            storage.create_empty()?;
            return Ok(Self {
                animals: Vec::new(),
                next_id: AnimalId::FIRST,
                storage,
                warnings: Vec::new(),
            });
        }

        let lines = storage.read_lines()?;
        let mut animals: Vec<Animal> = Vec::with_capacity(lines.len());
        let mut warnings = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            let issue = match std::str::from_utf8(raw) {
                Err(_) => LoadIssue::InvalidText,
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match codec::decode(line) {
                    Ok(animal) if animals.iter().any(|a| a.id == animal.id) => {
                        LoadIssue::DuplicateId(animal.id)
                    }
                    Ok(animal) if animal.id.next().is_none() => {
                        LoadIssue::IdOutOfRange(animal.id)
                    }
                    Ok(animal) => {
                        animals.push(animal);
                        continue;
                    }
                    Err(err) => LoadIssue::Malformed(err),
                },
            };

            let warning = LoadWarning {
                line: index + 1,
                issue,
            };
            warn!("Skipping record in {}: {}", storage.location(), warning);
            warnings.push(warning);
        }

        // Ids without a successor were skipped above, so `next` always succeeds
        let next_id = animals
            .iter()
            .map(|a| a.id)
            .max()
            .and_then(AnimalId::next)
            .unwrap_or(AnimalId::FIRST);

        info!(
            "Loaded {} record(s) from {} ({} skipped, next id {})",
            animals.len(),
            storage.location(),
            warnings.len(),
            next_id
        );

        Ok(Self {
            animals,
            next_id,
            storage,
            warnings,
        })
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<Animal> {
        self.animals.clone()
    }

    /// Look up a record by id
    pub fn get(&self, id: AnimalId) -> Option<Animal> {
        self.animals.iter().find(|a| a.id == id).cloned()
    }

    /// Create a record from its fields and persist
    ///
    /// Returns the stored record with its assigned id. The id is consumed
    /// even if persisting fails, so it is never handed out twice. Drafts
    /// that fail validation are rejected before an id is assigned.
    pub fn create(&mut self, draft: AnimalDraft) -> RepositoryResult<Animal> {
        draft.validate()?;

        let id = self.next_id;
        self.next_id = id.next().ok_or(RepositoryError::IdsExhausted)?;

        let animal = Animal::from_draft(id, draft);
        self.animals.push(animal.clone());

        if let Err(err) = self.persist() {
            self.animals.pop();
            return Err(err.into());
        }

        debug!("Created animal {}", id);
        Ok(animal)
    }

    /// Remove a record by id
    ///
    /// Returns `Ok(false)` without touching storage when no record matches.
    pub fn remove(&mut self, id: AnimalId) -> RepositoryResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.animals.remove(index);
        if let Err(err) = self.persist() {
            self.animals.insert(index, removed);
            return Err(err.into());
        }

        debug!("Removed animal {}", id);
        Ok(true)
    }

    /// Apply a field mutation to one record and persist
    ///
    /// The mutation sees only the editable fields, so the id cannot change.
    /// Returns `Ok(false)` without touching storage when no record matches.
    /// A mutation that leaves invalid fields is rejected and nothing changes.
    pub fn update<F>(&mut self, id: AnimalId, mutation: F) -> RepositoryResult<bool>
    where
        F: FnOnce(&mut AnimalDraft),
    {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let previous = self.animals[index].clone();
        self.animals[index].apply(mutation)?;

        if let Err(err) = self.persist() {
            self.animals[index] = previous;
            return Err(err.into());
        }

        debug!("Updated animal {}", id);
        Ok(true)
    }

    /// Apply a partial update; unset patch fields are left alone
    pub fn update_with(&mut self, id: AnimalId, patch: AnimalPatch) -> RepositoryResult<bool> {
        self.update(id, |draft| patch.apply(draft))
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// The id the next `create` will assign
    pub fn next_id(&self) -> AnimalId {
        self.next_id
    }

    /// Lines skipped while opening
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Where records are stored
    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// Borrow the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn position(&self, id: AnimalId) -> Option<usize> {
        self.animals.iter().position(|a| a.id == id)
    }

    /// Rewrite storage from the in-memory collection
    fn persist(&mut self) -> StorageResult<()> {
        let mut contents = String::new();
        for animal in &self.animals {
            contents.push_str(&codec::encode(animal));
            contents.push('\n');
        }
        self.storage.overwrite(&contents)
    }
}
