//! Herdbook Core Library
//!
//! This crate provides the core functionality for Herdbook, a small
//! record keeper for animals stored in a flat text file.
//!
//! # Architecture
//!
//! - **Record file**: source of truth, one encoded record per line
//! - **Repository**: in-memory copy, rewritten to the file after every change
//!
//! # Quick Start
//!
//! ```text
//! let mut repo = AnimalRepository::open("animals.csv")?;
//!
//! let wilbur = repo.create(AnimalDraft::new("Wilbur", 1, "Pig"))?;
//! repo.update(wilbur.id, |draft| draft.age = 2)?;
//!
//! let animals = repo.list();
//! ```
//!
//! # Modules
//!
//! - `repository`: load/mutate/persist lifecycle (main entry point)
//! - `models`: animal records, drafts and patches
//! - `codec`: one-line text encoding of records
//! - `storage`: line-oriented storage backends
//! - `access`: operators, roles and permission checks
//! - `config`: application configuration

pub mod access;
pub mod codec;
pub mod config;
pub mod models;
pub mod repository;
pub mod storage;

pub use access::{authenticate, AccessError, Operation, Operator, OperatorCredential, Role};
pub use codec::CodecError;
pub use config::Config;
pub use models::{Animal, AnimalDraft, AnimalId, AnimalPatch, ValidationError};
pub use repository::{
    AnimalRepository, LoadIssue, LoadWarning, RepositoryError, RepositoryResult,
};
pub use storage::{FileStorage, MemoryStorage, RecordStorage, StorageError, StorageResult};
