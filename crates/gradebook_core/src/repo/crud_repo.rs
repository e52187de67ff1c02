//! Generic identity-keyed repository.
//!
//! # Responsibility
//! - Keep the in-memory record map for one record type.
//! - Run the injected validator before every write.
//! - Flush the whole map through the record store after every mutation.
//!
//! # Invariants
//! - `save` is first-write-wins: an existing key is never overwritten.
//! - A failed flush rolls the in-memory map back, so memory never runs ahead
//!   of the backing store.
//! - Records loaded from the store go through the same validator; invalid
//!   persisted state fails construction instead of being masked.

use crate::model::Entity;
use crate::store::{RecordStore, Snapshot, StoreError};
use crate::validation::{ValidationError, Validator};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Store(StoreError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of `save`.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<E> {
    Created,
    /// Key already present; carries the untouched stored record.
    Conflict(E),
}

impl<E> SaveOutcome<E> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

/// CRUD contract consumed by the catalog service.
pub trait CrudRepository<E: Entity> {
    /// Returns the stored record for `key`, if any.
    fn find_one(&self, key: &E::Key) -> Option<&E>;

    /// Iterates the current records in key order.
    fn find_all(&self) -> impl Iterator<Item = &E>;

    fn save(&mut self, entity: E) -> RepoResult<SaveOutcome<E>>;

    /// Replaces an existing record; returns the previous one, or `None`
    /// when the key is absent.
    fn update(&mut self, entity: E) -> RepoResult<Option<E>>;

    /// Removes a record; returns it, or `None` when the key is absent.
    fn delete(&mut self, key: &E::Key) -> RepoResult<Option<E>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity, R: CrudRepository<E>> CrudRepository<E> for &mut R {
    fn find_one(&self, key: &E::Key) -> Option<&E> {
        (**self).find_one(key)
    }

    fn find_all(&self) -> impl Iterator<Item = &E> {
        (**self).find_all()
    }

    fn save(&mut self, entity: E) -> RepoResult<SaveOutcome<E>> {
        (**self).save(entity)
    }

    fn update(&mut self, entity: E) -> RepoResult<Option<E>> {
        (**self).update(entity)
    }

    fn delete(&mut self, key: &E::Key) -> RepoResult<Option<E>> {
        (**self).delete(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Repository over one record type, validator `V` and store `S`.
#[derive(Debug)]
pub struct Repository<E: Entity, V, S> {
    records: Snapshot<E>,
    validator: V,
    store: S,
}

impl<E, V, S> Repository<E, V, S>
where
    E: Entity,
    V: Validator<E>,
    S: RecordStore<E>,
{
    /// Builds the repository and loads every record from `store`.
    ///
    /// # Errors
    /// - `RepoError::Store` when the store cannot be read or parsed.
    /// - `RepoError::InvalidData` when a stored record fails validation or
    ///   a key appears twice.
    pub fn open(validator: V, mut store: S) -> RepoResult<Self> {
        let loaded = store.load().inspect_err(|err| {
            error!(
                "event=repo_load module=repo status=error kind={} store={} error={}",
                E::KIND,
                store.describe(),
                err
            );
        })?;

        let mut records = Snapshot::<E>::new();
        for entity in loaded {
            validator.validate(&entity).map_err(|err| {
                RepoError::InvalidData(format!("{} {}: {err}", E::KIND, entity.key()))
            })?;
            let key = entity.key().clone();
            if records.insert(key.clone(), entity).is_some() {
                return Err(RepoError::InvalidData(format!(
                    "duplicate {} key {key}",
                    E::KIND
                )));
            }
        }

        info!(
            "event=repo_load module=repo status=ok kind={} store={} count={}",
            E::KIND,
            store.describe(),
            records.len()
        );
        Ok(Self {
            records,
            validator,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn flush(&mut self) -> RepoResult<()> {
        self.store.persist(&self.records).map_err(|err| {
            warn!(
                "event=repo_flush module=repo status=error kind={} store={} error={}",
                E::KIND,
                self.store.describe(),
                err
            );
            RepoError::Store(err)
        })
    }
}

impl<E, V, S> CrudRepository<E> for Repository<E, V, S>
where
    E: Entity,
    V: Validator<E>,
    S: RecordStore<E>,
{
    fn find_one(&self, key: &E::Key) -> Option<&E> {
        self.records.get(key)
    }

    fn find_all(&self) -> impl Iterator<Item = &E> {
        self.records.values()
    }

    fn save(&mut self, entity: E) -> RepoResult<SaveOutcome<E>> {
        self.validator.validate(&entity)?;

        let key = entity.key().clone();
        if let Some(existing) = self.records.get(&key) {
            debug!(
                "event=repo_save module=repo status=conflict kind={} key={}",
                E::KIND,
                key
            );
            return Ok(SaveOutcome::Conflict(existing.clone()));
        }

        self.records.insert(key.clone(), entity);
        if let Err(err) = self.flush() {
            self.records.remove(&key);
            return Err(err);
        }

        info!(
            "event=repo_save module=repo status=ok kind={} key={}",
            E::KIND,
            key
        );
        Ok(SaveOutcome::Created)
    }

    fn update(&mut self, entity: E) -> RepoResult<Option<E>> {
        self.validator.validate(&entity)?;

        let key = entity.key().clone();
        if !self.records.contains_key(&key) {
            return Ok(None);
        }

        let previous = self.records.insert(key.clone(), entity);
        if let Err(err) = self.flush() {
            if let Some(previous) = previous {
                self.records.insert(key, previous);
            }
            return Err(err);
        }

        info!(
            "event=repo_update module=repo status=ok kind={} key={}",
            E::KIND,
            key
        );
        Ok(previous)
    }

    fn delete(&mut self, key: &E::Key) -> RepoResult<Option<E>> {
        let Some(removed) = self.records.remove(key) else {
            return Ok(None);
        };

        if let Err(err) = self.flush() {
            self.records.insert(key.clone(), removed);
            return Err(err);
        }

        info!(
            "event=repo_delete module=repo status=ok kind={} key={}",
            E::KIND,
            key
        );
        Ok(Some(removed))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
