//! Generic JSON-backed repository
//!
//! Every collection lives in its own file as `{"items": [...]}` and is held in
//! memory behind an `RwLock`. Mutations only touch memory; callers persist
//! with [`Repository::save`].

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{BizdeskError, BizdeskResult};

use super::file_io::{read_json, write_json_atomic};

/// A persisted entity
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Display + Send + Sync + 'static;

    /// Entity kind recorded in the audit log
    const ENTITY: EntityType;

    fn id(&self) -> Self::Id;

    /// Human-readable name for logs and the audit trail
    fn label(&self) -> String;

    fn created_at(&self) -> DateTime<Utc>;

    fn revision(&self) -> u32;
}

/// Fail with a conflict when the caller saw a different revision than the stored one
pub fn check_revision<T: Record>(record: &T, expected: Option<u32>) -> BizdeskResult<()> {
    match expected {
        Some(expected) if expected != record.revision() => Err(BizdeskError::Conflict {
            entity_type: T::ENTITY.as_str(),
            identifier: record.id().to_string(),
            expected,
            actual: record.revision(),
        }),
        _ => Ok(()),
    }
}

#[derive(Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RecordFile<T> {
    #[serde(default)]
    items: Vec<T>,
}

impl<T> Default for RecordFile<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// In-memory collection of one record type, persisted to a single JSON file
pub struct Repository<T: Record> {
    path: PathBuf,
    items: RwLock<HashMap<T::Id, T>>,
    save_lock: Mutex<()>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            items: RwLock::new(HashMap::new()),
            save_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> BizdeskResult<RwLockReadGuard<'_, HashMap<T::Id, T>>> {
        self.items
            .read()
            .map_err(|e| BizdeskError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BizdeskResult<RwLockWriteGuard<'_, HashMap<T::Id, T>>> {
        self.items
            .write()
            .map_err(|e| BizdeskError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the in-memory contents with the file on disk
    pub fn load(&self) -> BizdeskResult<()> {
        let file_data: RecordFile<T> = read_json(&self.path)?;

        let mut items = self.write()?;
        items.clear();
        for item in file_data.items {
            items.insert(item.id(), item);
        }

        Ok(())
    }

    /// Persist the current contents, oldest record first
    pub fn save(&self) -> BizdeskResult<()> {
        let _guard = self
            .save_lock
            .lock()
            .map_err(|e| BizdeskError::Storage(format!("Failed to acquire save lock: {}", e)))?;

        let mut list: Vec<T> = self.read()?.values().cloned().collect();
        list.sort_by_key(|item| item.created_at());

        write_json_atomic(&self.path, &RecordFile { items: list })
    }

    pub fn get(&self, id: T::Id) -> BizdeskResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records, newest first
    pub fn get_all(&self) -> BizdeskResult<Vec<T>> {
        self.find(|_| true)
    }

    /// Records matching a predicate, newest first
    pub fn find<F>(&self, predicate: F) -> BizdeskResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut list: Vec<T> = self
            .read()?
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect();
        list.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
        Ok(list)
    }

    /// First record matching a predicate
    pub fn find_one<F>(&self, predicate: F) -> BizdeskResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.values().find(|item| predicate(item)).cloned())
    }

    pub fn count(&self) -> BizdeskResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn count_where<F>(&self, predicate: F) -> BizdeskResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.values().filter(|item| predicate(item)).count())
    }

    /// Insert or replace a record
    pub fn upsert(&self, item: T) -> BizdeskResult<()> {
        self.write()?.insert(item.id(), item);
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> BizdeskResult<Option<T>> {
        Ok(self.write()?.remove(&id))
    }

    /// Check the revision and apply `update` to one record under a single write lock
    ///
    /// `update` works on a copy; the stored record only changes when it returns
    /// `Ok`. Returns `(before, after)`, or `None` when no record has that id.
    pub fn update_checked<F>(
        &self,
        id: T::Id,
        expected: Option<u32>,
        update: F,
    ) -> BizdeskResult<Option<(T, T)>>
    where
        F: FnOnce(&mut T) -> BizdeskResult<()>,
    {
        let mut items = self.write()?;
        let Some(stored) = items.get_mut(&id) else {
            return Ok(None);
        };
        check_revision(stored, expected)?;

        let before = stored.clone();
        let mut after = before.clone();
        update(&mut after)?;
        *stored = after.clone();

        Ok(Some((before, after)))
    }

    /// Check the revision and remove one record under a single write lock
    pub fn delete_checked(&self, id: T::Id, expected: Option<u32>) -> BizdeskResult<Option<T>> {
        let mut items = self.write()?;
        match items.get(&id) {
            Some(stored) => check_revision(stored, expected)?,
            None => return Ok(None),
        }
        Ok(items.remove(&id))
    }

    /// Remove every record matching a predicate, returning the removed records
    pub fn delete_where<F>(&self, predicate: F) -> BizdeskResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut items = self.write()?;
        let ids: Vec<T::Id> = items
            .values()
            .filter(|item| predicate(item))
            .map(Record::id)
            .collect();

        Ok(ids.into_iter().filter_map(|id| items.remove(&id)).collect())
    }

    /// Apply `update` to every record matching a predicate
    ///
    /// Returns `(before, after)` pairs for the modified records.
    pub fn update_where<P, U>(&self, predicate: P, mut update: U) -> BizdeskResult<Vec<(T, T)>>
    where
        P: Fn(&T) -> bool,
        U: FnMut(&mut T),
    {
        let mut items = self.write()?;
        let mut changed = Vec::new();

        for item in items.values_mut().filter(|item| predicate(item)) {
            let before = item.clone();
            update(item);
            changed.push((before, item.clone()));
        }

        Ok(changed)
    }
}
