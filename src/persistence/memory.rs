//! In-process entity store.
//!
//! All three tables live behind one [`RwLock`] so that reference checks
//! (parent exists, no children left) and the write they guard happen
//! atomically. Rows are kept in id order, which is the list order.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{duplicate_name, has_dependents, missing_parent, parent_required};
use crate::domain::{EntityKind, NewRecord, Record, RecordPatch};
use crate::error::ApiError;

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i64, Record>,
    next_id: i64,
}

impl Table {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }
}

#[derive(Debug)]
struct Tables {
    countries: Table,
    cities: Table,
    streets: Table,
}

impl Tables {
    fn get(&self, kind: EntityKind) -> &Table {
        match kind {
            EntityKind::Country => &self.countries,
            EntityKind::City => &self.cities,
            EntityKind::Street => &self.streets,
        }
    }

    fn get_mut(&mut self, kind: EntityKind) -> &mut Table {
        match kind {
            EntityKind::Country => &mut self.countries,
            EntityKind::City => &mut self.cities,
            EntityKind::Street => &mut self.streets,
        }
    }

    fn check_parent(&self, kind: EntityKind, parent_id: i64) -> Result<(), ApiError> {
        match kind.parent() {
            Some(parent) if self.get(parent).rows.contains_key(&parent_id) => Ok(()),
            _ => Err(missing_parent(kind, parent_id)),
        }
    }
}

/// Entity store kept in process memory. Contents are lost on restart.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store. Ids start at 1 for every kind.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                countries: Table::new(),
                cities: Table::new(),
                streets: Table::new(),
            }),
        }
    }

    /// See [`super::EntityStore::list`].
    pub async fn list(&self, kind: EntityKind, skip: u64, limit: u64) -> Vec<Record> {
        let tables = self.tables.read().await;
        tables
            .get(kind)
            .rows
            .values()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// See [`super::EntityStore::get`].
    pub async fn get(&self, kind: EntityKind, id: i64) -> Option<Record> {
        self.tables.read().await.get(kind).rows.get(&id).cloned()
    }

    /// See [`super::EntityStore::create`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on constraint violations.
    pub async fn create(&self, kind: EntityKind, input: NewRecord) -> Result<Record, ApiError> {
        let mut tables = self.tables.write().await;

        let parent_id = match kind.parent() {
            Some(_) => {
                let parent_id = input.parent_id.ok_or_else(|| parent_required(kind))?;
                tables.check_parent(kind, parent_id)?;
                Some(parent_id)
            }
            None => None,
        };

        let table = tables.get_mut(kind);
        if kind.has_unique_name() && table.name_taken(&input.name, None) {
            return Err(duplicate_name(kind, &input.name));
        }

        let now = Utc::now();
        let record = Record {
            kind,
            id: table.next_id,
            name: input.name,
            parent_id,
            created_at: now,
            updated_at: now,
        };
        table.next_id += 1;
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    /// See [`super::EntityStore::update`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on constraint violations.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: i64,
        patch: RecordPatch,
    ) -> Result<Option<Record>, ApiError> {
        let mut tables = self.tables.write().await;
        if !tables.get(kind).rows.contains_key(&id) {
            return Ok(None);
        }

        if kind.parent().is_some()
            && let Some(parent_id) = patch.parent_id
        {
            tables.check_parent(kind, parent_id)?;
        }

        let table = tables.get_mut(kind);
        if let Some(name) = &patch.name
            && kind.has_unique_name()
            && table.name_taken(name, Some(id))
        {
            return Err(duplicate_name(kind, name));
        }

        let Some(record) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(record, Utc::now());
        Ok(Some(record.clone()))
    }

    /// See [`super::EntityStore::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if children still reference the record.
    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool, ApiError> {
        let mut tables = self.tables.write().await;
        if !tables.get(kind).rows.contains_key(&id) {
            return Ok(false);
        }
        if let Some(child) = kind.child()
            && tables
                .get(child)
                .rows
                .values()
                .any(|r| r.parent_id == Some(id))
        {
            return Err(has_dependents(kind, id));
        }
        Ok(tables.get_mut(kind).rows.remove(&id).is_some())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
