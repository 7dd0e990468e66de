use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::AuditEnvelope;

use super::Entity;

/// One entity arena. Soft-deleted rows stay in the map and every read
/// path filters them out; nothing physically drops a row.
pub struct Table<T: Entity> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity> Table<T> {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, T>> {
        self.rows.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, T>> {
        self.rows.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert with a fresh audit envelope; whatever lifecycle state the
    /// caller put on the entity is overwritten.
    pub fn insert(&self, mut entity: T) -> T {
        *entity.audit_mut() = AuditEnvelope::new();
        let stored = entity.clone();
        self.write().insert(entity.id(), entity);
        tracing::debug!("{} {} created", T::KIND, stored.id());
        stored
    }

    pub fn insert_many(&self, entities: Vec<T>) -> Vec<T> {
        entities.into_iter().map(|e| self.insert(e)).collect()
    }

    /// Fetch by id. Soft-deleted rows are reported as absent.
    pub fn get(&self, id: Uuid) -> Option<T> {
        self.read()
            .get(&id)
            .filter(|e| !e.audit().is_deleted())
            .cloned()
    }

    /// All live rows, newest creation first.
    pub fn list(&self) -> Vec<T> {
        self.find(|_| true)
    }

    /// Live rows matching the predicate, newest creation first.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .read()
            .values()
            .filter(|e| !e.audit().is_deleted() && predicate(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.audit().creation_date.cmp(&a.audit().creation_date));
        rows
    }

    /// Apply a mutation and stamp the row as modified. Absent and
    /// soft-deleted rows are not updatable.
    pub fn update(&self, id: Uuid, mutate: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.write();
        let entity = rows.get_mut(&id).filter(|e| !e.audit().is_deleted())?;
        mutate(entity);
        entity.audit_mut().touch();
        Some(entity.clone())
    }

    /// Apply a mutation without moving the lifecycle state: the update
    /// date is refreshed but the status stays as it was. Used for field
    /// toggles that are not considered edits of the record.
    pub fn patch(&self, id: Uuid, mutate: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.write();
        let entity = rows.get_mut(&id).filter(|e| !e.audit().is_deleted())?;
        mutate(entity);
        entity.audit_mut().update_date = Some(Utc::now());
        Some(entity.clone())
    }

    /// Retire a row. Returns `None` when the row is absent or already
    /// retired; the transition to inactive happens at most once.
    pub fn soft_remove(&self, id: Uuid) -> Option<T> {
        let mut rows = self.write();
        let entity = rows.get_mut(&id).filter(|e| !e.audit().is_deleted())?;
        entity.audit_mut().retire();
        tracing::debug!("{} {} retired", T::KIND, id);
        Some(entity.clone())
    }

}
