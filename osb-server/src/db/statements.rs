//! Prepared statement cache
//!
//! Every statement is compiled at most once per handle, on first use, and
//! then shared by all callers. Concurrent first callers for the same name
//! wait on a per-name once-cell; lookups after that only take the shared
//! side of the map lock.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::OnceCell;

use super::DbError;

type Slot<S> = Arc<OnceCell<Arc<S>>>;

/// Named statement handles, prepared lazily and never evicted.
pub struct StatementCache<S> {
    slots: RwLock<HashMap<&'static str, Slot<S>>>,
}

impl<S> Default for StatementCache<S> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> StatementCache<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name`, running `compile` if it was never
    /// prepared.
    ///
    /// `compile` runs at most once per name even under concurrent callers.
    /// If it fails, the error is returned and the next caller tries again.
    pub async fn prepare<F, Fut>(&self, name: &'static str, compile: F) -> Result<Arc<S>, DbError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, sqlx::Error>>,
    {
        let slot = self.slot(name);
        let handle = slot
            .get_or_try_init(|| async {
                tracing::debug!(statement = name, "preparing statement");
                compile().await.map(Arc::new)
            })
            .await
            .map_err(|source| DbError::Prepare {
                statement: name,
                source,
            })?;

        Ok(Arc::clone(handle))
    }

    /// Look up an already prepared handle.
    pub fn get(&self, name: &'static str) -> Result<Arc<S>, DbError> {
        self.read()
            .get(name)
            .and_then(|slot| slot.get().cloned())
            .ok_or(DbError::StatementNotFound(name))
    }

    /// Number of statements prepared so far.
    pub fn len(&self) -> usize {
        self.read().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every handle, returning the prepared ones so the caller can
    /// release them.
    pub fn drain(&self) -> Vec<Arc<S>> {
        self.write()
            .drain()
            .filter_map(|(_, slot)| slot.get().cloned())
            .collect()
    }

    fn slot(&self, name: &'static str) -> Slot<S> {
        if let Some(slot) = self.read().get(name) {
            return Arc::clone(slot);
        }
        Arc::clone(self.write().entry(name).or_default())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<&'static str, Slot<S>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<&'static str, Slot<S>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}
