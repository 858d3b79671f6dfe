//! In-memory store used by the HTTP tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use osb_core::{BenchmarkResult, Specs, User};
use osb_server::db::{Credentials, DbError, Repository};

pub struct Table<T> {
    rows: Mutex<BTreeMap<i64, T>>,
    next_id: Mutex<i64>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }
}

/// Store whose every call can be made to fail with a timeout.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Table<User>,
    pub results: Table<BenchmarkResult>,
    pub specs: Table<Specs>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DbError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Timeout {
                statement: "memory",
                after: Duration::from_secs(5),
            });
        }
        Ok(())
    }

    pub fn rows<T: Record>(&self) -> Vec<T> {
        T::table(self).rows.lock().unwrap().values().cloned().collect()
    }
}

pub trait Record: Clone + Send + Sync + 'static {
    const RESOURCE: &'static str;

    fn table(store: &MemoryStore) -> &Table<Self>;
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn owner(&self) -> i64;
}

impl Record for User {
    const RESOURCE: &'static str = "user";

    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.users
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn owner(&self) -> i64 {
        self.id
    }
}

impl Record for BenchmarkResult {
    const RESOURCE: &'static str = "result";

    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.results
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn owner(&self) -> i64 {
        self.user_id
    }
}

impl Record for Specs {
    const RESOURCE: &'static str = "specs";

    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.specs
    }
    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn owner(&self) -> i64 {
        self.result_id
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryStore {
    async fn list_all(&self) -> Result<Vec<T>, DbError> {
        self.check()?;
        Ok(self.rows())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<T>, DbError> {
        self.check()?;
        Ok(self
            .rows::<T>()
            .into_iter()
            .filter(|row| row.owner() == owner_id)
            .collect())
    }

    async fn get(&self, id: i64) -> Result<T, DbError> {
        self.check()?;
        T::table(self)
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                resource: T::RESOURCE,
                id: id.to_string(),
            })
    }

    async fn add(&self, entity: &T) -> Result<i64, DbError> {
        self.check()?;
        let table = T::table(self);
        let id = {
            let mut next = table.next_id.lock().unwrap();
            let id = *next;
            *next += 1;
            id
        };
        let mut row = entity.clone();
        row.set_id(id);
        table.rows.lock().unwrap().insert(id, row);
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.check()?;
        T::table(self).rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<(), DbError> {
        self.check()?;
        let mut rows = T::table(self).rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&entity.id()) {
            *row = entity.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl Credentials for MemoryStore {
    async fn get_by_credentials(&self, name: &str, password_hash: &str) -> Result<User, DbError> {
        self.check()?;
        self.rows::<User>()
            .into_iter()
            .find(|u| u.name == name && u.password_hash == password_hash)
            .ok_or_else(|| DbError::NotFound {
                resource: "user",
                id: name.to_owned(),
            })
    }
}
