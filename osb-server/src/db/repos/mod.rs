//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One cached prepared statement per operation
//! - Every query runs under the handle's deadline
//! - No transactions; a multi-step write can stop halfway
//! - Delete and update succeed when no row matches

pub mod users;

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;

use osb_core::{BenchmarkResult, Specs, User};

use super::entity::{Entity, Param, Sql};
use super::{Database, DbError};

/// Generic repository over one record type.
pub struct Repo<'a, T> {
    db: &'a Database,
    entity: PhantomData<fn() -> T>,
}

pub type UserRepo<'a> = Repo<'a, User>;
pub type ResultRepo<'a> = Repo<'a, BenchmarkResult>;
pub type SpecsRepo<'a> = Repo<'a, Specs>;

impl<'a, T: Entity> Repo<'a, T> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    /// Every row, in the store's natural order.
    pub async fn list_all(&self) -> Result<Vec<T>, DbError> {
        self.fetch_all(T::STATEMENTS.list_all, Vec::new()).await
    }

    /// Rows belonging to `owner_id`.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<T>, DbError> {
        self.fetch_all(T::STATEMENTS.list_by_owner, vec![Param::Int(owner_id)])
            .await
    }

    pub async fn get(&self, id: i64) -> Result<T, DbError> {
        self.fetch_one(T::STATEMENTS.get, vec![Param::Int(id)])
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: T::RESOURCE,
                id: id.to_string(),
            })
    }

    /// Insert `entity`, ignoring its id, and return the store-assigned id.
    pub async fn add(&self, entity: &T) -> Result<i64, DbError> {
        let done = self
            .db
            .execute(T::STATEMENTS.add, entity.insert_params()?)
            .await?;
        let id = generated_id(done.last_insert_id())?;

        tracing::debug!(resource = T::RESOURCE, id, "inserted");
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let done = self
            .db
            .execute(T::STATEMENTS.delete, vec![Param::Int(id)])
            .await?;

        tracing::debug!(resource = T::RESOURCE, id, rows = done.rows_affected(), "deleted");
        Ok(())
    }

    /// Overwrite every mutable column of the row with `entity.id()`.
    pub async fn update(&self, entity: &T) -> Result<(), DbError> {
        let done = self
            .db
            .execute(T::STATEMENTS.update, entity.update_params()?)
            .await?;

        tracing::debug!(
            resource = T::RESOURCE,
            id = entity.id(),
            rows = done.rows_affected(),
            "updated"
        );
        Ok(())
    }

    pub(crate) async fn fetch_all(&self, sql: Sql, params: Vec<Param>) -> Result<Vec<T>, DbError> {
        let rows = self.db.fetch_all(sql, params).await?;
        rows.iter().map(T::scan).collect()
    }

    pub(crate) async fn fetch_one(&self, sql: Sql, params: Vec<Param>) -> Result<Option<T>, DbError> {
        let row: Option<MySqlRow> = self.db.fetch_optional(sql, params).await?;
        row.as_ref().map(T::scan).transpose()
    }
}

/// Ids are signed BIGINT columns; anything above `i64::MAX` is a store fault.
fn generated_id(raw: u64) -> Result<i64, DbError> {
    i64::try_from(raw).map_err(|_| {
        DbError::Sqlx(sqlx::Error::Decode(
            format!("generated id {} does not fit in a BIGINT", raw).into(),
        ))
    })
}

/// Record access used by the HTTP layer.
///
/// Implemented by [`Database`] for every [`Entity`]; tests can substitute an
/// in-memory store.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn list_all(&self) -> Result<Vec<T>, DbError>;

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<T>, DbError>;

    async fn get(&self, id: i64) -> Result<T, DbError>;

    async fn add(&self, entity: &T) -> Result<i64, DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;

    async fn update(&self, entity: &T) -> Result<(), DbError>;
}

/// Credential lookup for basic-auth gated endpoints.
#[async_trait]
pub trait Credentials: Send + Sync {
    /// Find the user whose name and stored hash both match.
    async fn get_by_credentials(&self, name: &str, password_hash: &str) -> Result<User, DbError>;
}

/// Everything the API needs from a backing store.
pub trait Store:
    Repository<User> + Repository<BenchmarkResult> + Repository<Specs> + Credentials
{
}

impl<S> Store for S where
    S: Repository<User> + Repository<BenchmarkResult> + Repository<Specs> + Credentials
{
}

#[async_trait]
impl<T: Entity> Repository<T> for Database {
    async fn list_all(&self) -> Result<Vec<T>, DbError> {
        self.repo::<T>().list_all().await
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<T>, DbError> {
        self.repo::<T>().list_by_owner(owner_id).await
    }

    async fn get(&self, id: i64) -> Result<T, DbError> {
        self.repo::<T>().get(id).await
    }

    async fn add(&self, entity: &T) -> Result<i64, DbError> {
        self.repo::<T>().add(entity).await
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.repo::<T>().delete(id).await
    }

    async fn update(&self, entity: &T) -> Result<(), DbError> {
        self.repo::<T>().update(entity).await
    }
}

#[async_trait]
impl Credentials for Database {
    async fn get_by_credentials(&self, name: &str, password_hash: &str) -> Result<User, DbError> {
        self.users().get_by_credentials(name, password_hash).await
    }
}
