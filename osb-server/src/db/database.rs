//! Database handle
//!
//! Opens the MySQL connection pool, checks the server answers, and hands
//! out the three repositories. Statements are prepared through the handle's
//! [`StatementCache`] and every query runs under a fixed deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::{
    MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlQueryResult,
    MySqlRow, MySqlStatement,
};
use sqlx::query::Query;
use sqlx::{Connection, Executor, Statement};

use osb_core::{BenchmarkResult, Specs, User};

use super::entity::{Entity, Param, Sql};
use super::repos::Repo;
use super::statements::StatementCache;
use super::DbError;

/// Deadline applied to every query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Kept low; the driver reuses connections across requests.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Optional connection settings.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub query_timeout: Duration,
    pub max_connections: u32,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Shared handle to the results database.
pub struct Database {
    pool: MySqlPool,
    statements: StatementCache<MySqlStatement<'static>>,
    query_timeout: Duration,
}

impl Database {
    /// Connect with default options.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] if the server cannot be reached or
    /// does not answer a ping, and [`DbError::Address`] if `address` is not
    /// `host:port`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect("osbadmin", &password, "127.0.0.1:3306", "osb_db").await?;
    /// ```
    pub async fn connect(
        user: &str,
        password: &str,
        address: &str,
        db_name: &str,
    ) -> Result<Self, DbError> {
        Self::connect_with(user, password, address, db_name, ConnectOptions::default()).await
    }

    pub async fn connect_with(
        user: &str,
        password: &str,
        address: &str,
        db_name: &str,
        options: ConnectOptions,
    ) -> Result<Self, DbError> {
        let (host, port) = split_address(address)?;
        let connect = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .password(password)
            .database(db_name);

        let connection_error = |source| DbError::Connection {
            address: address.to_owned(),
            source,
        };

        let pool = MySqlPoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect)
            .await
            .map_err(connection_error)?;

        if let Err(source) = ping(&pool).await {
            pool.close().await;
            return Err(connection_error(source));
        }

        tracing::info!(address, database = db_name, "connected to database");
        Ok(Self {
            pool,
            statements: StatementCache::new(),
            query_timeout: options.query_timeout,
        })
    }

    pub fn users(&self) -> Repo<'_, User> {
        Repo::new(self)
    }

    pub fn results(&self) -> Repo<'_, BenchmarkResult> {
        Repo::new(self)
    }

    pub fn specs(&self) -> Repo<'_, Specs> {
        Repo::new(self)
    }

    pub fn repo<T: Entity>(&self) -> Repo<'_, T> {
        Repo::new(self)
    }

    /// Number of statements prepared on this handle so far.
    pub fn prepared_statements(&self) -> usize {
        self.statements.len()
    }

    /// Release every prepared statement and close the pool.
    pub async fn close(self) {
        let released = self.statements.drain();
        tracing::info!(statements = released.len(), "closing database");
        drop(released);
        self.pool.close().await;
    }

    async fn statement(&self, sql: Sql) -> Result<Arc<MySqlStatement<'static>>, DbError> {
        let pool = &self.pool;
        self.statements
            .prepare(sql.name, || async move { pool.prepare(sql.text).await })
            .await
    }

    pub(crate) async fn fetch_all(&self, sql: Sql, params: Vec<Param>) -> Result<Vec<MySqlRow>, DbError> {
        let statement = self.statement(sql).await?;
        let query = bind(statement.query(), params).fetch_all(&self.pool);
        with_deadline(self.query_timeout, sql.name, query).await
    }

    pub(crate) async fn fetch_optional(
        &self,
        sql: Sql,
        params: Vec<Param>,
    ) -> Result<Option<MySqlRow>, DbError> {
        let statement = self.statement(sql).await?;
        let query = bind(statement.query(), params).fetch_optional(&self.pool);
        with_deadline(self.query_timeout, sql.name, query).await
    }

    pub(crate) async fn execute(&self, sql: Sql, params: Vec<Param>) -> Result<MySqlQueryResult, DbError> {
        let statement = self.statement(sql).await?;
        let query = bind(statement.query(), params).execute(&self.pool);
        with_deadline(self.query_timeout, sql.name, query).await
    }
}

async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}

fn bind<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: Vec<Param>,
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Param::Int(value) => query.bind(value),
            Param::Text(value) => query.bind(value),
        };
    }
    query
}

/// Run `query`, failing with [`DbError::Timeout`] once `timeout` elapses.
pub(crate) async fn with_deadline<T, F>(
    timeout: Duration,
    statement: &'static str,
    query: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => {
            tracing::warn!(statement, ?timeout, "query deadline exceeded");
            Err(DbError::Timeout {
                statement,
                after: timeout,
            })
        }
    }
}

/// Split `host:port`, accepting a bracketed IPv6 host.
pub fn split_address(address: &str) -> Result<(&str, u16), DbError> {
    let invalid = || DbError::Address(address.to_owned());

    let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return Err(invalid());
    }
    let port = port.parse().map_err(|_| invalid())?;
    Ok((host, port))
}

/// Inverse of [`split_address`].
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}
