//! Database layer - connection handle and repositories
//!
//! # Design Principles
//!
//! - One prepared statement per operation, compiled once per handle
//! - Rows mapped by position, JSON columns decoded on read
//! - A fixed deadline on every query
//! - No transactions; the store's schema owns referential integrity

pub mod database;
pub mod entity;
pub mod error;
pub mod mapper;
pub mod repos;
pub mod statements;

pub use database::{join_host_port, split_address, ConnectOptions, Database, DEFAULT_QUERY_TIMEOUT};
pub use entity::{Entity, Param, Sql, Statements};
pub use error::DbError;
pub use repos::{Credentials, Repo, Repository, ResultRepo, SpecsRepo, Store, UserRepo};
pub use statements::StatementCache;
