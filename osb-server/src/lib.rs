//! osb-server: storage and HTTP API for OSB benchmark results
//!
//! The [`db`] module owns the MySQL handle, its statement cache and the
//! per-record repositories. The [`http`] module serves them as JSON.

pub mod db;
pub mod http;

pub use db::{ConnectOptions, Database, DbError, Repository, Store};
pub use http::{build_router, run_server, ServerConfig, ServerError};
