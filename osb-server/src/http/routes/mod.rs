//! Route handlers organized by resource

pub mod results;
pub mod specs;
pub mod users;

use serde::Serialize;

/// Body returned when a store assigns a new id.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Body returned by delete and update endpoints.
#[derive(Debug, Serialize)]
pub struct Empty {}
