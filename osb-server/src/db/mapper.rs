//! Row to record mapping
//!
//! Columns are read by position, in the order the list/get statements
//! select them. JSON columns are decoded with the `osb_core` codec.

use sqlx::mysql::{MySql, MySqlRow};
use sqlx::{Decode, Row, Type};

use osb_core::{decode_scores, decode_sys_info, BenchmarkResult, Specs, User};

use super::DbError;

pub fn scan_user(row: &MySqlRow) -> Result<User, DbError> {
    expect_columns(row, 4, "user")?;
    Ok(User {
        id: column(row, 0, "user")?,
        name: column(row, 1, "user")?,
        email: column(row, 2, "user")?,
        password_hash: column(row, 3, "user")?,
    })
}

pub fn scan_result(row: &MySqlRow) -> Result<BenchmarkResult, DbError> {
    expect_columns(row, 3, "result")?;
    let scores: String = column(row, 2, "result")?;
    Ok(BenchmarkResult {
        id: column(row, 0, "result")?,
        user_id: column(row, 1, "result")?,
        scores: decode_scores(&scores)?,
    })
}

pub fn scan_specs(row: &MySqlRow) -> Result<Specs, DbError> {
    expect_columns(row, 3, "specs")?;
    let sys_info: String = column(row, 2, "specs")?;
    Ok(Specs {
        id: column(row, 0, "specs")?,
        result_id: column(row, 1, "specs")?,
        sys_info: decode_sys_info(&sys_info)?,
    })
}

fn column<'r, T>(row: &'r MySqlRow, index: usize, resource: &'static str) -> Result<T, DbError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(index)
        .map_err(|source| DbError::Scan { resource, source })
}

fn expect_columns(row: &MySqlRow, expected: usize, resource: &'static str) -> Result<(), DbError> {
    if row.len() == expected {
        return Ok(());
    }
    Err(DbError::Scan {
        resource,
        source: sqlx::Error::Decode(
            format!("expected {} columns, found {}", expected, row.len()).into(),
        ),
    })
}
