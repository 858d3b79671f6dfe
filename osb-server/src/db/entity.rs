//! Per-record SQL and parameter lists
//!
//! The repositories are written once against [`Entity`]; each record type
//! only supplies its statements, its row mapper and the values it binds.

use sqlx::mysql::MySqlRow;

use osb_core::{encode_scores, encode_sys_info, BenchmarkResult, Specs, User};

use super::mapper::{scan_result, scan_specs, scan_user};
use super::DbError;

/// A named SQL statement. The name keys the statement cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sql {
    pub name: &'static str,
    pub text: &'static str,
}

/// The six statements behind a repository.
#[derive(Debug, Clone, Copy)]
pub struct Statements {
    pub list_all: Sql,
    pub list_by_owner: Sql,
    pub get: Sql,
    pub add: Sql,
    pub delete: Sql,
    pub update: Sql,
}

impl Statements {
    pub fn all(&self) -> [Sql; 6] {
        [
            self.list_all,
            self.list_by_owner,
            self.get,
            self.add,
            self.delete,
            self.update,
        ]
    }
}

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Text(String),
}

/// A record stored in one table.
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    /// Resource name used in errors and logs
    const RESOURCE: &'static str;

    const STATEMENTS: Statements;

    fn id(&self) -> i64;

    /// Map one row selected by the list/get statements.
    fn scan(row: &MySqlRow) -> Result<Self, DbError>;

    /// Values for the `add` statement, in placeholder order.
    fn insert_params(&self) -> Result<Vec<Param>, DbError>;

    /// Values for the `update` statement; the record id binds last.
    fn update_params(&self) -> Result<Vec<Param>, DbError>;
}

impl Entity for User {
    const RESOURCE: &'static str = "user";

    const STATEMENTS: Statements = Statements {
        list_all: Sql {
            name: "listUsers",
            text: "SELECT user_id, username, email, passwd FROM Users",
        },
        list_by_owner: Sql {
            name: "listUsersWithID",
            text: "SELECT user_id, username, email, passwd FROM Users WHERE user_id = ?",
        },
        get: Sql {
            name: "getUser",
            text: "SELECT user_id, username, email, passwd FROM Users WHERE user_id = ?",
        },
        add: Sql {
            name: "addUser",
            text: "INSERT INTO Users(username, email, passwd) VALUES(?, ?, ?)",
        },
        delete: Sql {
            name: "deleteUser",
            text: "DELETE FROM Users WHERE user_id = ?",
        },
        update: Sql {
            name: "updateUser",
            text: "UPDATE Users SET username = ?, email = ?, passwd = ? WHERE user_id = ?",
        },
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn scan(row: &MySqlRow) -> Result<Self, DbError> {
        scan_user(row)
    }

    fn insert_params(&self) -> Result<Vec<Param>, DbError> {
        Ok(vec![
            Param::Text(self.name.clone()),
            Param::Text(self.email.clone()),
            Param::Text(self.password_hash.clone()),
        ])
    }

    fn update_params(&self) -> Result<Vec<Param>, DbError> {
        let mut params = self.insert_params()?;
        params.push(Param::Int(self.id));
        Ok(params)
    }
}

impl Entity for BenchmarkResult {
    const RESOURCE: &'static str = "result";

    const STATEMENTS: Statements = Statements {
        list_all: Sql {
            name: "listResults",
            text: "SELECT result_id, user_id, scores_json FROM Results",
        },
        list_by_owner: Sql {
            name: "listResultsCreatedBy",
            text: "SELECT result_id, user_id, scores_json FROM Results WHERE user_id = ?",
        },
        get: Sql {
            name: "getResult",
            text: "SELECT result_id, user_id, scores_json FROM Results WHERE result_id = ?",
        },
        add: Sql {
            name: "addResult",
            text: "INSERT INTO Results(user_id, scores_json) VALUES(?, ?)",
        },
        delete: Sql {
            name: "deleteResult",
            text: "DELETE FROM Results WHERE result_id = ?",
        },
        update: Sql {
            name: "updateResult",
            text: "UPDATE Results SET user_id = ?, scores_json = ? WHERE result_id = ?",
        },
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn scan(row: &MySqlRow) -> Result<Self, DbError> {
        scan_result(row)
    }

    fn insert_params(&self) -> Result<Vec<Param>, DbError> {
        Ok(vec![
            Param::Int(self.user_id),
            Param::Text(encode_scores(&self.scores)?),
        ])
    }

    fn update_params(&self) -> Result<Vec<Param>, DbError> {
        let mut params = self.insert_params()?;
        params.push(Param::Int(self.id));
        Ok(params)
    }
}

impl Entity for Specs {
    const RESOURCE: &'static str = "specs";

    const STATEMENTS: Statements = Statements {
        list_all: Sql {
            name: "listSpecs",
            text: "SELECT specs_id, result_id, sys_info_json FROM Specs",
        },
        list_by_owner: Sql {
            name: "listSpecsWithResultID",
            text: "SELECT specs_id, result_id, sys_info_json FROM Specs WHERE result_id = ?",
        },
        get: Sql {
            name: "getSpecs",
            text: "SELECT specs_id, result_id, sys_info_json FROM Specs WHERE specs_id = ?",
        },
        add: Sql {
            name: "addSpecs",
            text: "INSERT INTO Specs(result_id, sys_info_json) VALUES(?, ?)",
        },
        delete: Sql {
            name: "deleteSpecs",
            text: "DELETE FROM Specs WHERE specs_id = ?",
        },
        update: Sql {
            name: "updateSpecs",
            text: "UPDATE Specs SET result_id = ?, sys_info_json = ? WHERE specs_id = ?",
        },
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn scan(row: &MySqlRow) -> Result<Self, DbError> {
        scan_specs(row)
    }

    fn insert_params(&self) -> Result<Vec<Param>, DbError> {
        Ok(vec![
            Param::Int(self.result_id),
            Param::Text(encode_sys_info(&self.sys_info)?),
        ])
    }

    fn update_params(&self) -> Result<Vec<Param>, DbError> {
        let mut params = self.insert_params()?;
        params.push(Param::Int(self.id));
        Ok(params)
    }
}
