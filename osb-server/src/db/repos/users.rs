//! User-only queries

use osb_core::User;

use super::UserRepo;
use crate::db::entity::{Param, Sql};
use crate::db::DbError;

const GET_BY_CREDENTIALS: Sql = Sql {
    name: "getUserByCredentials",
    text: "SELECT user_id, username, email, passwd FROM Users WHERE username = ? AND passwd = ?",
};

impl UserRepo<'_> {
    /// Find the user with this name and password hash.
    ///
    /// The hash is compared verbatim; hashing is up to the caller.
    pub async fn get_by_credentials(&self, name: &str, password_hash: &str) -> Result<User, DbError> {
        self.fetch_one(
            GET_BY_CREDENTIALS,
            vec![
                Param::Text(name.to_owned()),
                Param::Text(password_hash.to_owned()),
            ],
        )
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: name.to_owned(),
        })
    }
}
