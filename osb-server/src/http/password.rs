//! Password hashing for the `passwd` column.
//!
//! Stored values are the lowercase hex SHA-512 of the plaintext. The same
//! function runs on registration, profile update and basic-auth lookup.

use sha2::{Digest, Sha512};

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha512::digest(password.as_bytes()))
}
