//! Command implementations for the osb CLI

pub mod check;
pub mod serve;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use inquire::{Password, PasswordDisplayMode};

use osb_server::db::{join_host_port, ConnectOptions, Database};

pub use check::run_check;
pub use serve::run_serve;

/// Connection flags shared by every command that opens the database
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database user
    #[arg(long, env = "OSB_DB_USER", default_value = "osbadmin")]
    pub dbuser: String,

    /// Database host
    #[arg(long, env = "OSB_DB_HOST", default_value = "127.0.0.1")]
    pub dbhost: String,

    /// Database port
    #[arg(long, env = "OSB_DB_PORT", default_value_t = 3306)]
    pub dbport: u16,

    /// Database name
    #[arg(long, env = "OSB_DB_NAME", default_value = "osb_db")]
    pub dbname: String,

    /// Per-query deadline in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub query_timeout: u64,

    /// Upper bound on pooled connections
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

impl DbArgs {
    pub fn address(&self) -> String {
        join_host_port(&self.dbhost, self.dbport)
    }

    /// Read the password, then open and ping the database.
    pub async fn connect(&self) -> Result<Database> {
        let password = read_password(&self.dbuser)?;
        let address = self.address();
        let options = ConnectOptions {
            query_timeout: Duration::from_secs(self.query_timeout),
            max_connections: self.max_connections,
        };

        Database::connect_with(&self.dbuser, &password, &address, &self.dbname, options)
            .await
            .with_context(|| format!("Failed to connect to {} at {}", self.dbname, address))
    }
}

/// `OSB_DB_PASSWORD` wins; otherwise prompt without echo.
fn read_password(user: &str) -> Result<String> {
    if let Ok(password) = std::env::var("OSB_DB_PASSWORD") {
        return Ok(password);
    }

    if !std::io::stdin().is_terminal() {
        bail!("OSB_DB_PASSWORD is not set and stdin is not a terminal");
    }

    Password::new(&format!("Password for {}:", user))
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()
        .context("Failed to read database password")
}
