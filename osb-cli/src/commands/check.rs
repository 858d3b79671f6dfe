//! Connectivity check: open the database, count every table, close.

use anyhow::{Context, Result};
use clap::Parser;

use osb_server::db::Database;

use super::DbArgs;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

pub async fn run_check(args: CheckArgs) -> Result<()> {
    let db = args.db.connect().await?;
    let counts = count_rows(&db).await;

    tracing::debug!(statements = db.prepared_statements(), "check finished");
    db.close().await;

    let (users, results, specs) = counts?;
    println!(
        "{} at {}: {} users, {} results, {} specs",
        args.db.dbname,
        args.db.address(),
        users,
        results,
        specs
    );
    Ok(())
}

async fn count_rows(db: &Database) -> Result<(usize, usize, usize)> {
    let users = db.users().list_all().await.context("Failed to list users")?;
    let results = db
        .results()
        .list_all()
        .await
        .context("Failed to list results")?;
    let specs = db.specs().list_all().await.context("Failed to list specs")?;
    Ok((users.len(), results.len(), specs.len()))
}
