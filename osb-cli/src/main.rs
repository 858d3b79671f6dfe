//! osb CLI - OSB benchmark results server
//!
//! Entry point for the results backend:
//! - `serve` runs the JSON API over the MySQL store
//! - `check` verifies the database is reachable and readable
//! - `completions` prints shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "osb",
    author,
    version,
    about = "Storage and JSON API for OSB benchmark results",
    long_about = "Serves submitted benchmark results, the machines they ran on and the \
                  users who uploaded them from a MySQL database."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to the database and report table sizes
    Check(commands::check::CheckArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Check(args) => commands::run_check(args).await?,
        Commands::Completions(args) => run_completions(args),
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
