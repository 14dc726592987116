//! Herdbook CLI
//!
//! Command-line interface for Herdbook - animal record keeping.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use herdbook_core::{
    authenticate, AnimalDraft, AnimalId, AnimalPatch, AnimalRepository, Config, Operator,
};

mod commands;
mod logging;
mod output;
mod prompt;
mod shell;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "herdbook")]
#[command(about = "Herdbook - keep track of the animals on the farm")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Username to sign in with (prompted when missing)
    #[arg(short, long, global = true, env = "HERDBOOK_USER")]
    user: Option<String>,

    /// Password to sign in with (prompted, masked, when missing)
    #[arg(long, global = true, env = "HERDBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Shell,
    /// List all animals
    #[command(alias = "ls")]
    List,
    /// Show animal details
    Show {
        /// Animal ID
        id: AnimalId,
    },
    /// Add a new animal
    #[command(alias = "create")]
    Add {
        /// Name
        name: String,
        /// Age in years
        age: u32,
        /// Species
        species: String,
    },
    /// Edit an animal (prompts for each field when no flags are given)
    Edit {
        /// Animal ID
        id: AnimalId,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New age
        #[arg(long)]
        age: Option<u32>,
        /// New species
        #[arg(long)]
        species: Option<String>,
    },
    /// Delete an animal
    #[command(alias = "rm")]
    Delete {
        /// Animal ID
        id: AnimalId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show status (data file, record count, skipped lines)
    Status,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(err) = &result {
        output.recovery_hint(err);
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config);

    // Commands that don't need a signed-in operator or the record file
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => {
                commands::config::show(&config, cli.config.as_ref(), output)
            }
            Some(ConfigCommands::Init { force }) => {
                commands::config::init(cli.config.as_ref(), *force, output)
            }
        };
    }

    let operator = sign_in(&config, cli.user.clone(), cli.password.clone())?;
    info!("Signed in as {} ({})", operator.username, operator.role);

    let mut repo = AnimalRepository::open(&config.data_file).with_context(|| {
        format!("Failed to open record file {:?}", config.data_file)
    })?;

    if !repo.load_warnings().is_empty() {
        warn!(
            "{} corrupt line(s) skipped in {}",
            repo.load_warnings().len(),
            repo.location()
        );
    }

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run(&mut repo, &operator, output),
        Commands::List => commands::animal::list(&repo, &operator, output),
        Commands::Show { id } => commands::animal::show(&repo, &operator, id, output),
        Commands::Add { name, age, species } => commands::animal::create(
            &mut repo,
            &operator,
            AnimalDraft::new(name, age, species),
            output,
        )
        .map(|_| ()),
        Commands::Edit {
            id,
            name,
            age,
            species,
        } => commands::animal::edit(
            &mut repo,
            &operator,
            id,
            AnimalPatch { name, age, species },
            output,
        ),
        Commands::Delete { id, yes } => {
            commands::animal::delete(&mut repo, &operator, id, yes, output)
        }
        Commands::Status => commands::status::show(&repo, &operator, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Authenticate against the configured operators
///
/// Missing credentials are prompted for; the password prompt is masked.
fn sign_in(config: &Config, user: Option<String>, password: Option<String>) -> Result<Operator> {
    let username = match user {
        Some(user) => user,
        None => prompt::prompt_required("Username")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt::read_password("Password: ")?,
    };

    authenticate(&config.operators, &username, &password).map_err(|e| {
        warn!("Failed sign-in for {}", username);
        anyhow::Error::new(e)
    })
}
