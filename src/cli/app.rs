//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use super::output::{Output, OutputFormat};
use super::{claim, employee, history, logging, posting, query, schedule};
use super::session::Session;
use crate::storage::{Config, Project, PROJECT_DIR};

#[derive(Parser)]
#[command(name = "staffbook")]
#[command(author, version, about = "Employee records, schedules, expense claims and recruitment postings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new staffbook project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show record counts and where the data lives
    Status,

    /// Manage employees
    #[command(subcommand)]
    Employee(employee::EmployeeCommands),

    /// Manage work schedules
    #[command(subcommand)]
    Schedule(schedule::ScheduleCommands),

    /// Manage expense claims
    #[command(subcommand)]
    Claim(claim::ClaimCommands),

    /// Manage recruitment postings
    #[command(subcommand)]
    Posting(posting::PostingCommands),

    /// Remove every record from the book
    Clear,

    /// Show previously run commands
    History {
        /// Print only the command this many steps back
        #[arg(long)]
        back: Option<usize>,

        /// Forget all remembered commands
        #[arg(long, conflicts_with = "back")]
        clear: bool,
    },
}

impl Commands {
    /// Whether running this command is remembered in the history
    fn is_recorded(&self) -> bool {
        !matches!(self, Commands::Init { .. } | Commands::History { .. })
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(cli.verbose, config.project.log_level.as_deref());

    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("staffbook starting");

    if cli.command.is_recorded() && config.is_in_project() {
        remember_invocation(&output);
    }

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx("init", &format!("Created {} directory at: {}", PROJECT_DIR, project.data_dir().display()));
            output.success(&format!("Initialized staffbook project at {}", project.root().display()));
        }

        Commands::Status => {
            output.verbose("Gathering project status");
            query::status(&output)?
        }

        Commands::Employee(cmd) => employee::run(cmd, &output)?,
        Commands::Schedule(cmd) => schedule::run(cmd, &output)?,
        Commands::Claim(cmd) => claim::run(cmd, &output)?,
        Commands::Posting(cmd) => posting::run(cmd, &output)?,

        Commands::Clear => clear(&output)?,

        Commands::History { back, clear } => history::show(&output, back, clear)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Records the current command line; failures only warn
fn remember_invocation(output: &Output) {
    let line = history::command_line(std::env::args().skip(1));
    let result = Project::open_current().and_then(|project| history::record(&project.history_file(), &line));

    match result {
        Ok(()) => output.verbose_ctx("history", &format!("Recorded: {}", line)),
        Err(err) => warn!(error = %format!("{err:#}"), "could not record command history"),
    }
}

/// Empties all four collections
fn clear(output: &Output) -> Result<()> {
    Session::run(output, |session| {
        let removed = session.book().snapshot().record_count();
        session.book_mut().clear()?;

        if output.is_json() {
            output.data(&serde_json::json!({ "cleared": true, "removed": removed }));
        } else {
            output.success(&format!("Record book has been cleared ({} records removed)", removed));
        }
        Ok(())
    })
}
