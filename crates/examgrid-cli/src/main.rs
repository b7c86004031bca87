//! examgrid CLI
//!
//! Configure exam sessions, exclusions and constraints, then queue
//! timetable generation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use examgrid_core::logging_facility;

mod commands;
mod config;

use commands::App;
use config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "examgrid")]
#[command(about = "examgrid - Exam timetable configuration", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./examgrid.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overrides configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Acting user, overrides configuration
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Session settings (topology) versions
    Session(commands::session::SessionArgs),
    /// Period mapping for a topology
    Calendar(commands::calendar::CalendarArgs),
    /// Institutional holidays (system-locked periods)
    Holiday(commands::holiday::HolidayArgs),
    /// Exclusion snapshots
    Exclusion(commands::exclusion::ExclusionArgs),
    /// Constraint snapshots
    Constraint(commands::constraint::ConstraintArgs),
    /// Institutional context and readiness
    Context(commands::context::ContextArgs),
    /// Queue timetable generation for the selected configuration
    Generate,
    /// Start an authenticated session
    Login {
        username: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// End the session and clear every selection
    Logout,
    /// Check that the database answers within the probe timeout
    Probe,
}

fn run(cli: Cli) -> commands::CliResult {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(actor) = cli.actor {
        config.actor = actor;
    }
    logging_facility::init(config.profile());

    let mut app = App::open(config)?;
    match cli.command {
        Commands::Session(args) => commands::session::execute(&mut app, args)?,
        Commands::Calendar(args) => commands::calendar::execute(&mut app, args)?,
        Commands::Holiday(args) => commands::holiday::execute(&mut app, args)?,
        Commands::Exclusion(args) => commands::exclusion::execute(&mut app, args)?,
        Commands::Constraint(args) => commands::constraint::execute(&mut app, args)?,
        Commands::Context(args) => commands::context::execute(&mut app, args)?,
        Commands::Generate => commands::generate::execute(&mut app)?,
        Commands::Login { username, token } => {
            app.session.login(username.clone(), token);
            println!("Logged in as {username}");
        }
        Commands::Logout => {
            app.session.logout();
            println!("Logged out; context cleared");
        }
        Commands::Probe => {
            let timeout = std::time::Duration::from_millis(app.config.probe_timeout_ms);
            let elapsed = examgrid_store::db::probe(&app.conn, timeout)?;
            println!("Database reachable ({}ms)", elapsed.as_millis());
        }
    }
    app.finish()
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
