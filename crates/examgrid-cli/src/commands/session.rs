//! Session settings (topology) commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use examgrid_core::model::{NewSessionSettings, SessionSettings};
use examgrid_core::model::topology::{DEFAULT_DAYS_PER_WEEK, DEFAULT_PERIODS_PER_DAY};
use examgrid_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use examgrid_engine::commands::topology::select_topology;
use examgrid_store::topology::{current_topology, topology_history};

use super::{App, CliResult};

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Save a new topology version
    Save(SaveArgs),
    /// Show the newest version
    Current,
    /// List every version, newest first
    History,
    /// Select a version explicitly
    Select { id: i64 },
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// First exam day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,
    /// Last exam day (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,
    #[arg(long, default_value_t = DEFAULT_DAYS_PER_WEEK)]
    pub days_per_week: u8,
    #[arg(long, default_value_t = DEFAULT_PERIODS_PER_DAY)]
    pub periods_per_day: u32,
    /// Academic session label, e.g. 2024/2025
    #[arg(long)]
    pub session: Option<String>,
    #[arg(long)]
    pub semester: Option<u8>,
    #[arg(long)]
    pub description: Option<String>,
}

pub fn execute(app: &mut App, args: SessionArgs) -> CliResult {
    match args.command {
        SessionCommand::Save(save) => {
            let input = NewSessionSettings {
                description: save.description,
                session: save.session,
                semester: save.semester,
                days_per_week: save.days_per_week,
                periods_per_day: save.periods_per_day,
                start_date: save.start,
                end_date: save.end,
            };
            let rc = app.request();
            let result = apply_engine_command(
                EngineCommand::SaveTopology(input),
                &mut app.conn,
                &app.policy,
                &rc,
                app.session.context_mut(),
                None,
            )?;
            if let EngineCommandResult::TopologySaved(saved) = result {
                println!("Session settings saved:");
                print_settings(&saved);
            }
        }
        SessionCommand::Current => match current_topology(&app.conn)? {
            Some(settings) => print_settings(&settings),
            None => println!("No session settings saved yet"),
        },
        SessionCommand::History => {
            for settings in topology_history(&app.conn)? {
                println!(
                    "{:>4}  {} .. {}  {}x{}  {}",
                    settings.id,
                    settings.topology.start_date,
                    settings.topology.end_date,
                    settings.topology.days_per_week,
                    settings.topology.periods_per_day,
                    settings.session.as_deref().unwrap_or("-"),
                );
            }
        }
        SessionCommand::Select { id } => {
            let settings = select_topology(&app.conn, id, app.session.context_mut())?;
            println!("Selected session settings {}", settings.id);
        }
    }
    Ok(())
}

fn print_settings(settings: &SessionSettings) {
    let topology = &settings.topology;
    println!("  id: {}", settings.id);
    println!("  session: {}", settings.session.as_deref().unwrap_or("-"));
    println!(
        "  semester: {}",
        settings
            .semester
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  dates: {} .. {}", topology.start_date, topology.end_date);
    println!("  days_per_week: {}", topology.days_per_week);
    println!("  periods_per_day: {}", topology.periods_per_day);
    println!("  exam_weeks: {}", topology.exam_weeks);
}
