//! Exclusion snapshot commands

use clap::{Args, Subcommand};
use examgrid_engine::commands::exclusions::ExclusionWorkspace;

use super::{parse_periods, App, CliResult};

#[derive(Debug, Args)]
pub struct ExclusionArgs {
    /// Topology id (defaults to the selected one)
    #[arg(long, global = true)]
    pub topology: Option<i64>,

    #[command(subcommand)]
    pub command: ExclusionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExclusionCommand {
    /// Show the working set (active snapshot or locks only)
    Show,
    /// Edit the working set and save it as a new snapshot
    Save(SaveArgs),
    /// Make a stored snapshot the active one
    Activate { snapshot_id: i64 },
    /// Snapshots for the topology, newest first
    History,
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Start from the locked periods only
    #[arg(long, conflicts_with = "select_all")]
    pub clear: bool,
    /// Start from every period excluded
    #[arg(long)]
    pub select_all: bool,
    /// Period indices to flip, comma separated
    #[arg(long, default_value = "")]
    pub toggle: String,
    /// Save without making the snapshot active
    #[arg(long)]
    pub inactive: bool,
}

pub fn execute(app: &mut App, args: ExclusionArgs) -> CliResult {
    let topology_id = app.topology_id(args.topology)?;
    let mut ws = ExclusionWorkspace::open(&app.conn, topology_id)?;
    match args.command {
        ExclusionCommand::Show => {
            let buffer = ws.buffer();
            println!("Name: {}", buffer.name());
            match ws.active() {
                Some(active) => println!("Active snapshot: {}", active.id),
                None => println!("Active snapshot: none"),
            }
            println!("Locked: {}", join(buffer.locked().iter()));
            println!("Excluded: {}", join(buffer.excluded().iter()));
            println!(
                "Excluded {} of {} periods",
                buffer.excluded().len(),
                ws.mapping().total_periods
            );
        }
        ExclusionCommand::Save(save) => {
            if save.clear {
                ws.clear_manual();
            }
            if save.select_all {
                ws.select_all();
            }
            for period in parse_periods(&save.toggle)? {
                if !ws.toggle(period) {
                    println!("Period {period} is locked or unknown; left unchanged");
                }
            }
            if let Some(name) = save.name {
                ws.set_name(name);
            }
            let rc = app.request();
            let saved = ws.save(
                &mut app.conn,
                &app.policy,
                &rc,
                !save.inactive,
                Some(app.session.context_mut()),
            )?;
            println!("Exclusion snapshot saved:");
            println!("  snapshot_id: {}", saved.id);
            println!("  name: {}", saved.name);
            println!("  active: {}", saved.is_active);
            println!("  excluded: {}", join(saved.excluded_periods.iter()));
        }
        ExclusionCommand::Activate { snapshot_id } => {
            let rc = app.request();
            let activated = ws.activate(
                &mut app.conn,
                &app.policy,
                &rc,
                snapshot_id,
                Some(app.session.context_mut()),
            )?;
            println!("Activated exclusion snapshot {}", activated.id);
        }
        ExclusionCommand::History => {
            for snapshot in ws.history(&app.conn)? {
                println!(
                    "{:>4} {} {:<32} {:>3} periods  {}  by {}",
                    snapshot.id,
                    if snapshot.is_active { "*" } else { " " },
                    snapshot.name,
                    snapshot.excluded_periods.len(),
                    snapshot.created_at.format("%Y-%m-%d %H:%M"),
                    snapshot.created_by,
                );
            }
        }
    }
    Ok(())
}

fn join<'a>(periods: impl Iterator<Item = &'a u32>) -> String {
    let parts: Vec<String> = periods.map(u32::to_string).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(",")
    }
}
