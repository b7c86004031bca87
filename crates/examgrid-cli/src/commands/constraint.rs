//! Constraint snapshot commands

use clap::{Args, Subcommand};
use examgrid_core::model::{ConstraintCategory, ConstraintEntry, ConstraintKind};
use examgrid_engine::commands::constraints::{ConstraintWorkspace, LedgerSource};
use examgrid_store::constraints::constraint_history;

use super::{parse_periods, App, CliResult};

#[derive(Debug, Args)]
pub struct ConstraintArgs {
    #[command(subcommand)]
    pub command: ConstraintCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConstraintCommand {
    /// List the ten categories
    Categories,
    /// Show a snapshot (defaults to the selected, then the latest)
    Show {
        #[arg(long)]
        snapshot: Option<i64>,
    },
    /// Add an entry and save the result as a new snapshot
    Add(AddArgs),
    /// Remove an entry and save the result as a new snapshot
    Remove {
        category: ConstraintCategory,
        course_code: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Snapshots, newest first
    History,
    /// Select a stored snapshot for generation
    Load { snapshot_id: i64 },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Category slug or wire key
    pub category: ConstraintCategory,
    pub course_code: String,
    /// Period indices or venue/course names, comma separated
    #[arg(default_value = "")]
    pub items: String,
    /// Name for the new snapshot (defaults to a timestamped name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Edits start from the selected snapshot, else the latest
fn base_source(app: &App) -> LedgerSource {
    match app.session.context().current().selected_constraint_snapshot_id {
        Some(id) => LedgerSource::Snapshot(id),
        None => LedgerSource::Latest,
    }
}

pub fn execute(app: &mut App, args: ConstraintArgs) -> CliResult {
    let topology_id = app.session.context().current().selected_topology_id;
    match args.command {
        ConstraintCommand::Categories => {
            for category in ConstraintCategory::ALL {
                println!(
                    "{:<24} {:<11} {:<7} {}",
                    category.slug(),
                    category.wire_key(),
                    category.kind().to_string(),
                    category.description()
                );
            }
        }
        ConstraintCommand::Show { snapshot } => {
            let source = snapshot
                .map(LedgerSource::Snapshot)
                .unwrap_or_else(|| base_source(app));
            let ws = ConstraintWorkspace::open(&app.conn, source, topology_id)?;
            print_workspace(&ws);
        }
        ConstraintCommand::Add(add) => {
            let mut ws = ConstraintWorkspace::open(&app.conn, base_source(app), topology_id)?;
            let entry = match add.category.kind() {
                ConstraintKind::Period => {
                    ConstraintEntry::periods(add.course_code, parse_periods(&add.items)?)
                }
                ConstraintKind::Venue => ConstraintEntry::venues(add.course_code, split(&add.items)),
            };
            ws.add_entry(add.category, entry)?;
            save(app, ws, add.name)?;
        }
        ConstraintCommand::Remove {
            category,
            course_code,
            name,
        } => {
            let mut ws = ConstraintWorkspace::open(&app.conn, base_source(app), topology_id)?;
            if ws.remove_entry(category, &course_code).is_none() {
                println!("{course_code} has no entry in {category}; nothing to save");
                return Ok(());
            }
            save(app, ws, name)?;
        }
        ConstraintCommand::History => {
            for record in constraint_history(&app.conn)? {
                let used = record.encoded.values().filter(|v| !v.is_empty()).count();
                println!(
                    "{:>4}  {:<32} {}  {} categories in use  by {}",
                    record.id,
                    record.name,
                    record.date.format("%Y-%m-%d %H:%M"),
                    used,
                    record.created_by
                );
            }
        }
        ConstraintCommand::Load { snapshot_id } => {
            let ws = ConstraintWorkspace::open(
                &app.conn,
                LedgerSource::Snapshot(snapshot_id),
                topology_id,
            )?;
            app.session
                .context_mut()
                .set_constraint_snapshot_id(Some(snapshot_id));
            println!("Selected constraint snapshot {snapshot_id}");
            print_workspace(&ws);
        }
    }
    Ok(())
}

/// A blank name gets a timestamped default from the engine
fn save(app: &mut App, mut ws: ConstraintWorkspace, name: Option<String>) -> CliResult {
    ws.set_name(name.unwrap_or_default());
    let rc = app.request();
    let record = ws.save(
        &mut app.conn,
        &app.policy,
        &rc,
        Some(app.session.context_mut()),
    )?;
    println!("Constraint snapshot saved:");
    println!("  snapshot_id: {}", record.id);
    println!("  name: {}", record.name);
    Ok(())
}

fn split(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_workspace(ws: &ConstraintWorkspace) {
    match ws.snapshot_id() {
        Some(id) => println!("Snapshot {id}: {}", ws.ledger().name()),
        None => println!("No constraint snapshot saved yet"),
    }
    for category in ConstraintCategory::ALL {
        let entries = ws.ledger().entries(category);
        if entries.is_empty() {
            continue;
        }
        println!("{} ({})", category.label(), category.slug());
        for entry in entries {
            println!("  {} {}", entry.course_code, entry.items.to_strings().join(","));
        }
    }
    for w in ws.warnings() {
        println!(
            "warning: dropped '{}' from {}: {}",
            w.warning.segment, w.category, w.warning.reason
        );
    }
}
