//! Period mapping display

use clap::Args;
use examgrid_engine::commands::calendar::period_mapping;

use super::{App, CliResult};

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Topology id (defaults to the selected one)
    #[arg(long)]
    pub topology: Option<i64>,
    /// Print the mapping as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(app: &mut App, args: CalendarArgs) -> CliResult {
    let topology_id = app.topology_id(args.topology)?;
    let mapping = period_mapping(&app.conn, topology_id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&mapping)?);
        return Ok(());
    }
    println!("Total periods: {}", mapping.total_periods);
    for (week, slots) in mapping.by_week() {
        println!("Week {week}");
        for slot in slots {
            println!(
                "  #{:<4} {} {:?} P{}{}",
                slot.display_index,
                slot.date,
                slot.day_of_week,
                slot.period_of_day,
                if slot.is_system_locked { "  [locked]" } else { "" },
            );
        }
    }
    Ok(())
}
