//! Institutional holiday commands

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use examgrid_engine::{apply_engine_command, EngineCommand};
use examgrid_store::holidays::{list_holidays, Holiday};

use super::{App, CliResult};

#[derive(Debug, Args)]
pub struct HolidayArgs {
    #[command(subcommand)]
    pub command: HolidayCommand,
}

#[derive(Debug, Subcommand)]
pub enum HolidayCommand {
    /// Close a whole day, or one period of it
    Add {
        date: NaiveDate,
        /// One-based period of the day; omit to close the whole day
        #[arg(long)]
        period: Option<u32>,
        #[arg(long)]
        label: Option<String>,
    },
    List,
}

pub fn execute(app: &mut App, args: HolidayArgs) -> CliResult {
    match args.command {
        HolidayCommand::Add {
            date,
            period,
            label,
        } => {
            let rc = app.request();
            apply_engine_command(
                EngineCommand::AddHoliday(Holiday {
                    date,
                    period_of_day: period,
                    label,
                }),
                &mut app.conn,
                &app.policy,
                &rc,
                app.session.context_mut(),
                None,
            )?;
            println!("Holiday recorded for {date}");
        }
        HolidayCommand::List => {
            for holiday in list_holidays(&app.conn)? {
                let period = holiday
                    .period_of_day
                    .map(|p| format!("P{p}"))
                    .unwrap_or_else(|| "all day".to_string());
                println!(
                    "{}  {:<8} {}",
                    holiday.date,
                    period,
                    holiday.label.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
