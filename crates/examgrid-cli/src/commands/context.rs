//! Institutional context commands

use clap::{Args, Subcommand};

use super::{App, CliResult};

#[derive(Debug, Args)]
pub struct ContextArgs {
    #[command(subcommand)]
    pub command: ContextCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContextCommand {
    /// Print the context as JSON
    Show,
    /// Print the generation checklist
    Readiness,
    /// Clear the three selections
    Reset,
}

pub fn execute(app: &mut App, args: ContextArgs) -> CliResult {
    match args.command {
        ContextCommand::Show => {
            let context = app.session.context().current();
            println!("{}", serde_json::to_string_pretty(context)?);
        }
        ContextCommand::Readiness => {
            let readiness = app.session.context().readiness();
            for (item, ok) in readiness.items() {
                println!("[{}] {item}", if ok { "x" } else { " " });
            }
            if readiness.is_ready() {
                println!("Ready for generation");
            } else {
                println!("Not ready: missing {}", readiness.missing().join(", "));
            }
        }
        ContextCommand::Reset => {
            app.session.context_mut().reset_context();
            println!("Context cleared");
        }
    }
    Ok(())
}
