//! Generation request

use examgrid_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

use super::{App, CliResult};

pub fn execute(app: &mut App) -> CliResult {
    let rc = app.request();
    let result = apply_engine_command(
        EngineCommand::RequestGeneration,
        &mut app.conn,
        &app.policy,
        &rc,
        app.session.context_mut(),
        None,
    )?;
    if let EngineCommandResult::GenerationQueued(ack) = result {
        println!("Generation requested:");
        println!("  request_id: {}", ack.request_id);
        println!("  status: {}", ack.status.as_str());
    }
    Ok(())
}
