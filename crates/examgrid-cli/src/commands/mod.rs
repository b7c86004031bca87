//! Subcommand implementations
//!
//! Every subcommand opens an [`App`], does its work, and saves the client
//! session on the way out so context changes persist between runs.

pub mod calendar;
pub mod constraint;
pub mod context;
pub mod exclusion;
pub mod generate;
pub mod holiday;
pub mod session;

use std::error::Error;
use std::time::Duration;

use examgrid_core::errors::{ExError, ExErrorKind};
use examgrid_core::policy::AdminOnlyPolicy;
use examgrid_core_types::RequestContext;
use examgrid_engine::commands::client::ClientSession;
use examgrid_engine::commands::topology::hydrate_context;
use examgrid_store::client_state::ClientStateMigration;
use examgrid_store::{db, migrations};
use rusqlite::Connection;

use crate::config::CliConfig;

pub type CliResult = Result<(), Box<dyn Error>>;

pub struct App {
    pub conn: Connection,
    pub config: CliConfig,
    pub policy: AdminOnlyPolicy,
    pub session: ClientSession,
}

impl App {
    pub fn open(config: CliConfig) -> Result<Self, Box<dyn Error>> {
        let mut conn = db::open(&config.db_path)?;
        db::configure(&conn)?;
        db::probe(&conn, Duration::from_millis(config.probe_timeout_ms))?;
        migrations::apply_migrations(&mut conn)?;

        let (mut session, migration) = ClientSession::open(&mut conn)?;
        if let ClientStateMigration::Migrated { legacy_keys } = &migration {
            tracing::info!(count = legacy_keys.len(), "consolidated legacy client state");
        }
        hydrate_context(&conn, session.context_mut())?;

        let policy = AdminOnlyPolicy::new(config.admins.iter().cloned());
        Ok(Self {
            conn,
            config,
            policy,
            session,
        })
    }

    /// Logged-in user, else the configured actor
    pub fn actor(&self) -> String {
        self.session
            .username()
            .map(str::to_string)
            .unwrap_or_else(|| self.config.actor.clone())
    }

    pub fn request(&self) -> RequestContext {
        RequestContext::for_actor(self.actor())
    }

    /// Explicit topology, else the selected one
    pub fn topology_id(&self, explicit: Option<i64>) -> Result<i64, ExError> {
        explicit
            .or(self.session.context().current().selected_topology_id)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_message("no topology selected; pass --topology or run `session select`")
            })
    }

    pub fn finish(self) -> CliResult {
        self.session.save(&self.conn)?;
        Ok(())
    }
}

/// Comma-separated period list, e.g. `3,4,7`
pub fn parse_periods(raw: &str) -> Result<Vec<u32>, ExError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_message(format!("'{s}' is not a period index"))
            })
        })
        .collect()
}
