//! Client session: persisted context and auth

#![allow(clippy::result_large_err)]

use examgrid_core::context::ContextStore;
use examgrid_core_types::Sensitive;
use examgrid_store::client_state::{
    load_client_state, migrate_client_state, save_client_state, AuthSession, ClientState,
    ClientStateMigration,
};
use examgrid_store::errors::Result;
use rusqlite::Connection;

#[derive(Debug)]
pub struct ClientSession {
    auth: Option<AuthSession>,
    context: ContextStore,
}

impl ClientSession {
    /// Run the one-time migration, then rehydrate
    pub fn open(conn: &mut Connection) -> Result<(Self, ClientStateMigration)> {
        let migration = migrate_client_state(conn)?;
        let state = load_client_state(conn)?;
        Ok((
            Self {
                auth: state.auth,
                context: ContextStore::new(state.context),
            },
            migration,
        ))
    }

    pub fn context(&self) -> &ContextStore {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ContextStore {
        &mut self.context
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    /// Acting username, if someone is logged in
    pub fn username(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.username.as_str())
    }

    pub fn login(&mut self, username: impl Into<String>, token: Option<String>) {
        self.auth = Some(AuthSession {
            username: username.into(),
            token: token.map(Sensitive::new),
        });
    }

    /// Drop the auth session and clear every context pointer
    pub fn logout(&mut self) {
        self.auth = None;
        self.context.reset_context();
    }

    pub fn to_state(&self) -> ClientState {
        ClientState {
            auth: self.auth.clone(),
            context: self.context.current().clone(),
            ..ClientState::default()
        }
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        save_client_state(conn, &self.to_state())
    }
}
