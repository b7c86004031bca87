//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_session_settings",
            sql: include_str!("../../migrations/001_session_settings.sql"),
        },
        Migration {
            id: "002_exclusion_snapshots",
            sql: include_str!("../../migrations/002_exclusion_snapshots.sql"),
        },
        Migration {
            id: "003_constraint_snapshots",
            sql: include_str!("../../migrations/003_constraint_snapshots.sql"),
        },
        Migration {
            id: "004_generation_requests",
            sql: include_str!("../../migrations/004_generation_requests.sql"),
        },
        Migration {
            id: "005_client_state",
            sql: include_str!("../../migrations/005_client_state.sql"),
        },
    ]
}
