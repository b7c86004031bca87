#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use examgrid_core::context::{ContextStore, InstitutionalContext};
use examgrid_core::model::{NewSessionSettings, SessionSettings};
use examgrid_core::policy::AllowAllPolicy;
use examgrid_core_types::RequestContext;
use examgrid_engine::commands::topology::save_topology;
use examgrid_store::holidays::{add_holiday, Holiday};
use rusqlite::Connection;
use tempfile::TempDir;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn setup_test_env() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("engine.db");

    let mut conn = examgrid_store::db::open(&db_path).unwrap();
    examgrid_store::db::configure(&conn).unwrap();
    examgrid_store::migrations::apply_migrations(&mut conn).unwrap();

    (temp_dir, conn)
}

pub fn admin() -> RequestContext {
    RequestContext::for_actor("admin")
}

/// Mon 2025-01-06 .. Fri 2025-01-10, five days of two periods
pub fn one_week_session() -> NewSessionSettings {
    NewSessionSettings {
        description: Some("First semester exams".to_string()),
        session: Some("2024/2025".to_string()),
        semester: Some(1),
        days_per_week: 5,
        periods_per_day: 2,
        start_date: date(2025, 1, 6),
        end_date: date(2025, 1, 10),
    }
}

/// Monday 2025-01-06 closed, so indices 0 and 1 are locked
pub fn close_monday(conn: &Connection) {
    add_holiday(
        conn,
        &Holiday {
            date: date(2025, 1, 6),
            period_of_day: None,
            label: Some("Public holiday".to_string()),
        },
    )
    .unwrap();
}

/// Saved session plus a context that has adopted it
pub fn session_with_context(conn: &Connection) -> (SessionSettings, ContextStore) {
    let mut context = ContextStore::new(InstitutionalContext::default());
    let saved = save_topology(conn, &AllowAllPolicy, &admin(), &one_week_session(), &mut context)
        .unwrap();
    (saved, context)
}
