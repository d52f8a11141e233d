#![allow(dead_code)]

use chrono::NaiveDateTime;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use fixdesk_crm::db::{DbPool, establish_connection_pool};
use fixdesk_crm::domain::ticket::NewTicket;
use fixdesk_crm::models::auth::AuthenticatedUser;
use fixdesk_crm::{SERVICE_EMPLOYEE_ROLE, SERVICE_OWNER_ROLE};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A SQLite database in a temporary directory, migrated and pooled.
/// The files are removed when the value is dropped.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let database_url = dir.path().join(name).to_string_lossy().to_string();

        let pool = establish_connection_pool(&database_url).expect("failed to build pool");
        let mut conn = pool.get().expect("failed to get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("failed to run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time")
}

fn user_with_roles(tenant_id: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user-1".to_string(),
        email: "ana@service.ro".to_string(),
        name: "Ana".to_string(),
        tenant_id: tenant_id.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    }
}

pub fn employee(tenant_id: &str) -> AuthenticatedUser {
    user_with_roles(tenant_id, &[SERVICE_EMPLOYEE_ROLE])
}

pub fn owner(tenant_id: &str) -> AuthenticatedUser {
    user_with_roles(tenant_id, &[SERVICE_OWNER_ROLE])
}

pub fn outsider(tenant_id: &str) -> AuthenticatedUser {
    user_with_roles(tenant_id, &[])
}

pub fn new_ticket(
    ticket_id: &str,
    tenant_id: &str,
    client_name: Option<&str>,
    client_phone: Option<&str>,
    created_at: NaiveDateTime,
) -> NewTicket {
    NewTicket::new(
        ticket_id.to_string(),
        tenant_id.to_string(),
        client_name.map(str::to_string),
        client_phone.map(str::to_string),
        "iPhone 12".to_string(),
        "Display spart".to_string(),
        250.0,
        created_at,
    )
}
