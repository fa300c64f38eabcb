//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use bank_transfers::api::{self, AppState};
use bank_transfers::notification::{notification_channel, NotificationConfig, TracingNotifier};
use bank_transfers::{InMemoryLedgerStore, TransferService};

/// In-memory ledger wired into the full router
pub struct TestApp {
    pub store: Arc<InMemoryLedgerStore>,
    pub router: Router,
}

pub fn in_memory_app() -> TestApp {
    let store = Arc::new(InMemoryLedgerStore::new());
    let (dispatcher, worker) = notification_channel(Arc::new(TracingNotifier), NotificationConfig::default());
    worker.start();

    let service = TransferService::new(store.clone(), dispatcher);
    let router = api::build_router(AppState::new(Arc::new(service)));

    TestApp { store, router }
}

/// Setup test database - truncate tables for a fresh state
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query("TRUNCATE TABLE transfers, accounts, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}

/// Seed a user with one account; returns (user_id, account_id)
pub async fn seed_account(pool: &PgPool, email: &str, balance: Decimal) -> (Uuid, Uuid) {
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();

    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(user_id)
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to seed user");

    sqlx::query("INSERT INTO accounts (id, user_id, balance) VALUES ($1, $2, $3)")
        .bind(account_id)
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to seed account");

    (user_id, account_id)
}

/// Add another account to an existing user
pub async fn seed_extra_account(pool: &PgPool, user_id: Uuid, balance: Decimal) -> Uuid {
    let account_id = Uuid::new_v4();

    sqlx::query("INSERT INTO accounts (id, user_id, balance) VALUES ($1, $2, $3)")
        .bind(account_id)
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to seed account");

    account_id
}
