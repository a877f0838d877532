#![allow(dead_code)]

use bigdecimal::BigDecimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

use neobank::db;
use neobank::services::users::{RegisterUser, UserService};

/// Fresh file-backed database per test; the TempDir must stay alive for
/// the duration of the test.
pub async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("neobank.db").display());

    let pool = db::create_pool(&url).await.expect("failed to create pool");
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    (dir, pool)
}

pub async fn create_user(pool: &SqlitePool, seed: u32) -> Uuid {
    let user = UserService::new(pool.clone())
        .register(RegisterUser {
            full_name: format!("Test User {}", seed),
            cpf: format!("{:011}", seed),
            email: format!("user{}@example.com", seed),
            password_hash: "hash".to_string(),
            phone: None,
        })
        .await
        .expect("failed to register user");

    user.id
}

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).expect("invalid decimal literal")
}
