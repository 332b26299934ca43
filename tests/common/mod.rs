#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use urlshort::application::services::UrlService;
use urlshort::domain::errors::GeneratorError;
use urlshort::domain::repositories::IdGenerator;
use urlshort::domain::RequestContext;
use urlshort::infrastructure::persistence::SqliteUrlStore;
use urlshort::state::AppState;
use std::time::Duration;

pub const TEST_DOMAIN: &str = "localhost:8080/";

/// Hands out `id1`, `id2`, ... in order.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    next: AtomicUsize,
}

#[async_trait]
impl IdGenerator for SequenceGenerator {
    async fn generate(&self, ctx: &RequestContext) -> Result<String, GeneratorError> {
        ctx.check()?;
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("id{n}"))
    }
}

/// Always returns the same id, to provoke collisions.
#[derive(Debug)]
pub struct FixedGenerator(pub &'static str);

#[async_trait]
impl IdGenerator for FixedGenerator {
    async fn generate(&self, _ctx: &RequestContext) -> Result<String, GeneratorError> {
        Ok(self.0.to_string())
    }
}

pub async fn create_test_url(pool: &SqlitePool, short: &str, long: &str) {
    sqlx::query("INSERT INTO url (short, long) VALUES (?, ?)")
        .bind(short)
        .bind(long)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn get_count(pool: &SqlitePool, short: &str) -> i64 {
    sqlx::query_scalar("SELECT count FROM url WHERE short = ?")
        .bind(short)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_service(
    pool: SqlitePool,
) -> UrlService<SqliteUrlStore, SequenceGenerator> {
    UrlService::new(
        TEST_DOMAIN,
        Arc::new(SequenceGenerator::default()),
        Arc::new(SqliteUrlStore::new(Arc::new(pool))),
    )
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(
        Arc::new(create_test_service(pool)),
        Duration::from_secs(5),
    )
}
