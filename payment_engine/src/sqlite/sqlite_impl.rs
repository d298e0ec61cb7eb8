//! `SqliteDatabase` is a concrete implementation of a payment record store.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`PaymentRecordStore`] trait by delegating
//! to the low-level functions in the [`db`](super::db) module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{attempts, db_url, new_pool};
use crate::{
    db_types::{NewPaymentAttempt, PaymentAttempt, PaymentStatus},
    traits::{PaymentRecordStore, PaymentStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database pool using the `TPF_DATABASE_URL` environment variable, or the default URL.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await
    }
}

impl PaymentRecordStore for SqliteDatabase {
    async fn create_attempt(&self, attempt: NewPaymentAttempt) -> Result<PaymentAttempt, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        attempts::insert_attempt(attempt, &mut conn).await
    }

    async fn update_attempt_status(
        &self,
        id: i64,
        new_status: PaymentStatus,
        reference: Option<String>,
        error: Option<String>,
    ) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        attempts::update_status(id, new_status, reference.as_deref(), error.as_deref(), &mut conn).await
    }

    async fn update_attempt_currency(
        &self,
        id: i64,
        currency: &str,
    ) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        attempts::update_currency(id, currency, &mut conn).await
    }

    async fn fetch_attempt(&self, id: i64) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        attempts::fetch_attempt(id, &mut conn).await
    }

    async fn fetch_all_attempts(&self) -> Result<Vec<PaymentAttempt>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await.map_err(PaymentStoreError::from)?;
        attempts::fetch_all(&mut conn).await
    }
}
