use thiserror::Error;

use crate::db_types::{NewPaymentAttempt, PaymentAttempt, PaymentStatus};

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStoreError::DatabaseError(e.to_string())
    }
}

/// The persistence contract for payment attempts.
///
/// Callers must not assume partial writes are visible after an error. `update_attempt_status` signals an
/// unknown id with `Ok(None)` rather than an error; storage-layer failures are always
/// [`PaymentStoreError::DatabaseError`].
#[allow(async_fn_in_trait)]
pub trait PaymentRecordStore {
    /// Persist a new attempt, assigning its id. Returns the full record.
    async fn create_attempt(&self, attempt: NewPaymentAttempt) -> Result<PaymentAttempt, PaymentStoreError>;

    /// Transition the attempt with the given id to `new_status`.
    ///
    /// `reference` and `error` are written when supplied and left untouched when `None`.
    /// Returns `Ok(None)` when the id does not resolve to a record that can still transition: terminal
    /// statuses never revert, so updates only apply to `Pending` rows.
    async fn update_attempt_status(
        &self,
        id: i64,
        new_status: PaymentStatus,
        reference: Option<String>,
        error: Option<String>,
    ) -> Result<Option<PaymentAttempt>, PaymentStoreError>;

    /// Overwrite the currency recorded for an attempt. Used when a processor reports settlement in a currency
    /// other than the one requested.
    async fn update_attempt_currency(&self, id: i64, currency: &str)
        -> Result<Option<PaymentAttempt>, PaymentStoreError>;

    /// Fetch a single attempt by id.
    async fn fetch_attempt(&self, id: i64) -> Result<Option<PaymentAttempt>, PaymentStoreError>;

    /// Fetch every attempt in insertion order (oldest first). Supports rebuilding the history projection.
    async fn fetch_all_attempts(&self) -> Result<Vec<PaymentAttempt>, PaymentStoreError>;
}
