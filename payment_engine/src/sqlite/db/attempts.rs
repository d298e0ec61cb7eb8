use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPaymentAttempt, PaymentAttempt, PaymentStatus},
    traits::PaymentStoreError,
};

/// Inserts a new attempt into the database using the given connection. This is not atomic on its own. You can
/// embed this call inside a transaction if you need atomicity across several writes, and pass `&mut *tx` as the
/// connection argument.
pub async fn insert_attempt(
    attempt: NewPaymentAttempt,
    conn: &mut SqliteConnection,
) -> Result<PaymentAttempt, PaymentStoreError> {
    let record: PaymentAttempt = sqlx::query_as(
        r#"
            INSERT INTO payment_attempts (
                subject_kind,
                ticket_id,
                booking_transaction_id,
                method_id,
                amount,
                currency,
                status,
                processor_reference,
                error_message,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(attempt.subject_kind)
    .bind(attempt.ticket_id)
    .bind(attempt.booking_transaction_id)
    .bind(attempt.method_id)
    .bind(attempt.amount)
    .bind(attempt.currency)
    .bind(attempt.status)
    .bind(attempt.processor_reference)
    .bind(attempt.error_message)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("📝️ Payment attempt for {} inserted with id {}", record.subject_kind, record.id);
    Ok(record)
}

/// Transitions the attempt to `new_status`, writing the reference and error message when supplied.
///
/// The `status = 'Pending'` guard enforces the lifecycle rule in SQL: terminal statuses never revert. `None` is
/// returned both when the id is unknown and when the row has already reached a terminal status.
pub async fn update_status(
    id: i64,
    new_status: PaymentStatus,
    reference: Option<&str>,
    error: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
    let record = sqlx::query_as(
        r#"
            UPDATE payment_attempts SET
                status = $2,
                processor_reference = COALESCE($3, processor_reference),
                error_message = COALESCE($4, error_message)
            WHERE id = $1 AND status = 'Pending'
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(new_status)
    .bind(reference)
    .bind(error)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

/// Overwrites the recorded currency for an attempt, returning the updated record.
pub async fn update_currency(
    id: i64,
    currency: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
    let record = sqlx::query_as("UPDATE payment_attempts SET currency = $2 WHERE id = $1 RETURNING *;")
        .bind(id)
        .bind(currency)
        .fetch_optional(conn)
        .await?;
    Ok(record)
}

pub async fn fetch_attempt(id: i64, conn: &mut SqliteConnection) -> Result<Option<PaymentAttempt>, PaymentStoreError> {
    let record =
        sqlx::query_as("SELECT * FROM payment_attempts WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(record)
}

/// Fetches every attempt in insertion order, oldest first.
pub async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<PaymentAttempt>, PaymentStoreError> {
    let records = sqlx::query_as("SELECT * FROM payment_attempts ORDER BY id ASC").fetch_all(conn).await?;
    Ok(records)
}
