use tpf_common::Amount;

use crate::db_types::{PaymentAttempt, Subject};

/// A validated payment request, ready for reconciliation. Built at the router boundary; the subject has
/// already been resolved into its tagged form there.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub subject: Subject,
    /// The full requested amount. Batch ticket requests split this evenly across the attempts.
    pub amount: Amount,
    pub currency: String,
    /// The stored card/method token for single-phase charges.
    pub method_token: Option<String>,
    /// The payment channel. Defaults to the processor-default channel when absent.
    pub method_id: Option<i64>,
    pub description: Option<String>,
}

/// The result of a successful single-phase charge. All attempts are `Completed` and share one processor
/// reference.
#[derive(Debug, Clone)]
pub struct ChargeReceipt {
    pub attempts: Vec<PaymentAttempt>,
    pub reference: String,
}

impl ChargeReceipt {
    /// The id of the first recorded attempt.
    pub fn payment_id(&self) -> Option<i64> {
        self.attempts.first().map(|a| a.id)
    }

    pub fn payment_ids(&self) -> Vec<i64> {
        self.attempts.iter().map(|a| a.id).collect()
    }
}

/// The result of a successful two-phase order/capture.
///
/// `recorded` is false when recording the outcome failed twice (primary update and fallback create); the
/// processor result is still returned, with no attempt ids to report.
#[derive(Debug, Clone)]
pub struct CaptureReceipt {
    pub attempts: Vec<PaymentAttempt>,
    pub order_id: String,
    pub approval_link: Option<String>,
    /// The currency the processor settled in. May differ from the requested currency.
    pub settlement_currency: String,
    pub recorded: bool,
}

impl CaptureReceipt {
    pub fn payment_id(&self) -> Option<i64> {
        self.attempts.first().map(|a| a.id)
    }

    pub fn payment_ids(&self) -> Vec<i64> {
        self.attempts.iter().map(|a| a.id).collect()
    }
}
