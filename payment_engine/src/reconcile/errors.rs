use thiserror::Error;

use crate::traits::PaymentStoreError;

/// Terminal failures of the single-phase charge flow. Every variant except `Store` has already recorded the
/// matching `Failed` attempts; the ids are carried so the router can report them.
#[derive(Debug, Error)]
pub enum ChargeFlowError {
    /// The processor demands a payment method before it will charge.
    #[error("Payment requires a valid payment method.")]
    MethodRequired { payment_ids: Vec<i64> },
    /// A decline attributable to the card or method.
    #[error("{message}")]
    Declined { message: String, payment_ids: Vec<i64> },
    /// Any other processor-reported rejection.
    #[error("{message}")]
    Rejected { message: String, payment_ids: Vec<i64> },
    /// Network/auth/unexpected processor-layer failure.
    #[error("{message}")]
    Transport { message: String, payment_ids: Vec<i64> },
    /// A storage failure in this flow is re-raised rather than absorbed.
    #[error(transparent)]
    Store(#[from] PaymentStoreError),
}

impl ChargeFlowError {
    pub fn payment_ids(&self) -> &[i64] {
        match self {
            ChargeFlowError::MethodRequired { payment_ids }
            | ChargeFlowError::Declined { payment_ids, .. }
            | ChargeFlowError::Rejected { payment_ids, .. }
            | ChargeFlowError::Transport { payment_ids, .. } => payment_ids,
            ChargeFlowError::Store(_) => &[],
        }
    }
}

/// Terminal failures of the two-phase order/capture flow. Recording is best-effort in this flow, so the
/// carried ids may be empty when both the primary update and the fallback create failed.
#[derive(Debug, Error)]
pub enum OrderFlowError {
    /// Order creation itself failed at the processor layer.
    #[error("Order creation failed: {message}")]
    CreateFailed { message: String, payment_ids: Vec<i64> },
    /// The order was created but the immediate capture failed at the processor layer.
    #[error("Order capture failed: {message}")]
    CaptureFailed { order_id: String, message: String, payment_ids: Vec<i64> },
    /// The capture resolved, but its status was not COMPLETED.
    #[error("Payment failed")]
    NotCompleted { order_id: String, status: String, payment_ids: Vec<i64> },
}

impl OrderFlowError {
    pub fn payment_ids(&self) -> &[i64] {
        match self {
            OrderFlowError::CreateFailed { payment_ids, .. }
            | OrderFlowError::CaptureFailed { payment_ids, .. }
            | OrderFlowError::NotCompleted { payment_ids, .. } => payment_ids,
        }
    }
}
