use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use tpf_common::{Amount, DEFAULT_CURRENCY};

/// The payment channel recorded when the caller does not specify one. Channel 2 is the processor-default
/// (order/capture) channel.
pub const DEFAULT_METHOD_ID: i64 = 2;

//--------------------------------------    SubjectKind      ---------------------------------------------------------
/// Which business entity a payment attempt is against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Ticket,
    Room,
}

impl Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKind::Ticket => write!(f, "Ticket"),
            SubjectKind::Room => write!(f, "Room"),
        }
    }
}

impl FromStr for SubjectKind {
    type Err = ConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Ticket" => Ok(Self::Ticket),
            "Room" => Ok(Self::Room),
            s => Err(ConversionError(format!("Invalid subject kind: {s}"))),
        }
    }
}

//--------------------------------------      Subject        ---------------------------------------------------------
/// The subject of a payment request, resolved once at the request-validation boundary.
///
/// A request either pays for one or more tickets, or for exactly one room booking. The two are mutually
/// exclusive; when a booking transaction id is present in a request, the attempt is a Room attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Tickets(Vec<i64>),
    Room(i64),
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Tickets(_) => SubjectKind::Ticket,
            Subject::Room(_) => SubjectKind::Room,
        }
    }

    /// The number of payment attempts this subject produces. Ticket subjects produce one attempt per ticket id.
    pub fn attempt_count(&self) -> usize {
        match self {
            Subject::Tickets(ids) => ids.len().max(1),
            Subject::Room(_) => 1,
        }
    }
}

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The attempt has been recorded and the processor call has not yet resolved.
    Pending,
    /// The processor confirmed that funds moved. Terminal.
    Completed,
    /// The processor declined or errored, or the flow faulted. Terminal.
    Failed,
}

impl PaymentStatus {
    /// The label this status carries in response bodies and history entries.
    pub fn response_label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

//-------------------------------------- NewPaymentAttempt   ---------------------------------------------------------
/// A payment attempt draft, ready to be persisted. The record store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentAttempt {
    pub subject_kind: SubjectKind,
    pub ticket_id: Option<i64>,
    pub booking_transaction_id: Option<i64>,
    pub method_id: i64,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub processor_reference: Option<String>,
    pub error_message: Option<String>,
}

impl NewPaymentAttempt {
    /// A pending draft for a single ticket. `amount` is this attempt's share of the request amount.
    pub fn for_ticket(ticket_id: i64, amount: Amount, currency: &str, method_id: Option<i64>) -> Self {
        Self {
            subject_kind: SubjectKind::Ticket,
            ticket_id: Some(ticket_id),
            booking_transaction_id: None,
            method_id: method_id.unwrap_or(DEFAULT_METHOD_ID),
            amount,
            currency: currency.to_string(),
            status: PaymentStatus::Pending,
            processor_reference: None,
            error_message: None,
        }
    }

    /// A pending draft for a room booking.
    pub fn for_room(booking_transaction_id: i64, amount: Amount, currency: &str, method_id: Option<i64>) -> Self {
        Self {
            subject_kind: SubjectKind::Room,
            ticket_id: None,
            booking_transaction_id: Some(booking_transaction_id),
            method_id: method_id.unwrap_or(DEFAULT_METHOD_ID),
            amount,
            currency: currency.to_string(),
            status: PaymentStatus::Pending,
            processor_reference: None,
            error_message: None,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error_message = Some(error.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.processor_reference = Some(reference.into());
        self
    }
}

impl Default for NewPaymentAttempt {
    fn default() -> Self {
        Self {
            subject_kind: SubjectKind::Ticket,
            ticket_id: Some(0),
            booking_transaction_id: None,
            method_id: DEFAULT_METHOD_ID,
            amount: Amount::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Pending,
            processor_reference: None,
            error_message: None,
        }
    }
}

//--------------------------------------  PaymentAttempt     ---------------------------------------------------------
/// One persisted attempt to move money for exactly one subject.
///
/// Lifecycle: created as `Pending` (pre-create flows) or directly terminal (post-resolution fallback writes);
/// transitions only `Pending -> Completed` or `Pending -> Failed`. Terminal states never revert.
/// `processor_reference` is set on the transition to `Completed`, and sometimes on `Failed` for diagnostics.
/// `error_message` is only ever set on `Failed`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentAttempt {
    pub id: i64,
    pub subject_kind: SubjectKind,
    pub ticket_id: Option<i64>,
    pub booking_transaction_id: Option<i64>,
    pub method_id: i64,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub processor_reference: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   HistoryEntry      ---------------------------------------------------------
/// A denormalized projection of a payment attempt for read-only listing. Not authoritative; the history log can
/// be rebuilt from the record store at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub payment_id: i64,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub stripe_payment_intent: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_transaction_id: Option<i64>,
}

impl From<&PaymentAttempt> for HistoryEntry {
    fn from(attempt: &PaymentAttempt) -> Self {
        Self {
            payment_id: attempt.id,
            amount: attempt.amount.to_major(),
            currency: attempt.currency.clone(),
            status: attempt.status.response_label().to_string(),
            stripe_payment_intent: attempt.processor_reference.clone(),
            error: attempt.error_message.clone(),
            ticket_id: attempt.ticket_id,
            booking_transaction_id: attempt.booking_transaction_id,
        }
    }
}
