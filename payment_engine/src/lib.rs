//! Travel Payment Engine
//!
//! The core library for the travel payment server. It accepts payment attempts against two business entities
//! (event tickets and room bookings), drives them through one of two external processor flows, persists the
//! outcome and exposes a read-only history projection. The library is provider-agnostic.
//!
//! The library is divided into three main sections:
//! 1. The record store ([`mod@traits`] and the SQLite backend in [`mod@sqlite`]). You should never need to access
//!    the database directly; the reconciliation API drives all lifecycle transitions. The exception is the data
//!    types used in the database, which are defined in the `db_types` module and are public.
//! 2. The reconciliation engine ([`mod@reconcile`]). Given a payment request and a processor outcome, it decides
//!    the final persisted status and the normalized result. This is the only component with decision logic;
//!    backends and processor clients just execute what they are told.
//! 3. The history projection ([`mod@history`]): a process-scoped, append-only log of completed and failed
//!    attempts. It is not authoritative and can be rebuilt from the record store at any time.
pub mod db_types;
pub mod history;
pub mod reconcile;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use history::PaymentHistory;
pub use reconcile::{
    ChargeFlowError,
    ChargeReceipt,
    ChargeRequest,
    CaptureReceipt,
    OrderFlowError,
    ReconcileApi,
};
pub use traits::{
    CardProcessor,
    ChargeOutcome,
    CaptureOutcome,
    OrderOutcome,
    OrderProcessor,
    PaymentRecordStore,
    PaymentStoreError,
    ProcessorError,
};
