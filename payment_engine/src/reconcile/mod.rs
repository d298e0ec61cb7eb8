//! # The payment outcome reconciliation engine.
//!
//! Given a payment request and a processor outcome, this module decides the final persisted status of every
//! attempt and the normalized result the router serializes. It is the exclusive owner of attempt lifecycle
//! transitions; the record store and the processor clients only execute what they are told.
//!
//! Two processing shapes exist:
//! * **Single-phase** ([`ReconcileApi::charge_now`]): funds move in one processor call using a stored method
//!   token. Attempts are pre-created as `Pending` and moved to a terminal status once the call resolves.
//! * **Two-phase** ([`ReconcileApi::order_and_capture`]): an order is created first, then an immediate capture
//!   is attempted. Persistence failures in this shape degrade gracefully instead of propagating.
mod api;
mod errors;
mod objects;


pub use api::ReconcileApi;
pub use errors::{ChargeFlowError, OrderFlowError};
pub use objects::{CaptureReceipt, ChargeReceipt, ChargeRequest};
