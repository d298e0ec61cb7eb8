//! # External collaborator contracts.
//!
//! This module defines the interface contracts the reconciliation engine drives its collaborators through.
//!
//! ## Record store
//! The [`PaymentRecordStore`] trait is the persistence boundary. It only executes the writes it is told to
//! perform; the reconciliation engine exclusively owns attempt lifecycle transitions, and the store never
//! initiates a transition itself.
//!
//! ## Processor clients
//! The [`CardProcessor`] (single-phase charge) and [`OrderProcessor`] (two-phase order/capture) traits wrap the
//! external payment processors. Implementations translate processor SDK/API failures into the uniform
//! [`ProcessorError`] shape and contain no decision logic of their own.
//!
//! Amount units are part of the contract: the single-phase charge takes the amount in integer minor units
//! (`round(major * 100)`), the two-phase order takes a major-unit decimal string. Both conversions are the
//! engine's responsibility, not the client's.
mod processors;
mod record_store;

pub use processors::{CardProcessor, CaptureOutcome, ChargeOutcome, OrderOutcome, OrderProcessor, ProcessorError};
pub use record_store::{PaymentRecordStore, PaymentStoreError};
