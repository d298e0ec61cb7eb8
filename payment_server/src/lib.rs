//! # Travel payment server
//!
//! A thin HTTP facade over the travel payment engine. It is responsible for:
//! * Accepting payment requests for event tickets and room bookings.
//! * Validating the request envelope before anything reaches the engine.
//! * Forwarding the request to the card-charge flow (Stripe) or the order/capture flow (PayPal).
//! * Reporting the normalized outcome, and the in-process payment history.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: liveness check.
//! * `/payment/pay/{ticket,room}`: single-phase card charges.
//! * `/payment/paypal/{ticket,room}`: two-phase order/capture payments.
//! * `/payment/history`: the attempts resolved during this process lifetime.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
