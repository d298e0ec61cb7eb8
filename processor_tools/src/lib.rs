//! HTTP clients for the two upstream payment processors.
//!
//! [`StripeApi`] drives the single-phase card charge flow against Stripe's payment-intents endpoint, and
//! [`PayPalApi`] drives the two-phase order/capture flow against PayPal's checkout-orders endpoints. Both
//! implement the processor traits from `travel_payment_engine`, so the reconciliation layer never sees
//! processor-specific wire types.

mod config;
mod error;
mod paypal;
mod stripe;

mod data_objects;

pub use config::{PayPalConfig, StripeConfig};
pub use data_objects::{CaptureResponse, OrderResponse, PaymentIntent};
pub use error::ProcessorApiError;
pub use paypal::PayPalApi;
pub use stripe::StripeApi;
