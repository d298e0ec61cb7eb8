use thiserror::Error;

/// The uniform failure shape for both processor clients.
///
/// Implementations translate every SDK/API failure into one of these variants; nothing processor-specific
/// leaks past this boundary.
#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    /// The processor demands a usable payment method before it will proceed.
    #[error("Payment requires a valid payment method.")]
    MethodRequired,
    /// A decline attributable to the card or payment method itself.
    #[error("{0}")]
    Declined(String),
    /// Any other processor-reported rejection.
    #[error("{0}")]
    Rejected(String),
    /// Network, auth or other unexpected processor-layer failure.
    #[error("{0}")]
    Transport(String),
}

/// The result of a single-phase charge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeOutcome {
    /// The processor's reported intent status, e.g. "succeeded" or "requires_payment_method".
    pub status: String,
    /// The processor's transaction identifier.
    pub reference: String,
}

/// The result of creating a two-phase order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub order_id: String,
    /// The link a customer would follow to approve the order, when the processor supplies one.
    pub approval_link: Option<String>,
}

/// The result of capturing a two-phase order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// The processor's capture status. "COMPLETED" means funds moved.
    pub status: String,
    /// The currency the processor reports the capture settled in. May differ from the requested currency.
    pub settlement_currency: String,
}

/// A single-phase card-charge processor: funds move in one call using a stored method token.
#[allow(async_fn_in_trait)]
pub trait CardProcessor {
    /// Charge `amount_minor` (integer minor units) in `currency`, confirming immediately when a method token
    /// is supplied.
    async fn charge_now(
        &self,
        amount_minor: i64,
        currency: &str,
        method_token: Option<String>,
        description: Option<String>,
    ) -> Result<ChargeOutcome, ProcessorError>;
}

/// A two-phase order/capture processor: an order is created first (yielding an approval link), funds are
/// captured in a second call.
#[allow(async_fn_in_trait)]
pub trait OrderProcessor {
    /// Create an order for `amount` (a major-unit decimal string) in `currency`.
    async fn create_order(
        &self,
        amount: &str,
        currency: &str,
        description: Option<String>,
    ) -> Result<OrderOutcome, ProcessorError>;

    /// Attempt an immediate capture of a previously created order.
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, ProcessorError>;
}
