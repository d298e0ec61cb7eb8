use serde::Deserialize;

//--------------------------------------     Stripe wire types    ---------------------------------------------

/// The subset of a Stripe payment-intent object that the charge flow consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StripeErrorBody {
    pub fn message_or_code(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| self.error_type.clone())
    }
}

//--------------------------------------     PayPal wire types    ---------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDescription {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<LinkDescription>,
}

impl OrderResponse {
    /// The redirect link the payer must visit to approve the order, when PayPal provided one.
    pub fn approval_link(&self) -> Option<String> {
        self.links.iter().find(|link| link.rel == "approve").map(|link| link.href.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

impl CaptureResponse {
    /// The currency PayPal actually captured in, read from the first capture of the first purchase unit.
    pub fn settlement_currency(&self) -> Option<String> {
        self.purchase_units
            .first()?
            .payments
            .as_ref()?
            .captures
            .first()?
            .amount
            .as_ref()
            .map(|amount| amount.currency_code.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseUnit {
    #[serde(default)]
    pub payments: Option<PurchaseUnitPayments>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseUnitPayments {
    #[serde(default)]
    pub captures: Vec<Capture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Capture {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<CaptureAmount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureAmount {
    pub currency_code: String,
    pub value: String,
}
