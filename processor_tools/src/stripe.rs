use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    StatusCode,
};
use travel_payment_engine::{CardProcessor, ChargeOutcome, ProcessorError};

use crate::{
    config::StripeConfig,
    data_objects::{PaymentIntent, StripeErrorEnvelope},
    error::ProcessorApiError,
};

/// Client for Stripe's payment-intents REST endpoint.
///
/// A charge is a single `POST /v1/payment_intents` call. When a payment method token is supplied the intent
/// is confirmed in the same call; without one Stripe parks the intent in `requires_payment_method`, which the
/// reconciliation layer treats as a method-required failure.
#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, ProcessorApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut val =
            HeaderValue::from_str(&bearer).map_err(|e| ProcessorApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProcessorApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        method_token: Option<&str>,
        description: Option<&str>,
    ) -> Result<PaymentIntent, ProcessorError> {
        let amount = amount_minor.to_string();
        let mut form: Vec<(&str, &str)> = vec![
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];
        if let Some(token) = method_token {
            form.push(("payment_method", token));
            form.push(("confirm", "true"));
        }
        if let Some(description) = description {
            form.push(("description", description));
        }
        trace!("💳️ Creating payment intent for {amount} {currency}");
        let response = self
            .client
            .post(self.url("/v1/payment_intents"))
            .form(&form)
            .send()
            .await
            .map_err(|e| ProcessorError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            let intent =
                response.json::<PaymentIntent>().await.map_err(|e| ProcessorError::Transport(e.to_string()))?;
            debug!("💳️ Payment intent [{}] created with status {}", intent.id, intent.status);
            Ok(intent)
        } else {
            Err(charge_error(status, response.text().await.unwrap_or_default()))
        }
    }
}

/// Translate a non-2xx Stripe response into the processor error taxonomy. Card errors are declines; any other
/// structured error is a rejection; an unparseable body is a transport fault.
fn charge_error(status: StatusCode, body: String) -> ProcessorError {
    match serde_json::from_str::<StripeErrorEnvelope>(&body) {
        Ok(envelope) => {
            let message = envelope.error.message_or_code();
            debug!("💳️ Charge refused ({}): {message}", envelope.error.error_type);
            if envelope.error.error_type == "card_error" {
                ProcessorError::Declined(message)
            } else {
                ProcessorError::Rejected(message)
            }
        },
        Err(_) => ProcessorError::Transport(format!("Stripe returned {status}: {body}")),
    }
}

impl CardProcessor for StripeApi {
    async fn charge_now(
        &self,
        amount_minor: i64,
        currency: &str,
        method_token: Option<String>,
        description: Option<String>,
    ) -> Result<ChargeOutcome, ProcessorError> {
        let intent = self
            .create_payment_intent(amount_minor, currency, method_token.as_deref(), description.as_deref())
            .await?;
        Ok(ChargeOutcome { status: intent.status, reference: intent.id })
    }
}
