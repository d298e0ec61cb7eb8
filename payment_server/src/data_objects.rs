use serde::{Deserialize, Serialize};
use tpf_common::{Amount, DEFAULT_CURRENCY};
use travel_payment_engine::{
    db_types::Subject,
    ChargeRequest,
};

use crate::errors::ServerError;

/// The request envelope shared by every payment route.
///
/// Clients send the amount in major units. The subject identifier fields are a union: a room booking id
/// always wins over ticket ids, matching how upstream booking flows call these routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<i64>,
    #[serde(default)]
    pub ticket_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub booking_transaction_id: Option<i64>,
    #[serde(default)]
    pub method_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PaymentRequest {
    /// Validate the envelope and build the engine-level request. All rejections here are 422-class; nothing
    /// invalid reaches the engine or a processor.
    pub fn into_charge_request(self) -> Result<ChargeRequest, ServerError> {
        let amount = match self.amount {
            Some(a) if a > 0.0 => a,
            Some(_) => return Err(ServerError::InvalidRequestBody("A positive amount is required.".to_string())),
            None => return Err(ServerError::InvalidRequestBody("An amount is required.".to_string())),
        };
        let amount = Amount::from_major(amount).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
        let subject = self.subject()?;
        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(ChargeRequest {
            subject,
            amount,
            currency,
            method_token: self.payment_method,
            method_id: self.method_id,
            description: self.description,
        })
    }

    fn subject(&self) -> Result<Subject, ServerError> {
        if let Some(booking_id) = self.booking_transaction_id {
            return Ok(Subject::Room(booking_id));
        }
        match (&self.ticket_ids, self.ticket_id) {
            (Some(ids), _) if !ids.is_empty() => Ok(Subject::Tickets(ids.clone())),
            (_, Some(id)) => Ok(Subject::Tickets(vec![id])),
            _ => Err(ServerError::InvalidRequestBody(
                "A ticket id or booking transaction id is required.".to_string(),
            )),
        }
    }
}

/// The response envelope shared by every payment route, for successes and for recorded failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: Option<i64>,
    pub payment_ids: Vec<i64>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub stripe_payment_intent: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_link: Option<String>,
}

impl PaymentResponse {
    pub fn succeeded(
        payment_ids: Vec<i64>,
        amount: Amount,
        currency: &str,
        reference: Option<String>,
    ) -> Self {
        Self {
            payment_id: payment_ids.first().copied(),
            payment_ids,
            amount: amount.to_major(),
            currency: currency.to_string(),
            status: "succeeded".to_string(),
            stripe_payment_intent: reference,
            error: None,
            approval_link: None,
        }
    }

    pub fn failed(payment_ids: Vec<i64>, amount: Amount, currency: &str, error: &str) -> Self {
        Self {
            payment_id: payment_ids.first().copied(),
            payment_ids,
            amount: amount.to_major(),
            currency: currency.to_string(),
            status: "failed".to_string(),
            stripe_payment_intent: None,
            error: Some(error.to_string()),
            approval_link: None,
        }
    }

    pub fn with_approval_link(mut self, link: Option<String>) -> Self {
        self.approval_link = link;
        self
    }
}

/// The diagnostic body returned when a two-phase processor call itself fails (HTTP 500).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorFaultResponse {
    pub status: String,
    pub error_kind: String,
    pub error: String,
    pub payment_id: Option<i64>,
}

impl ProcessorFaultResponse {
    pub fn new(error_kind: &str, error: &str, payment_id: Option<i64>) -> Self {
        Self {
            status: "failed".to_string(),
            error_kind: error_kind.to_string(),
            error: error.to_string(),
            payment_id,
        }
    }
}
