use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde_json::{json, Value};
use tpf_common::DEFAULT_CURRENCY;
use travel_payment_engine::{CaptureOutcome, OrderOutcome, OrderProcessor, ProcessorError};

use crate::{
    config::PayPalConfig,
    data_objects::{CaptureResponse, OAuthTokenResponse, OrderResponse},
    error::ProcessorApiError,
};

/// Client for PayPal's checkout-orders REST endpoints.
///
/// Every call authenticates with a fresh client-credentials token. The two-phase flow is
/// `create_order` followed by `capture_order`; both surface any upstream failure as a transport-class
/// processor error, since PayPal does not distinguish declines in these responses the way a card
/// processor does.
#[derive(Clone)]
pub struct PayPalApi {
    config: PayPalConfig,
    client: Arc<Client>,
}

impl PayPalApi {
    pub fn new(config: PayPalConfig) -> Result<Self, ProcessorApiError> {
        let client = Client::builder().build().map_err(|e| ProcessorApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn access_token(&self) -> Result<String, ProcessorApiError> {
        let response = self
            .client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(self.config.secret.reveal()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProcessorApiError::Authentication(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProcessorApiError::QueryError { status, message });
        }
        let token =
            response.json::<OAuthTokenResponse>().await.map_err(|e| ProcessorApiError::JsonError(e.to_string()))?;
        trace!("🧾️ Obtained access token ({}, expires in {}s)", token.token_type, token.expires_in);
        Ok(token.access_token)
    }

    async fn post_order_call<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, ProcessorApiError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProcessorApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| ProcessorApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ProcessorApiError::ResponseError(e.to_string()))?;
            Err(ProcessorApiError::QueryError { status, message })
        }
    }

    pub async fn create_checkout_order(
        &self,
        amount: &str,
        currency: &str,
        description: Option<&str>,
    ) -> Result<OrderResponse, ProcessorApiError> {
        let mut unit = json!({
            "amount": {
                "currency_code": currency,
                "value": amount,
            },
        });
        if let Some(description) = description {
            unit["description"] = json!(description);
        }
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [unit],
        });
        debug!("🧾️ Creating order for {amount} {currency}");
        let order = self.post_order_call::<OrderResponse>("/v2/checkout/orders", body).await?;
        debug!("🧾️ Order [{}] created with status {}", order.id, order.status);
        Ok(order)
    }

    pub async fn capture_checkout_order(&self, order_id: &str) -> Result<CaptureResponse, ProcessorApiError> {
        let path = format!("/v2/checkout/orders/{order_id}/capture");
        debug!("🧾️ Capturing order [{order_id}]");
        let capture = self.post_order_call::<CaptureResponse>(&path, json!({})).await?;
        debug!("🧾️ Capture of order [{order_id}] resolved with status {}", capture.status);
        Ok(capture)
    }
}

impl OrderProcessor for PayPalApi {
    async fn create_order(
        &self,
        amount: &str,
        currency: &str,
        description: Option<String>,
    ) -> Result<OrderOutcome, ProcessorError> {
        let order = self
            .create_checkout_order(amount, currency, description.as_deref())
            .await
            .map_err(|e| ProcessorError::Transport(e.to_string()))?;
        Ok(OrderOutcome { approval_link: order.approval_link(), order_id: order.id })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, ProcessorError> {
        let capture =
            self.capture_checkout_order(order_id).await.map_err(|e| ProcessorError::Transport(e.to_string()))?;
        let settlement_currency =
            capture.settlement_currency().unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Ok(CaptureOutcome { status: capture.status, settlement_currency })
    }
}
