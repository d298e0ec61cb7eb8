use log::*;
use tpf_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub secret_key: Secret,
    pub base_url: String,
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let secret_key = Secret::new(std::env::var("TPF_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("TPF_STRIPE_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let base_url =
            std::env::var("TPF_STRIPE_BASE_URL").unwrap_or_else(|_| "https://api.stripe.com".to_string());
        Self { secret_key, base_url }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayPalConfig {
    pub client_id: String,
    pub secret: Secret,
    pub base_url: String,
}

impl PayPalConfig {
    pub fn new_from_env_or_default() -> Self {
        let client_id = std::env::var("TPF_PAYPAL_CLIENT_ID").unwrap_or_else(|_| {
            warn!("TPF_PAYPAL_CLIENT_ID not set, using (probably useless) default");
            "paypal-client-id".to_string()
        });
        let secret = Secret::new(std::env::var("TPF_PAYPAL_SECRET").unwrap_or_else(|_| {
            warn!("TPF_PAYPAL_SECRET not set, using (probably useless) default");
            "paypal-secret".to_string()
        }));
        let live = live_environment(std::env::var("TPF_PAYPAL_LIVE").ok());
        let default_base = if live { "https://api-m.paypal.com" } else { "https://api-m.sandbox.paypal.com" };
        let base_url = std::env::var("TPF_PAYPAL_BASE_URL").unwrap_or_else(|_| default_base.to_string());
        Self { client_id, secret, base_url }
    }
}

/// Interprets the TPF_PAYPAL_LIVE flag. Anything but an explicit affirmative stays in the sandbox.
fn live_environment(flag: Option<String>) -> bool {
    match flag {
        Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => false,
    }
}
