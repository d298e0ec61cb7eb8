use std::env;

use log::*;
use processor_tools::{PayPalConfig, StripeConfig};

const DEFAULT_TPF_HOST: &str = "127.0.0.1";
const DEFAULT_TPF_PORT: u16 = 8370;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub stripe: StripeConfig,
    pub paypal: PayPalConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TPF_HOST.to_string(),
            port: DEFAULT_TPF_PORT,
            database_url: String::default(),
            stripe: StripeConfig::default(),
            paypal: PayPalConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TPF_HOST").ok().unwrap_or_else(|| DEFAULT_TPF_HOST.into());
        let port = env::var("TPF_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TPF_PORT. {e} Using the default, {DEFAULT_TPF_PORT}, instead."
                    );
                    DEFAULT_TPF_PORT
                })
            })
            .unwrap_or(DEFAULT_TPF_PORT);
        let database_url = env::var("TPF_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ TPF_DATABASE_URL is not set. Using a temporary sqlite database.");
            "sqlite://data/payments.db".to_string()
        });
        let stripe = StripeConfig::new_from_env_or_default();
        let paypal = PayPalConfig::new_from_env_or_default();
        Self { host, port, database_url, stripe, paypal }
    }
}
