use std::time::Duration;

use actix_web::{
    dev::Server,
    error::InternalError,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpResponse,
    HttpServer,
};
use log::*;
use processor_tools::{PayPalApi, StripeApi};
use travel_payment_engine::{PaymentHistory, ReconcileApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, PayTicketRoute, PayRoomRoute, PaymentHistoryRoute, PaypalRoomRoute, PaypalTicketRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let history = PaymentHistory::new();
    match history.rebuild_from_store(&db).await {
        Ok(n) => info!("📜️ Restored {n} resolved attempt(s) into the payment history"),
        Err(e) => warn!("📜️ Could not restore the payment history from the record store: {e}"),
    }
    let srv = create_server_instance(config, db, history)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    history: PaymentHistory,
) -> Result<Server, ServerError> {
    let stripe =
        StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let paypal =
        PayPalApi::new(config.paypal.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = HttpServer::new(move || {
        let reconcile_api = ReconcileApi::new(db.clone(), history.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tpf::access_log"))
            .app_data(web::Data::new(reconcile_api))
            .app_data(web::Data::new(stripe.clone()))
            .app_data(web::Data::new(paypal.clone()))
            .app_data(json_config())
            .service(health)
            .service(PayTicketRoute::<SqliteDatabase, StripeApi>::new())
            .service(PayRoomRoute::<SqliteDatabase, StripeApi>::new())
            .service(PaypalTicketRoute::<SqliteDatabase, PayPalApi>::new())
            .service(PaypalRoomRoute::<SqliteDatabase, PayPalApi>::new())
            .service(PaymentHistoryRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed or undeserializable request bodies are a 422, reported in the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let server_error = ServerError::InvalidRequestBody(err.to_string());
        let response = HttpResponse::UnprocessableEntity()
            .json(serde_json::json!({ "error": server_error.to_string() }));
        InternalError::from_response(err, response).into()
    })
}
