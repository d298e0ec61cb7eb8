use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::Value;
use travel_payment_engine::{
    traits::{ChargeOutcome, ProcessorError},
    PaymentHistory,
    ReconcileApi,
};

use super::{
    helpers::{get_request, post_request},
    mocks::{echo_store, MockCard, MockRecordStore},
};
use crate::routes::{health, PayRoomRoute, PayTicketRoute};

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", |cfg| {
        cfg.service(health);
    })
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);
}

#[actix_web::test]
async fn charge_ticket_succeeds() {
    let _ = env_logger::try_init().ok();
    let req = r#"{"amount": 500, "ticketId": 5, "paymentMethod": "pm_card_visa"}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["stripe_payment_intent"], "pi_ok");
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["payment_id"], 1);
    assert_eq!(body["payment_ids"], serde_json::json!([1]));
    assert_eq!(body["amount"], 500.0);
    assert_eq!(body["currency"], "USD");
}

#[actix_web::test]
async fn batch_charge_reports_every_attempt() {
    let req = r#"{"amount": 10, "ticketIds": [11, 12, 13], "paymentMethod": "pm_card_visa"}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["payment_id"], 1);
    assert_eq!(body["payment_ids"], serde_json::json!([1, 2, 3]));
}

#[actix_web::test]
async fn charge_without_payment_method_is_a_402() {
    let req = r#"{"amount": 500, "ticketId": 5}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_no_method).await.unwrap();
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Payment requires a valid payment method.");
    assert_eq!(body["stripe_payment_intent"], Value::Null);
}

#[actix_web::test]
async fn declined_card_is_a_402() {
    let req = r#"{"amount": 120, "bookingTransactionId": 77, "paymentMethod": "pm_card_chargeDeclined"}"#;
    let (status, body) = post_request("/payment/pay/room", req, configure_declined).await.unwrap();
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Your card was declined.");
}

#[actix_web::test]
async fn transport_fault_is_a_400() {
    let req = r#"{"amount": 120, "ticketId": 1, "paymentMethod": "pm"}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_transport_fault).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "connection reset");
}

#[actix_web::test]
async fn missing_amount_is_rejected() {
    let req = r#"{"ticketId": 5}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Could not read request body: An amount is required.");
}

#[actix_web::test]
async fn non_positive_amount_is_rejected() {
    let req = r#"{"amount": 0, "ticketId": 5}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Could not read request body: A positive amount is required.");
}

#[actix_web::test]
async fn missing_subject_is_rejected() {
    let req = r#"{"amount": 50}"#;
    let (status, body) = post_request("/payment/pay/room", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"], "Could not read request body: A ticket id or booking transaction id is required.");
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let (status, _) = post_request("/payment/pay/ticket", "amount: nope", configure_success).await.unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn storage_fault_is_an_opaque_500() {
    let req = r#"{"amount": 50, "ticketId": 1, "paymentMethod": "pm"}"#;
    let (status, body) = post_request("/payment/pay/ticket", req, configure_store_failure).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("An error occurred on the backend of the server."));
}

fn charge_routes(cfg: &mut ServiceConfig, store: MockRecordStore, card: MockCard) {
    let api = ReconcileApi::new(store, PaymentHistory::new());
    cfg.service(PayTicketRoute::<MockRecordStore, MockCard>::new())
        .service(PayRoomRoute::<MockRecordStore, MockCard>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(card));
}

fn configure_success(cfg: &mut ServiceConfig) {
    let mut card = MockCard::new();
    card.expect_charge_now()
        .returning(|_, _, _, _| Ok(ChargeOutcome { status: "succeeded".into(), reference: "pi_ok".into() }));
    charge_routes(cfg, echo_store(), card);
}

fn configure_no_method(cfg: &mut ServiceConfig) {
    let mut card = MockCard::new();
    card.expect_charge_now()
        .returning(|_, _, _, _| Ok(ChargeOutcome { status: "requires_payment_method".into(), reference: "pi_fail".into() }));
    charge_routes(cfg, echo_store(), card);
}

fn configure_declined(cfg: &mut ServiceConfig) {
    let mut card = MockCard::new();
    card.expect_charge_now()
        .returning(|_, _, _, _| Err(ProcessorError::Declined("Your card was declined.".into())));
    charge_routes(cfg, echo_store(), card);
}

fn configure_transport_fault(cfg: &mut ServiceConfig) {
    let mut card = MockCard::new();
    card.expect_charge_now().returning(|_, _, _, _| Err(ProcessorError::Transport("connection reset".into())));
    charge_routes(cfg, echo_store(), card);
}

fn configure_store_failure(cfg: &mut ServiceConfig) {
    use travel_payment_engine::traits::PaymentStoreError;
    let mut store = MockRecordStore::new();
    store
        .expect_create_attempt()
        .returning(|_| Err(PaymentStoreError::DatabaseError("db down".into())));
    let card = MockCard::new();
    charge_routes(cfg, store, card);
}
