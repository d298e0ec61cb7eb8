use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::Value;
use travel_payment_engine::{
    traits::{CaptureOutcome, OrderOutcome, ProcessorError},
    PaymentHistory,
    ReconcileApi,
};

use super::{
    helpers::post_request,
    mocks::{echo_store, MockOrderProc, MockRecordStore},
};
use crate::routes::{PaypalRoomRoute, PaypalTicketRoute};

#[actix_web::test]
async fn order_and_capture_succeeds_with_settlement_currency() {
    let _ = env_logger::try_init().ok();
    let req = r#"{"amount": 50, "bookingTransactionId": 77}"#;
    let (status, body) = post_request("/payment/paypal/room", req, configure_success).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["payment_id"], 1);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["stripe_payment_intent"], "ORDER123");
    assert_eq!(body["approval_link"], "https://www.paypal.com/checkoutnow?token=ORDER123");
    assert_eq!(body["error"], Value::Null);
}

#[actix_web::test]
async fn failed_order_creation_is_a_diagnostic_500() {
    let req = r#"{"amount": 50, "ticketId": 3}"#;
    let (status, body) = post_request("/payment/paypal/ticket", req, configure_create_fails).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error_kind"], "create_order");
    assert_eq!(body["error"], "connection refused");
    assert_eq!(body["payment_id"], 1);
}

#[actix_web::test]
async fn failed_capture_is_a_diagnostic_500() {
    let req = r#"{"amount": 50, "ticketId": 3}"#;
    let (status, body) = post_request("/payment/paypal/ticket", req, configure_capture_fails).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error_kind"], "capture_order");
    assert_eq!(body["error"], "capture timed out");
}

#[actix_web::test]
async fn incomplete_capture_is_a_400_payment_failure() {
    let req = r#"{"amount": 75, "bookingTransactionId": 4}"#;
    let (status, body) = post_request("/payment/paypal/room", req, configure_not_completed).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "Payment failed");
    assert_eq!(body["payment_id"], 1);
}

fn paypal_routes(cfg: &mut ServiceConfig, store: MockRecordStore, orders: MockOrderProc) {
    let api = ReconcileApi::new(store, PaymentHistory::new());
    cfg.service(PaypalTicketRoute::<MockRecordStore, MockOrderProc>::new())
        .service(PaypalRoomRoute::<MockRecordStore, MockOrderProc>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(orders));
}

fn configure_success(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderProc::new();
    orders.expect_create_order().returning(|_, _, _| {
        Ok(OrderOutcome {
            order_id: "ORDER123".into(),
            approval_link: Some("https://www.paypal.com/checkoutnow?token=ORDER123".into()),
        })
    });
    orders
        .expect_capture_order()
        .returning(|_| Ok(CaptureOutcome { status: "COMPLETED".into(), settlement_currency: "EUR".into() }));
    paypal_routes(cfg, echo_store(), orders);
}

fn configure_create_fails(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderProc::new();
    orders.expect_create_order().returning(|_, _, _| Err(ProcessorError::Transport("connection refused".into())));
    paypal_routes(cfg, echo_store(), orders);
}

fn configure_capture_fails(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderProc::new();
    orders
        .expect_create_order()
        .returning(|_, _, _| Ok(OrderOutcome { order_id: "ORDER123".into(), approval_link: None }));
    orders.expect_capture_order().returning(|_| Err(ProcessorError::Transport("capture timed out".into())));
    paypal_routes(cfg, echo_store(), orders);
}

fn configure_not_completed(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderProc::new();
    orders
        .expect_create_order()
        .returning(|_, _, _| Ok(OrderOutcome { order_id: "ORDER_FAIL".into(), approval_link: None }));
    orders
        .expect_capture_order()
        .returning(|_| Ok(CaptureOutcome { status: "DECLINED".into(), settlement_currency: "USD".into() }));
    paypal_routes(cfg, echo_store(), orders);
}
