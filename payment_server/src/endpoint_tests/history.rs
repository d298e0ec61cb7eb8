use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::Value;
use travel_payment_engine::{db_types::HistoryEntry, PaymentHistory, ReconcileApi};

use super::{helpers::get_request, mocks::MockRecordStore};
use crate::routes::PaymentHistoryRoute;

#[actix_web::test]
async fn empty_history_is_an_empty_list() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/payment/history", configure_empty).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn history_lists_resolved_attempts_in_order() {
    let (status, body) = get_request("/payment/history", configure_populated).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let entries: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["payment_id"], 1);
    assert_eq!(entries[0]["status"], "succeeded");
    assert_eq!(entries[0]["ticket_id"], 5);
    assert_eq!(entries[1]["payment_id"], 2);
    assert_eq!(entries[1]["status"], "failed");
    assert_eq!(entries[1]["error"], "Payment failed");
    // Subject fields that do not apply are omitted entirely.
    assert!(entries[0].get("booking_transaction_id").is_none());
}

fn history_route(cfg: &mut ServiceConfig, history: PaymentHistory) {
    let api = ReconcileApi::new(MockRecordStore::new(), history);
    cfg.service(PaymentHistoryRoute::<MockRecordStore>::new()).app_data(web::Data::new(api));
}

fn configure_empty(cfg: &mut ServiceConfig) {
    history_route(cfg, PaymentHistory::new());
}

fn configure_populated(cfg: &mut ServiceConfig) {
    let history = PaymentHistory::new();
    history.append(HistoryEntry {
        payment_id: 1,
        amount: 500.0,
        currency: "USD".into(),
        status: "succeeded".into(),
        stripe_payment_intent: Some("pi_ok".into()),
        error: None,
        ticket_id: Some(5),
        booking_transaction_id: None,
    });
    history.append(HistoryEntry {
        payment_id: 2,
        amount: 75.0,
        currency: "USD".into(),
        status: "failed".into(),
        stripe_payment_intent: None,
        error: Some("Payment failed".into()),
        ticket_id: None,
        booking_transaction_id: Some(4),
    });
    history_route(cfg, history);
}
