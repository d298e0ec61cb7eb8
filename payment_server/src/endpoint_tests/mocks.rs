use chrono::Utc;
use mockall::mock;
use travel_payment_engine::{
    db_types::{NewPaymentAttempt, PaymentAttempt, PaymentStatus},
    traits::{
        CaptureOutcome,
        CardProcessor,
        ChargeOutcome,
        OrderOutcome,
        OrderProcessor,
        PaymentRecordStore,
        PaymentStoreError,
        ProcessorError,
    },
};

mock! {
    pub RecordStore {}
    impl PaymentRecordStore for RecordStore {
        async fn create_attempt(&self, attempt: NewPaymentAttempt) -> Result<PaymentAttempt, PaymentStoreError>;
        async fn update_attempt_status(&self, id: i64, new_status: PaymentStatus, reference: Option<String>, error: Option<String>) -> Result<Option<PaymentAttempt>, PaymentStoreError>;
        async fn update_attempt_currency(&self, id: i64, currency: &str) -> Result<Option<PaymentAttempt>, PaymentStoreError>;
        async fn fetch_attempt(&self, id: i64) -> Result<Option<PaymentAttempt>, PaymentStoreError>;
        async fn fetch_all_attempts(&self) -> Result<Vec<PaymentAttempt>, PaymentStoreError>;
    }
}

mock! {
    pub Card {}
    impl CardProcessor for Card {
        async fn charge_now(&self, amount_minor: i64, currency: &str, method_token: Option<String>, description: Option<String>) -> Result<ChargeOutcome, ProcessorError>;
    }
}

mock! {
    pub OrderProc {}
    impl OrderProcessor for OrderProc {
        async fn create_order(&self, amount: &str, currency: &str, description: Option<String>) -> Result<OrderOutcome, ProcessorError>;
        async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome, ProcessorError>;
    }
}

pub fn persisted(id: i64, draft: NewPaymentAttempt) -> PaymentAttempt {
    PaymentAttempt {
        id,
        subject_kind: draft.subject_kind,
        ticket_id: draft.ticket_id,
        booking_transaction_id: draft.booking_transaction_id,
        method_id: draft.method_id,
        amount: draft.amount,
        currency: draft.currency,
        status: draft.status,
        processor_reference: draft.processor_reference,
        error_message: draft.error_message,
        created_at: Utc::now(),
    }
}

/// A record store that assigns sequential ids starting at 1 and echoes status updates back.
pub fn echo_store() -> MockRecordStore {
    use std::sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
        Mutex,
    };
    let mut store = MockRecordStore::new();
    let next_id = Arc::new(AtomicI64::new(1));
    let records: Arc<Mutex<Vec<PaymentAttempt>>> = Arc::new(Mutex::new(Vec::new()));
    let records2 = records.clone();
    store.expect_create_attempt().returning(move |draft| {
        let id = next_id.fetch_add(1, Ordering::SeqCst);
        let record = persisted(id, draft);
        records.lock().unwrap().push(record.clone());
        Ok(record)
    });
    let records3 = records2.clone();
    store.expect_update_attempt_status().returning(move |id, status, reference, error| {
        let mut records = records2.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                record.processor_reference = reference;
                record.error_message = error;
                Ok(Some(record.clone()))
            },
            None => Ok(None),
        }
    });
    store.expect_update_attempt_currency().returning(move |id, currency| {
        let mut records = records3.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.currency = currency.to_string();
                Ok(Some(record.clone()))
            },
            None => Ok(None),
        }
    });
    store
}
