use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{HistoryEntry, NewPaymentAttempt, PaymentAttempt, PaymentStatus, Subject},
    history::PaymentHistory,
    reconcile::{
        errors::{ChargeFlowError, OrderFlowError},
        objects::{CaptureReceipt, ChargeReceipt, ChargeRequest},
    },
    traits::{CardProcessor, OrderProcessor, PaymentRecordStore, PaymentStoreError, ProcessorError},
};

const METHOD_REQUIRED_MESSAGE: &str = "Payment requires a valid payment method.";
const PAYMENT_FAILED_MESSAGE: &str = "Payment failed";
/// The capture status the order processor reports when funds actually moved.
const CAPTURE_COMPLETED: &str = "COMPLETED";

/// `ReconcileApi` drives one payment attempt from request to terminal outcome.
///
/// It is the only component that initiates attempt lifecycle transitions. All attempts of a batch transition
/// together: either all move to `Completed` with the same processor reference, or all move to `Failed` with the
/// same error message. There is no partial-success state across a batch.
pub struct ReconcileApi<B> {
    db: B,
    history: PaymentHistory,
}

impl<B> Debug for ReconcileApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcileApi")
    }
}

impl<B> ReconcileApi<B> {
    pub fn new(db: B, history: PaymentHistory) -> Self {
        Self { db, history }
    }

    pub fn history(&self) -> &PaymentHistory {
        &self.history
    }
}

impl<B> ReconcileApi<B>
where B: PaymentRecordStore
{
    /// Single-phase charge: pre-create `Pending` attempts, charge once, finalize all attempts together.
    ///
    /// Batch ticket requests split the amount evenly across one attempt per ticket id, but share a single
    /// processor call and a single outcome. A storage failure in this flow is re-raised as
    /// [`ChargeFlowError::Store`] rather than absorbed.
    pub async fn charge_now<C: CardProcessor>(
        &self,
        processor: &C,
        request: ChargeRequest,
    ) -> Result<ChargeReceipt, ChargeFlowError> {
        let pending = self.create_pending_attempts(&request).await?;
        let payment_ids = ids_of(&pending);
        debug!(
            "🔄️💳️ {} pending attempt(s) created for a {} charge of {}",
            payment_ids.len(),
            request.subject.kind(),
            request.amount
        );
        let outcome = processor
            .charge_now(
                request.amount.value(),
                &request.currency,
                request.method_token.clone(),
                request.description.clone(),
            )
            .await;
        match outcome {
            Ok(res) if res.status == "succeeded" => {
                let attempts =
                    self.finalize_attempts(&payment_ids, PaymentStatus::Completed, Some(&res.reference), None).await?;
                self.history.extend(attempts.iter().map(HistoryEntry::from));
                debug!("🔄️💳️ Charge [{}] succeeded for attempt(s) {payment_ids:?}", res.reference);
                Ok(ChargeReceipt { attempts, reference: res.reference })
            },
            Ok(res) if res.status == "requires_payment_method" => {
                self.fail_attempts(&payment_ids, METHOD_REQUIRED_MESSAGE).await?;
                Err(ChargeFlowError::MethodRequired { payment_ids })
            },
            Ok(res) => {
                let message = format!("Payment not successful. Status: {}", res.status);
                self.fail_attempts(&payment_ids, &message).await?;
                Err(ChargeFlowError::Declined { message, payment_ids })
            },
            Err(ProcessorError::MethodRequired) => {
                self.fail_attempts(&payment_ids, METHOD_REQUIRED_MESSAGE).await?;
                Err(ChargeFlowError::MethodRequired { payment_ids })
            },
            Err(ProcessorError::Declined(message)) => {
                self.fail_attempts(&payment_ids, &message).await?;
                Err(ChargeFlowError::Declined { message, payment_ids })
            },
            Err(ProcessorError::Rejected(message)) => {
                self.fail_attempts(&payment_ids, &message).await?;
                Err(ChargeFlowError::Rejected { message, payment_ids })
            },
            Err(ProcessorError::Transport(message)) => {
                self.fail_attempts(&payment_ids, &message).await?;
                Err(ChargeFlowError::Transport { message, payment_ids })
            },
        }
    }

    /// Two-phase flow: pre-create `Pending` attempts, create the order, attempt an immediate capture.
    ///
    /// Persistence failures degrade gracefully here: the flow first tries to reuse the pre-created records,
    /// then falls back to creating fresh terminal records, and on double failure returns the processor result
    /// anyway with `recorded == false`.
    pub async fn order_and_capture<P: OrderProcessor>(
        &self,
        processor: &P,
        request: ChargeRequest,
    ) -> Result<CaptureReceipt, OrderFlowError> {
        let pending = match self.create_pending_attempts(&request).await {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    "🔄️🧾️ Could not pre-create attempt record(s): {e}. Continuing; the outcome will be recorded \
                     after the processor call."
                );
                Vec::new()
            },
        };
        let order = match processor
            .create_order(&request.amount.to_decimal_string(), &request.currency, request.description.clone())
            .await
        {
            Ok(order) => order,
            Err(e) => {
                let message = e.to_string();
                warn!("🔄️🧾️ Order creation failed: {message}");
                let recorded = self.record_failure_degraded(&pending, &request, None, &message).await;
                return Err(OrderFlowError::CreateFailed { message, payment_ids: ids_of(&recorded) });
            },
        };
        debug!("🔄️🧾️ Order [{}] created", order.order_id);
        let capture = match processor.capture_order(&order.order_id).await {
            Ok(capture) => capture,
            Err(e) => {
                let message = e.to_string();
                warn!("🔄️🧾️ Capture of order [{}] failed: {message}", order.order_id);
                let recorded =
                    self.record_failure_degraded(&pending, &request, Some(&order.order_id), &message).await;
                return Err(OrderFlowError::CaptureFailed {
                    order_id: order.order_id,
                    message,
                    payment_ids: ids_of(&recorded),
                });
            },
        };
        if capture.status == CAPTURE_COMPLETED {
            let recorded = self
                .record_completion_degraded(&pending, &request, &order.order_id, &capture.settlement_currency)
                .await;
            let was_recorded = !recorded.is_empty();
            if was_recorded {
                debug!("🔄️🧾️ Capture [{}] completed; attempt(s) {:?} settled", order.order_id, ids_of(&recorded));
            } else {
                warn!("🔄️🧾️ Capture [{}] completed but the outcome could not be recorded", order.order_id);
            }
            Ok(CaptureReceipt {
                attempts: recorded,
                order_id: order.order_id,
                approval_link: order.approval_link,
                settlement_currency: capture.settlement_currency,
                recorded: was_recorded,
            })
        } else {
            debug!("🔄️🧾️ Capture [{}] resolved with status {}", order.order_id, capture.status);
            let recorded =
                self.record_failure_degraded(&pending, &request, Some(&order.order_id), PAYMENT_FAILED_MESSAGE).await;
            Err(OrderFlowError::NotCompleted {
                order_id: order.order_id,
                status: capture.status,
                payment_ids: ids_of(&recorded),
            })
        }
    }

    /// One `Pending` draft per subject id. Batch ticket requests split the amount evenly; the first share
    /// carries the division remainder so the shares sum to the request amount.
    fn pending_drafts(request: &ChargeRequest) -> Vec<NewPaymentAttempt> {
        match &request.subject {
            Subject::Tickets(ids) => {
                let shares = request.amount.split_even(ids.len());
                ids.iter()
                    .zip(shares)
                    .map(|(tid, share)| {
                        NewPaymentAttempt::for_ticket(*tid, share, &request.currency, request.method_id)
                    })
                    .collect()
            },
            Subject::Room(bid) => {
                vec![NewPaymentAttempt::for_room(*bid, request.amount, &request.currency, request.method_id)]
            },
        }
    }

    fn terminal_drafts(
        request: &ChargeRequest,
        status: PaymentStatus,
        reference: Option<&str>,
        error: Option<&str>,
    ) -> Vec<NewPaymentAttempt> {
        Self::pending_drafts(request)
            .into_iter()
            .map(|draft| {
                let mut draft = draft.with_status(status);
                if let Some(reference) = reference {
                    draft = draft.with_reference(reference);
                }
                if let Some(error) = error {
                    draft = draft.with_error(error);
                }
                draft
            })
            .collect()
    }

    async fn create_pending_attempts(&self, request: &ChargeRequest) -> Result<Vec<PaymentAttempt>, PaymentStoreError> {
        let mut created = Vec::with_capacity(request.subject.attempt_count());
        for draft in Self::pending_drafts(request) {
            created.push(self.db.create_attempt(draft).await?);
        }
        Ok(created)
    }

    async fn finalize_attempts(
        &self,
        ids: &[i64],
        status: PaymentStatus,
        reference: Option<&str>,
        error: Option<&str>,
    ) -> Result<Vec<PaymentAttempt>, PaymentStoreError> {
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            match self.db.update_attempt_status(*id, status, reference.map(String::from), error.map(String::from)).await? {
                Some(attempt) => updated.push(attempt),
                None => warn!("🔄️ Attempt #{id} was missing or already terminal while finalizing to {status}"),
            }
        }
        Ok(updated)
    }

    async fn fail_attempts(&self, ids: &[i64], message: &str) -> Result<(), PaymentStoreError> {
        let attempts = self.finalize_attempts(ids, PaymentStatus::Failed, None, Some(message)).await?;
        self.history.extend(attempts.iter().map(HistoryEntry::from));
        Ok(())
    }

    /// Best-effort failure recording for the two-phase flow: update the pre-created records, fall back to
    /// creating fresh `Failed` records, give up after that. Returns whatever was recorded.
    async fn record_failure_degraded(
        &self,
        pending: &[PaymentAttempt],
        request: &ChargeRequest,
        reference: Option<&str>,
        message: &str,
    ) -> Vec<PaymentAttempt> {
        let mut recorded = Vec::new();
        for attempt in pending {
            match self
                .db
                .update_attempt_status(
                    attempt.id,
                    PaymentStatus::Failed,
                    reference.map(String::from),
                    Some(message.to_string()),
                )
                .await
            {
                Ok(Some(updated)) => recorded.push(updated),
                Ok(None) => warn!("🔄️🧾️ Attempt #{} was missing or already terminal while recording failure", attempt.id),
                Err(e) => warn!("🔄️🧾️ Could not record failure on attempt #{}: {e}", attempt.id),
            }
        }
        if recorded.is_empty() {
            for draft in Self::terminal_drafts(request, PaymentStatus::Failed, reference, Some(message)) {
                match self.db.create_attempt(draft).await {
                    Ok(attempt) => recorded.push(attempt),
                    Err(e) => warn!("🔄️🧾️ Fallback failure record could not be created: {e}"),
                }
            }
        }
        self.history.extend(recorded.iter().map(HistoryEntry::from));
        recorded
    }

    /// Best-effort completion recording for the two-phase flow, persisting the settlement currency the
    /// processor actually captured in.
    async fn record_completion_degraded(
        &self,
        pending: &[PaymentAttempt],
        request: &ChargeRequest,
        order_id: &str,
        settlement_currency: &str,
    ) -> Vec<PaymentAttempt> {
        let mut recorded = Vec::new();
        for attempt in pending {
            let updated: Result<Option<PaymentAttempt>, PaymentStoreError> = async {
                self.db.update_attempt_currency(attempt.id, settlement_currency).await?;
                self.db
                    .update_attempt_status(attempt.id, PaymentStatus::Completed, Some(order_id.to_string()), None)
                    .await
            }
            .await;
            match updated {
                Ok(Some(attempt)) => recorded.push(attempt),
                Ok(None) => {
                    warn!("🔄️🧾️ Attempt #{} was missing or already terminal while recording completion", attempt.id)
                },
                Err(e) => warn!("🔄️🧾️ Could not record completion on attempt #{}: {e}", attempt.id),
            }
        }
        if recorded.is_empty() {
            let mut fallback = request.clone();
            fallback.currency = settlement_currency.to_string();
            for draft in Self::terminal_drafts(&fallback, PaymentStatus::Completed, Some(order_id), None) {
                match self.db.create_attempt(draft).await {
                    Ok(attempt) => recorded.push(attempt),
                    Err(e) => warn!("🔄️🧾️ Fallback completion record could not be created: {e}"),
                }
            }
        }
        self.history.extend(recorded.iter().map(HistoryEntry::from));
        recorded
    }
}

fn ids_of(attempts: &[PaymentAttempt]) -> Vec<i64> {
    attempts.iter().map(|a| a.id).collect()
}
