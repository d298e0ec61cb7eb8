//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the record store and the processor clients so that endpoint tests can swap in
//! mocks. Since actix cannot register generic handlers directly, the `route!` macro generates a zero-sized
//! service factory per route that the server turbofishes to the concrete types.

use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use log::*;
use serde_json::json;
use tpf_common::Amount;
use travel_payment_engine::{
    CardProcessor,
    ChargeFlowError,
    OrderFlowError,
    OrderProcessor,
    PaymentRecordStore,
    ReconcileApi,
};

use crate::{
    data_objects::{PaymentRequest, PaymentResponse, ProcessorFaultResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

//------------------------------------------   Card charges  --------------------------------------------------
route!(pay_ticket => Post "/payment/pay/ticket" impl PaymentRecordStore, CardProcessor);
pub async fn pay_ticket<B: PaymentRecordStore, C: CardProcessor>(
    body: web::Json<PaymentRequest>,
    api: web::Data<ReconcileApi<B>>,
    processor: web::Data<C>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST pay_ticket");
    process_charge(body.into_inner(), api.as_ref(), processor.as_ref()).await
}

route!(pay_room => Post "/payment/pay/room" impl PaymentRecordStore, CardProcessor);
pub async fn pay_room<B: PaymentRecordStore, C: CardProcessor>(
    body: web::Json<PaymentRequest>,
    api: web::Data<ReconcileApi<B>>,
    processor: web::Data<C>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST pay_room");
    process_charge(body.into_inner(), api.as_ref(), processor.as_ref()).await
}

async fn process_charge<B: PaymentRecordStore, C: CardProcessor>(
    request: PaymentRequest,
    api: &ReconcileApi<B>,
    processor: &C,
) -> Result<HttpResponse, ServerError> {
    let request = request.into_charge_request()?;
    let (amount, currency) = (request.amount, request.currency.clone());
    match api.charge_now(processor, request).await {
        Ok(receipt) => {
            let body = PaymentResponse::succeeded(
                receipt.payment_ids(),
                amount,
                &currency,
                Some(receipt.reference.clone()),
            );
            Ok(HttpResponse::Created().json(body))
        },
        Err(ChargeFlowError::Store(e)) => {
            debug!("💻️ Could not record the charge attempt. {e}");
            Err(ServerError::BackendError(e.to_string()))
        },
        Err(e) => Ok(charge_failure_response(&e, amount, &currency)),
    }
}

/// Centralized mapping from a terminal charge failure to its HTTP status and body. Method and card failures
/// are 402s; everything else the processor reported is a 400.
fn charge_failure_response(err: &ChargeFlowError, amount: Amount, currency: &str) -> HttpResponse {
    let status = match err {
        ChargeFlowError::MethodRequired { .. } | ChargeFlowError::Declined { .. } => StatusCode::PAYMENT_REQUIRED,
        _ => StatusCode::BAD_REQUEST,
    };
    let body = PaymentResponse::failed(err.payment_ids().to_vec(), amount, currency, &err.to_string());
    HttpResponse::build(status).json(body)
}

//----------------------------------------   Order and capture  -----------------------------------------------
route!(paypal_ticket => Post "/payment/paypal/ticket" impl PaymentRecordStore, OrderProcessor);
pub async fn paypal_ticket<B: PaymentRecordStore, P: OrderProcessor>(
    body: web::Json<PaymentRequest>,
    api: web::Data<ReconcileApi<B>>,
    processor: web::Data<P>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST paypal_ticket");
    process_order_capture(body.into_inner(), api.as_ref(), processor.as_ref()).await
}

route!(paypal_room => Post "/payment/paypal/room" impl PaymentRecordStore, OrderProcessor);
pub async fn paypal_room<B: PaymentRecordStore, P: OrderProcessor>(
    body: web::Json<PaymentRequest>,
    api: web::Data<ReconcileApi<B>>,
    processor: web::Data<P>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ POST paypal_room");
    process_order_capture(body.into_inner(), api.as_ref(), processor.as_ref()).await
}

async fn process_order_capture<B: PaymentRecordStore, P: OrderProcessor>(
    request: PaymentRequest,
    api: &ReconcileApi<B>,
    processor: &P,
) -> Result<HttpResponse, ServerError> {
    let request = request.into_charge_request()?;
    let (amount, currency) = (request.amount, request.currency.clone());
    match api.order_and_capture(processor, request).await {
        Ok(receipt) => {
            let body = PaymentResponse::succeeded(
                receipt.payment_ids(),
                amount,
                &receipt.settlement_currency,
                Some(receipt.order_id.clone()),
            )
            .with_approval_link(receipt.approval_link.clone());
            Ok(HttpResponse::Created().json(body))
        },
        Err(e) => Ok(order_failure_response(&e, amount, &currency)),
    }
}

/// Processor-layer faults in the two-phase flow return a 500 with a diagnostic body; a capture that resolved
/// without completing is an ordinary 400 payment failure.
fn order_failure_response(err: &OrderFlowError, amount: Amount, currency: &str) -> HttpResponse {
    let payment_id = err.payment_ids().first().copied();
    match err {
        OrderFlowError::CreateFailed { message, .. } => HttpResponse::InternalServerError()
            .json(ProcessorFaultResponse::new("create_order", message, payment_id)),
        OrderFlowError::CaptureFailed { message, .. } => HttpResponse::InternalServerError()
            .json(ProcessorFaultResponse::new("capture_order", message, payment_id)),
        OrderFlowError::NotCompleted { payment_ids, .. } => {
            let body = PaymentResponse::failed(payment_ids.clone(), amount, currency, &err.to_string());
            HttpResponse::BadRequest().json(body)
        },
    }
}

//----------------------------------------------   History  ---------------------------------------------------
route!(payment_history => Get "/payment/history" impl PaymentRecordStore);
pub async fn payment_history<B: PaymentRecordStore>(
    api: web::Data<ReconcileApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payment_history");
    let entries = api.history().snapshot();
    Ok(HttpResponse::Ok().json(entries))
}
