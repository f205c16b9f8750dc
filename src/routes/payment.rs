use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    Currency, EventObject, EventType, Webhook,
};

use crate::config::AppConfig;
use crate::db::mongo_store::MongoStore;
use crate::db::store::BookingStore;
use crate::models::booking::{Booking, BookingStatus};
use crate::services::booking_service::{BookingError, BookingService};

#[derive(Serialize, Deserialize)]
pub struct CreateSessionInput {
    booking_id: String,
    email: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifySessionInput {
    session_id: String,
}

/*
    POST /api/payments/session

    Looks the booking up server-side before charging: the session amount
    always comes from the persisted price, never from the client.
*/
pub async fn create_checkout_session(
    input: web::Json<CreateSessionInput>,
    store: web::Data<MongoStore>,
    config: web::Data<AppConfig>,
    stripe_client: web::Data<Arc<stripe::Client>>,
) -> impl Responder {
    println!("Creating checkout session...");

    if input.booking_id.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Booking ID is required" }));
    }
    let booking_id = match ObjectId::parse_str(&input.booking_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid booking ID" }))
        }
    };

    let booking = match store.get_booking(&booking_id).await {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({ "error": "Booking not found" }))
        }
        Err(err) => {
            eprintln!("Failed to retrieve booking: {}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to retrieve booking" }));
        }
    };
    if booking.status == BookingStatus::Confirmed {
        return HttpResponse::BadRequest().json(json!({ "error": "Booking is already paid" }));
    }

    let success_url = format!(
        "{}/thank-you?session_id={{CHECKOUT_SESSION_ID}}",
        config.public_origin
    );
    let cancel_url = format!(
        "{}/checkout?bookingId={}",
        config.public_origin, input.booking_id
    );
    let description = session_description(&booking);
    // Stripe wants the smallest currency unit (fils).
    let unit_amount = (booking.price_total * 100.0).round() as i64;

    let mut params = CreateCheckoutSession::new();
    params.mode = Some(CheckoutSessionMode::Payment);
    params.success_url = Some(&success_url);
    params.cancel_url = Some(&cancel_url);
    params.customer_email = input.email.as_deref();
    params.line_items = Some(vec![CreateCheckoutSessionLineItems {
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency: Currency::AED,
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: "Dome Stay".to_string(),
                description: Some(description),
                ..Default::default()
            }),
            unit_amount: Some(unit_amount),
            ..Default::default()
        }),
        quantity: Some(1),
        ..Default::default()
    }]);
    let mut metadata = HashMap::new();
    metadata.insert("booking_id".to_string(), input.booking_id.clone());
    metadata.insert("cart_id".to_string(), booking.cart_id.to_hex());
    params.metadata = Some(metadata);

    match CheckoutSession::create(stripe_client.as_ref(), params).await {
        Ok(session) => HttpResponse::Ok().json(json!({ "url": session.url })),
        Err(e) => {
            eprintln!("Error creating checkout session: {:?}", e);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create checkout session" }))
        }
    }
}

fn session_description(booking: &Booking) -> String {
    let guests = booking.guests_adult + booking.guests_children + booking.guests_infants;
    format!("{} Night(s) for {} Guest(s)", booking.nights, guests)
}

/*
    POST /api/payments/verify

    Thank-you page path: the widget hands back the session id and we ask
    Stripe whether it was actually paid. An unpaid session is a structured
    "pending" outcome so the user gets a retry path, not an error page.
*/
pub async fn verify_session(
    input: web::Json<VerifySessionInput>,
    store: web::Data<MongoStore>,
    stripe_client: web::Data<Arc<stripe::Client>>,
) -> impl Responder {
    if input.session_id.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Session ID is required" }));
    }
    let session_id = match CheckoutSessionId::from_str(&input.session_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Invalid session ID" }))
        }
    };

    let session = match CheckoutSession::retrieve(stripe_client.as_ref(), &session_id, &[]).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error retrieving checkout session: {:?}", e);
            return HttpResponse::NotFound().json(json!({ "error": "Session not found" }));
        }
    };

    if session.payment_status != CheckoutSessionPaymentStatus::Paid {
        return HttpResponse::Ok().json(json!({ "status": "pending" }));
    }

    let booking_id = session
        .metadata
        .as_ref()
        .and_then(|m| m.get("booking_id"))
        .and_then(|raw| ObjectId::parse_str(raw).ok());
    let Some(booking_id) = booking_id else {
        return HttpResponse::NotFound().json(json!({ "error": "Booking not found" }));
    };

    let charge_ref = charge_reference(&session);

    confirm_and_respond(store.get_ref(), &booking_id, &charge_ref).await
}

/// Prefer the payment intent id as the charge reference; fall back to the
/// session id when Stripe omits it.
fn charge_reference(session: &CheckoutSession) -> String {
    match &session.payment_intent {
        Some(stripe::Expandable::Id(id)) => id.to_string(),
        Some(stripe::Expandable::Object(pi)) => pi.id.to_string(),
        None => session.id.to_string(),
    }
}

async fn confirm_and_respond(
    store: &MongoStore,
    booking_id: &ObjectId,
    charge_ref: &str,
) -> HttpResponse {
    match BookingService::confirm_payment(store, booking_id, charge_ref).await {
        Ok(code) => HttpResponse::Ok().json(json!({
            "status": "confirmed",
            "confirmation_code": code,
        })),
        Err(BookingError::InvalidInput(msg)) => {
            HttpResponse::NotFound().json(json!({ "error": msg }))
        }
        Err(err) => {
            eprintln!("Failed to confirm payment: {}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to confirm payment" }))
        }
    }
}

/*
    POST /api/payments/webhook
*/
pub async fn handle_stripe_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    store: web::Data<MongoStore>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    // Get the Stripe-Signature header
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            return HttpResponse::BadRequest().body("Missing stripe-signature header");
        }
    };

    let payload_str = match String::from_utf8(payload.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            return HttpResponse::BadRequest().body("Invalid payload encoding");
        }
    };

    let event =
        match Webhook::construct_event(&payload_str, signature, &config.stripe_webhook_secret) {
            Ok(event) => event,
            Err(e) => {
                println!("Webhook error: {:?}", e);
                return HttpResponse::BadRequest().body(format!("Webhook error: {}", e));
            }
        };

    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                let booking_id = session
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("booking_id"))
                    .and_then(|raw| ObjectId::parse_str(raw).ok());
                let Some(booking_id) = booking_id else {
                    return HttpResponse::BadRequest().body("Missing booking metadata");
                };

                let charge_ref = charge_reference(&session);

                if let Err(err) =
                    BookingService::confirm_payment(store.get_ref(), &booking_id, &charge_ref).await
                {
                    // Stripe retries on non-2xx, which is what we want here.
                    eprintln!("Failed to confirm booking from webhook: {}", err);
                    return HttpResponse::InternalServerError().body("Failed to confirm booking");
                }

                HttpResponse::Ok().json(json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid checkout session object")
            }
        }

        EventType::CheckoutSessionExpired => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                // Booking stays in `cart`; inventory is not rolled back
                // automatically. Stale carts are an external reconciliation
                // job's concern.
                println!("Checkout session expired: {}", session.id);
                HttpResponse::Ok().json(json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid checkout session object")
            }
        }

        _ => {
            println!("Unhandled event type: {:?}", event.type_);
            HttpResponse::Ok().json(json!({ "received": true }))
        }
    }
}
