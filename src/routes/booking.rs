use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::config::AppConfig;
use crate::db::mongo_store::MongoStore;
use crate::db::store::BookingStore;
use crate::models::booking::BookingRequest;
use crate::services::booking_service::{BookingError, BookingService};

/*
    POST /api/bookings

    Commits a quote: re-prices server-side, claims inventory atomically per
    night, then creates the Cart + Booking pair awaiting payment.
*/
pub async fn create_booking(
    input: web::Json<BookingRequest>,
    store: web::Data<MongoStore>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    match BookingService::create_booking(store.get_ref(), config.vat_rate, &input).await {
        Ok(receipt) => HttpResponse::Ok().json(json!({
            "id": receipt.id.to_hex(),
            "cart_id": receipt.cart_id.to_hex(),
        })),
        Err(BookingError::Unavailable(reason)) => HttpResponse::Ok().json(json!({
            "available": false,
            "reason": reason,
        })),
        Err(BookingError::InvalidInput(msg)) => {
            HttpResponse::BadRequest().json(json!({ "error": msg }))
        }
        Err(BookingError::Store(err)) => {
            eprintln!("Booking creation failed against the store: {}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to create booking" }))
        }
    }
}

/*
    GET /api/bookings/{id}
*/
pub async fn get_by_id(path: web::Path<String>, store: web::Data<MongoStore>) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match store.get_booking(&id).await {
        Ok(Some(booking)) => HttpResponse::Ok().json(booking),
        Ok(None) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            eprintln!("Failed to retrieve booking: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve booking")
        }
    }
}
