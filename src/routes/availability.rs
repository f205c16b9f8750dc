use actix_web::{web, HttpResponse, Responder};
use chrono::{Days, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::db::mongo_store::MongoStore;
use crate::db::store::BookingStore;
use crate::services::availability_service::AvailabilityService;

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub product_id: String,
}

#[derive(Serialize)]
struct AvailabilityResponse {
    blocked_dates: Vec<chrono::NaiveDate>,
}

/*
    POST /api/availability

    Calendar feed for the widget: every date over the configured horizon
    that cannot start a booking, from today forward. Past dates are the
    calendar's own concern and never appear here.
*/
pub async fn get_blocked_dates(
    input: web::Json<AvailabilityRequest>,
    store: web::Data<MongoStore>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let product_id = match ObjectId::parse_str(&input.product_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid product ID"),
    };

    let today = Utc::now().date_naive();
    let until = today + Days::new(config.calendar_horizon_days.max(0) as u64);

    let blocked = match store.list_blocked_dates(&product_id).await {
        Ok(blocked) => blocked,
        Err(err) => {
            eprintln!("Failed to retrieve blocked dates: {}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve availability");
        }
    };
    let inventory = match store.list_inventory(&product_id, today, until).await {
        Ok(inventory) => inventory,
        Err(err) => {
            eprintln!("Failed to retrieve inventory: {}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve availability");
        }
    };

    let blocked_dates = AvailabilityService::blocked_calendar(
        &blocked,
        &inventory,
        today,
        config.calendar_horizon_days,
    );
    HttpResponse::Ok().json(AvailabilityResponse { blocked_dates })
}
