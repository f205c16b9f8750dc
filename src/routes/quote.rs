use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::config::AppConfig;
use crate::db::mongo_store::MongoStore;
use crate::models::quote::QuoteRequest;
use crate::services::quote_service::{QuoteError, QuoteService};

/*
    POST /api/quote

    An unbookable stay is a 200 with `available: false` and a reason, not an
    error; 400 is reserved for malformed input and 500 for store failures.
*/
pub async fn compute_quote(
    input: web::Json<QuoteRequest>,
    store: web::Data<MongoStore>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    match QuoteService::compute_quote(store.get_ref(), config.vat_rate, &input).await {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(QuoteError::InvalidInput(msg)) => {
            HttpResponse::BadRequest().json(json!({ "error": msg }))
        }
        Err(QuoteError::Store(err)) => {
            eprintln!("Quote failed against the store: {}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to compute quote" }))
        }
    }
}
