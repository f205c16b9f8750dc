use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::db::mongo_store::MongoStore;
use crate::db::store::BookingStore;
use crate::models::product::Product;
use crate::services::addon_service::AddonService;

/*
    GET /api/products (public widget listing)
*/
pub async fn get_products(store: web::Data<MongoStore>) -> impl Responder {
    match store.list_products().await {
        Ok(products) => {
            let active: Vec<Product> = products.into_iter().filter(|p| p.active).collect();
            HttpResponse::Ok().json(active)
        }
        Err(err) => {
            eprintln!("Failed to retrieve products: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve products")
        }
    }
}

/*
    GET /api/products/{id}
*/
pub async fn get_by_id(path: web::Path<String>, store: web::Data<MongoStore>) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match store.get_product(&id).await {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => HttpResponse::NotFound().body("Product not found"),
        Err(err) => {
            eprintln!("Failed to retrieve product: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve product")
        }
    }
}

#[derive(Deserialize)]
pub struct AddonQuery {
    pub check_in: Option<NaiveDate>,
}

/*
    GET /api/products/{id}/addons?check_in=YYYY-MM-DD

    Without a check_in the list is empty: add-ons cannot be validated
    against dates that have not been chosen yet.
*/
pub async fn get_addons(
    path: web::Path<String>,
    query: web::Query<AddonQuery>,
    store: web::Data<MongoStore>,
) -> impl Responder {
    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match store.list_addons(&id).await {
        Ok(addons) => {
            let eligible = AddonService::eligible_addons(&addons, &id, query.check_in);
            HttpResponse::Ok().json(eligible)
        }
        Err(err) => {
            eprintln!("Failed to retrieve addons: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve addons")
        }
    }
}
