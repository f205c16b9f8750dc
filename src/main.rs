use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use dome_booking_api::config::AppConfig;
use dome_booking_api::db::mongo::create_mongo_client;
use dome_booking_api::db::mongo_store::MongoStore;
use dome_booking_api::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let config = AppConfig::from_env();
    println!("Attempting to bind to {}:{}", config.host, config.port);

    let client = create_mongo_client(&config.mongo_uri, config.store_timeout).await;
    println!("MongoDB connection established");

    let store = MongoStore::new(client, &config);
    if let Err(e) = store.ensure_indexes().await {
        eprintln!("WARNING: Failed to ensure inventory indexes: {}", e);
        eprintln!("Concurrent reservations may not be protected against racing inserts");
    }

    let stripe_client = Arc::new(stripe::Client::new(config.stripe_secret_key.clone()));

    println!("Starting HTTP server...");

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.public_origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(stripe_client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/products")
                            .route("", web::get().to(routes::product::get_products))
                            .route("/{id}", web::get().to(routes::product::get_by_id))
                            .route("/{id}/addons", web::get().to(routes::product::get_addons)),
                    )
                    .route(
                        "/availability",
                        web::post().to(routes::availability::get_blocked_dates),
                    )
                    .route("/quote", web::post().to(routes::quote::compute_quote))
                    .service(
                        web::scope("/bookings")
                            .route("", web::post().to(routes::booking::create_booking))
                            .route("/{id}", web::get().to(routes::booking::get_by_id)),
                    )
                    .service(
                        web::scope("/payments")
                            .route(
                                "/session",
                                web::post().to(routes::payment::create_checkout_session),
                            )
                            .route("/verify", web::post().to(routes::payment::verify_session))
                            .route(
                                "/webhook",
                                web::post().to(routes::payment::handle_stripe_webhook),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
