mod config;
mod db;
mod error;
mod model;
mod routes;
mod views;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::SqlitePool;

use crate::config::Config;

pub struct AppState {
    db: SqlitePool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let pool = match db::connect(&config.database_url, config.max_connections).await {
        Ok(pool) => {
            log::info!("Connected to database at {}", config.database_url);
            pool
        }
        Err(err) => {
            log::error!("Failed to connect to the database: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = db::create_schema(&pool).await {
        log::error!("Failed to create database schema: {err}");
        std::process::exit(1);
    }

    log::info!(
        "Server listening on http://{}:{}",
        config.http_host,
        config.http_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState { db: pool.clone() }))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allow_any_method()
                    .supports_credentials(),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))?
    .run()
    .await
}
