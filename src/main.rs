use actix_web::{
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
use dotenv::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use errors::StartupError;

mod auth;
mod config;
mod errors;
mod handlers;
mod middlewares;
mod models;
mod schema;
#[cfg(test)]
mod test_init_app;
mod utils;

pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database connection failed");
            StartupError::DbConnect
        })?;

    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "migrations failed");
        StartupError::Migrate
    })?;

    let bind_addr = config.bind_addr.clone();
    let state = web::Data::new(AppState { pool, config });

    tracing::info!("server listening on {bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Compress::default())
            .configure(handlers::configure(state.clone()))
    })
    .bind(&bind_addr)
    .map_err(|_| StartupError::SocketBind)?
    .run()
    .await
    .map_err(|_| StartupError::ServerStart)?;

    Ok(())
}
