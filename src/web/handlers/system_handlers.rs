// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use tracing::info;

pub async fn health_handler() -> Json<&'static str> {
    info!("Health check");
    Json("OK")
}
