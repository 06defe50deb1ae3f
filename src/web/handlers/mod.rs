pub mod application_handlers;
pub mod cover_letter_handlers;
pub mod job_handlers;
pub mod match_handlers;
pub mod resume_handlers;
pub mod system_handlers;

pub use application_handlers::*;
pub use cover_letter_handlers::*;
pub use job_handlers::*;
pub use match_handlers::*;
pub use resume_handlers::*;
pub use system_handlers::*;

use crate::database::{DatabaseConfig, User, UserRepository};
use crate::web::types::{ApiError, ServerConfig};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use sqlx::SqlitePool;
use tracing::error;

/// Borrow the shared pool, mapping an uninitialized store to the generic
/// server error
pub(crate) fn acquire_pool(
    db_config: &DatabaseConfig,
) -> Result<&SqlitePool, Custom<Json<ApiError>>> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {:#}", e);
        ApiError::internal()
    })
}

/// Resolve the request identity; with authentication out of scope every
/// request runs as the configured local user
pub(crate) async fn request_user(
    pool: &SqlitePool,
    config: &ServerConfig,
) -> Result<User, Custom<Json<ApiError>>> {
    UserRepository::new(pool)
        .get_or_create(&config.default_user_email, &config.default_user_name)
        .await
        .map_err(|e| {
            error!("Failed to resolve request user: {:#}", e);
            ApiError::internal()
        })
}
