// src/web/handlers/match_handlers.rs
//! Read access to stored job match records. The matching process that
//! produces them runs elsewhere.

use super::{acquire_pool, request_user};
use crate::database::{DatabaseConfig, JobMatchRepository};
use crate::web::types::{ApiError, ApiResult, MatchListResponse, ServerConfig};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn list_matches_handler(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<MatchListResponse> {
    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    match JobMatchRepository::new(pool).list_for_user(&user.id).await {
        Ok(matches) => Ok(Json(MatchListResponse {
            success: true,
            matches,
        })),
        Err(e) => {
            error!("Failed to list job matches: {:#}", e);
            Err(ApiError::internal())
        }
    }
}
