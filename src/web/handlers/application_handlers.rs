// src/web/handlers/application_handlers.rs
//! Application submission and status tracking

use super::{acquire_pool, request_user};
use crate::database::{
    ApplicationRepository, ApplicationStatus, CoverLetterRepository, DatabaseConfig,
    JobRepository, ResumeRepository,
};
use crate::web::types::{
    ApiError, ApiResult, ApplicationRequest, ApplicationResponse, ApplicationStatusRequest,
    ServerConfig,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn submit_application_handler(
    request: Json<ApplicationRequest>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ApplicationResponse> {
    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    // Referenced rows must exist before the application row is written
    match JobRepository::new(pool).find_by_id(&request.job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ApiError::not_found("job not found")),
        Err(e) => {
            error!("Failed to load job {}: {:#}", request.job_id, e);
            return Err(ApiError::internal());
        }
    }

    match ResumeRepository::new(pool)
        .find_by_id(&request.resume_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ApiError::not_found("resume not found")),
        Err(e) => {
            error!("Failed to load resume {}: {:#}", request.resume_id, e);
            return Err(ApiError::internal());
        }
    }

    if let Some(letter_id) = &request.cover_letter_id {
        match CoverLetterRepository::new(pool).find_by_id(letter_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ApiError::not_found("cover letter not found")),
            Err(e) => {
                error!("Failed to load cover letter {}: {:#}", letter_id, e);
                return Err(ApiError::internal());
            }
        }
    }

    let application = match ApplicationRepository::new(pool)
        .create(
            &user.id,
            &request.job_id,
            &request.resume_id,
            request.cover_letter_id.as_deref(),
        )
        .await
    {
        Ok(application) => application,
        Err(e) => {
            error!("Failed to record application: {:#}", e);
            return Err(ApiError::internal());
        }
    };

    Ok(Json(ApplicationResponse {
        success: true,
        application,
    }))
}

pub async fn update_application_status_handler(
    request: Json<ApplicationStatusRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ApplicationResponse> {
    let status: ApplicationStatus = match request.status.parse() {
        Ok(status) => status,
        Err(e) => return Err(ApiError::bad_request(&e.to_string())),
    };

    let pool = acquire_pool(db_config)?;
    let applications = ApplicationRepository::new(pool);

    match applications
        .update_status(&request.application_id, status, request.response.as_deref())
        .await
    {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::not_found("application not found")),
        Err(e) => {
            error!(
                "Failed to update application {}: {:#}",
                request.application_id, e
            );
            return Err(ApiError::internal());
        }
    }

    match applications.find_by_id(&request.application_id).await {
        Ok(Some(application)) => Ok(Json(ApplicationResponse {
            success: true,
            application,
        })),
        Ok(None) => Err(ApiError::not_found("application not found")),
        Err(e) => {
            error!(
                "Failed to reload application {}: {:#}",
                request.application_id, e
            );
            Err(ApiError::internal())
        }
    }
}
