// src/web/handlers/cover_letter_handlers.rs
//! Cover letter generation and regeneration

use super::{acquire_pool, request_user};
use crate::analysis::ResumeAnalysis;
use crate::cover_letters::{letter_variables, CoverLetterGenerator};
use crate::database::{CoverLetterRepository, DatabaseConfig, JobRepository, ResumeRepository};
use crate::web::types::{
    ApiError, ApiResult, CoverLetterRequest, CoverLetterResponse, ServerConfig,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, warn};

pub async fn generate_cover_letter_handler(
    request: Json<CoverLetterRequest>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CoverLetterResponse> {
    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    let job = match &request.job_id {
        Some(job_id) => match JobRepository::new(pool).find_by_id(job_id).await {
            Ok(Some(job)) => Some(job),
            Ok(None) => return Err(ApiError::not_found("job not found")),
            Err(e) => {
                error!("Failed to load job {}: {:#}", job_id, e);
                return Err(ApiError::internal());
            }
        },
        None => None,
    };

    let resume = match &request.resume_id {
        Some(resume_id) => match ResumeRepository::new(pool).find_by_id(resume_id).await {
            Ok(Some(resume)) => Some(resume),
            Ok(None) => return Err(ApiError::not_found("resume not found")),
            Err(e) => {
                error!("Failed to load resume {}: {:#}", resume_id, e);
                return Err(ApiError::internal());
            }
        },
        None => None,
    };

    // Technical skills come from the stored analysis when one exists
    let technical_skills = resume
        .as_ref()
        .and_then(|resume| resume.analysis.as_deref())
        .and_then(|analysis| match serde_json::from_str::<ResumeAnalysis>(analysis) {
            Ok(parsed) => Some(parsed.skills.technical),
            Err(e) => {
                warn!("Stored resume analysis is not parseable: {:#}", e);
                None
            }
        })
        .unwrap_or_default();

    let variables = letter_variables(&user, job.as_ref(), &technical_skills);
    let content = match CoverLetterGenerator::render(&request.template_id, &variables) {
        Ok(content) => content,
        Err(e) => return Err(ApiError::bad_request(&e.to_string())),
    };

    let letters = CoverLetterRepository::new(pool);

    let letter = match &request.cover_letter_id {
        // Regeneration rewrites the existing letter in place
        Some(letter_id) => {
            match letters
                .update_content(letter_id, &request.template_id, &content)
                .await
            {
                Ok(true) => match letters.find_by_id(letter_id).await {
                    Ok(Some(letter)) => letter,
                    Ok(None) => return Err(ApiError::not_found("cover letter not found")),
                    Err(e) => {
                        error!("Failed to reload cover letter {}: {:#}", letter_id, e);
                        return Err(ApiError::internal());
                    }
                },
                Ok(false) => return Err(ApiError::not_found("cover letter not found")),
                Err(e) => {
                    error!("Failed to update cover letter {}: {:#}", letter_id, e);
                    return Err(ApiError::internal());
                }
            }
        }
        None => {
            match letters
                .create(
                    &user.id,
                    request.job_id.as_deref(),
                    request.resume_id.as_deref(),
                    &request.template_id,
                    &content,
                )
                .await
            {
                Ok(letter) => letter,
                Err(e) => {
                    error!("Failed to store cover letter: {:#}", e);
                    return Err(ApiError::internal());
                }
            }
        }
    };

    Ok(Json(CoverLetterResponse {
        success: true,
        cover_letter: letter,
    }))
}
