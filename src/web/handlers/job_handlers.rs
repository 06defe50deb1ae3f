// src/web/handlers/job_handlers.rs
//! Job search and detail, backed by the configured provider

use super::{acquire_pool, request_user};
use crate::database::{DatabaseConfig, JobRepository, JobSearchRepository};
use crate::jobs::{JobProvider, JobQuery};
use crate::web::types::{
    ApiError, ApiResult, JobDetailResponse, JobListResponse, ServerConfig,
};
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn list_jobs_handler(
    search_term: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    is_remote: Option<bool>,
    provider: &State<Box<dyn JobProvider>>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<JobListResponse> {
    let query = JobQuery {
        search_term: search_term.unwrap_or_default(),
        location,
        job_type,
        is_remote,
    };

    let jobs = match provider.search_jobs(&query).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Job provider search failed: {:#}", e);
            return Err(ApiError::internal());
        }
    };

    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    // Keep fetched postings so detail lookups and applications can
    // reference them later
    let job_repo = JobRepository::new(pool);
    for job in &jobs {
        if let Err(e) = job_repo.upsert(job).await {
            error!("Failed to store job {}: {:#}", job.id, e);
            return Err(ApiError::internal());
        }
    }

    let results_count = jobs.len() as i64;
    if let Err(e) = JobSearchRepository::new(pool)
        .record(
            &user.id,
            &query.search_term,
            query.location.as_deref(),
            query.job_type.as_deref(),
            query.is_remote,
            results_count,
        )
        .await
    {
        error!("Failed to record job search: {:#}", e);
        return Err(ApiError::internal());
    }

    info!(
        "Job search '{}' returned {} results",
        query.search_term, results_count
    );

    Ok(Json(JobListResponse {
        success: true,
        jobs,
        results_count,
    }))
}

pub async fn get_job_handler(
    id: String,
    provider: &State<Box<dyn JobProvider>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<JobDetailResponse> {
    // Ask the provider first; fall back to previously ingested postings
    match provider.fetch_job(&id).await {
        Ok(Some(job)) => {
            return Ok(Json(JobDetailResponse { success: true, job }));
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Job provider lookup failed for {}: {:#}", id, e);
        }
    }

    let pool = acquire_pool(db_config)?;
    match JobRepository::new(pool).find_by_id(&id).await {
        Ok(Some(job)) => Ok(Json(JobDetailResponse { success: true, job })),
        Ok(None) => Err(ApiError::not_found("job not found")),
        Err(e) => {
            error!("Failed to load job {}: {:#}", id, e);
            Err(ApiError::internal())
        }
    }
}
