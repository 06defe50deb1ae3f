// src/web/handlers/resume_handlers.rs
//! Resume upload and listing

use super::{acquire_pool, request_user};
use crate::analysis::ResumeAnalyzer;
use crate::database::{DatabaseConfig, ResumeRepository};
use crate::utils::{format_upload_date, sanitize_file_name};
use crate::web::types::{
    ApiError, ApiResult, ResumeListResponse, ResumeSummary, ResumeUploadForm, ServerConfig,
    UploadResponse,
};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

// 10MB upload ceiling
const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub async fn upload_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<UploadResponse> {
    let file = match upload.resume.as_mut() {
        Some(file) => file,
        None => return Err(ApiError::bad_request("no file provided")),
    };

    let file_size = file.len();
    if file_size > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request("file exceeds the 10MB upload limit"));
    }

    // FileName::as_str() drops the extension, so sanitize the raw name
    // ourselves to echo the uploaded name back
    let file_name = file
        .raw_name()
        .map(|name| sanitize_file_name(name.dangerous_unsafe_unsanitized_raw().as_str()))
        .unwrap_or_else(|| "uploaded_resume.txt".to_string());

    // Spill the upload to a temp location so the content can be read back
    // as text
    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", uuid::Uuid::new_v4()));

    if let Err(e) = file.persist_to(&temp_path).await {
        error!("Failed to save uploaded resume: {:#}", e);
        return Err(ApiError::internal());
    }

    let content = match tokio::fs::read_to_string(&temp_path).await {
        Ok(content) => content,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            error!("Uploaded resume is not readable as text: {:#}", e);
            return Err(ApiError::internal());
        }
    };
    let _ = tokio::fs::remove_file(&temp_path).await;

    let analysis = ResumeAnalyzer::new().analyze(&content);

    let analysis_json = match serde_json::to_string(&analysis) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize resume analysis: {:#}", e);
            return Err(ApiError::internal());
        }
    };

    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    if let Err(e) = ResumeRepository::new(pool)
        .create(
            &user.id,
            &file_name,
            &content,
            Some(&analysis_json),
            Some(analysis.score as i64),
        )
        .await
    {
        error!("Failed to store resume {}: {:#}", file_name, e);
        return Err(ApiError::internal());
    }

    info!(
        "Analyzed resume {} ({} bytes), score {}",
        file_name, file_size, analysis.score
    );

    Ok(Json(UploadResponse {
        success: true,
        message: "Resume uploaded and analyzed".to_string(),
        file_name,
        file_size,
        analysis,
    }))
}

pub async fn list_resumes_handler(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ResumeListResponse> {
    let pool = acquire_pool(db_config)?;
    let user = request_user(pool, config).await?;

    let resumes = match ResumeRepository::new(pool).list_for_user(&user.id).await {
        Ok(resumes) => resumes,
        Err(e) => {
            error!("Failed to list resumes: {:#}", e);
            return Err(ApiError::internal());
        }
    };

    let summaries = resumes
        .into_iter()
        .map(|resume| ResumeSummary {
            id: resume.id,
            name: resume.name,
            upload_date: format_upload_date(resume.created_at),
            size: resume.content.len() as i64,
            status: if resume.analysis.is_some() {
                "analyzed".to_string()
            } else {
                "pending".to_string()
            },
        })
        .collect();

    Ok(Json(ResumeListResponse {
        success: true,
        resumes: summaries,
    }))
}
