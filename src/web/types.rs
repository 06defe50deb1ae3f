// src/web/types.rs
use crate::analysis::ResumeAnalysis;
use crate::database::{Application, CoverLetter, Job, JobMatch};
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

/// Handler result carrying either a JSON payload or a status-coded error
/// body
pub type ApiResult<T> = Result<Json<T>, Custom<Json<ApiError>>>;

/// The error body shape shared by every endpoint: `{ "error": "..." }`
#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Custom<Json<ApiError>> {
        Custom(
            Status::BadRequest,
            Json(ApiError {
                error: message.to_string(),
            }),
        )
    }

    pub fn not_found(message: &str) -> Custom<Json<ApiError>> {
        Custom(
            Status::NotFound,
            Json(ApiError {
                error: message.to_string(),
            }),
        )
    }

    pub fn internal() -> Custom<Json<ApiError>> {
        Custom(
            Status::InternalServerError,
            Json(ApiError {
                error: "processing error".to_string(),
            }),
        )
    }
}

/// Identity and limits applied to every request while authentication stays
/// out of scope
pub struct ServerConfig {
    pub default_user_email: String,
    pub default_user_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_user_email: "local@jobscout.dev".to_string(),
            default_user_name: "Local User".to_string(),
        }
    }
}

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub resume: Option<TempFile<'f>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    pub analysis: ResumeAnalysis,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: String,
    pub size: i64,
    pub status: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeListResponse {
    pub success: bool,
    pub resumes: Vec<ResumeSummary>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<Job>,
    #[serde(rename = "resultsCount")]
    pub results_count: i64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobDetailResponse {
    pub success: bool,
    pub job: Job,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CoverLetterRequest {
    #[serde(rename = "templateId")]
    pub template_id: String,
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
    #[serde(rename = "resumeId")]
    pub resume_id: Option<String>,
    #[serde(rename = "coverLetterId")]
    pub cover_letter_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CoverLetterResponse {
    pub success: bool,
    #[serde(rename = "coverLetter")]
    pub cover_letter: CoverLetter,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct MatchListResponse {
    pub success: bool,
    pub matches: Vec<JobMatch>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ApplicationRequest {
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(rename = "resumeId")]
    pub resume_id: String,
    #[serde(rename = "coverLetterId")]
    pub cover_letter_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ApplicationStatusRequest {
    #[serde(rename = "applicationId")]
    pub application_id: String,
    pub status: String,
    pub response: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ApplicationResponse {
    pub success: bool,
    pub application: Application,
}
