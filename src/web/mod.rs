// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::database::DatabaseConfig;
use crate::jobs::{provider_from_env, JobProvider};
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::path::PathBuf;
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// API Routes

#[post("/resumes/upload", data = "<upload>")]
pub async fn upload_resume(
    upload: Form<ResumeUploadForm<'_>>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<UploadResponse> {
    handlers::upload_resume_handler(upload, config, db_config).await
}

#[get("/resumes")]
pub async fn list_resumes(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ResumeListResponse> {
    handlers::list_resumes_handler(config, db_config).await
}

#[get("/jobs?<search_term>&<location>&<job_type>&<is_remote>")]
pub async fn list_jobs(
    search_term: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    is_remote: Option<bool>,
    provider: &State<Box<dyn JobProvider>>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<JobListResponse> {
    handlers::list_jobs_handler(
        search_term,
        location,
        job_type,
        is_remote,
        provider,
        config,
        db_config,
    )
    .await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: String,
    provider: &State<Box<dyn JobProvider>>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<JobDetailResponse> {
    handlers::get_job_handler(id, provider, db_config).await
}

#[post("/cover-letters", data = "<request>")]
pub async fn generate_cover_letter(
    request: Json<CoverLetterRequest>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<CoverLetterResponse> {
    handlers::generate_cover_letter_handler(request, config, db_config).await
}

#[get("/matches")]
pub async fn list_matches(
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<MatchListResponse> {
    handlers::list_matches_handler(config, db_config).await
}

#[post("/applications", data = "<request>")]
pub async fn submit_application(
    request: Json<ApplicationRequest>,
    config: &State<ServerConfig>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ApplicationResponse> {
    handlers::submit_application_handler(request, config, db_config).await
}

#[post("/applications/status", data = "<request>")]
pub async fn update_application_status(
    request: Json<ApplicationStatusRequest>,
    db_config: &State<DatabaseConfig>,
) -> ApiResult<ApplicationResponse> {
    handlers::update_application_status_handler(request, db_config).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<ApiError> {
    Json(ApiError {
        error: "invalid request format".to_string(),
    })
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ApiError> {
    Json(ApiError {
        error: "not found".to_string(),
    })
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ApiError> {
    Json(ApiError {
        error: "invalid request format".to_string(),
    })
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ApiError> {
    Json(ApiError {
        error: "processing error".to_string(),
    })
}

/// Assemble the Rocket instance; extracted from [`start_web_server`] so the
/// test suite can drive the same routes against its own state
pub fn build_rocket(
    server_config: ServerConfig,
    db_config: DatabaseConfig,
    provider: Box<dyn JobProvider>,
) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(server_config)
        .manage(db_config)
        .manage(provider)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                upload_resume,
                list_resumes,
                list_jobs,
                get_job,
                generate_cover_letter,
                list_matches,
                submit_application,
                update_application_status,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(database_path: PathBuf, port: u16) -> Result<()> {
    let mut db_config = DatabaseConfig::new(database_path);

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {:#}", e);
        return Err(e);
    }

    // Initialization failure is surfaced as a boolean; startup treats it as
    // fatal
    if !db_config.initialize().await {
        anyhow::bail!("Database schema initialization failed");
    }

    let provider = provider_from_env()?;

    info!("Starting job-search assistant API server");
    info!("Database: {}", db_config.database_path.display());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    build_rocket(ServerConfig::default(), db_config, provider)
        .configure(figment)
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Job;
    use crate::jobs::StaticJobProvider;
    use chrono::Utc;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::Value;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    const BOUNDARY: &str = "jobscout-test-boundary";

    fn seed_job(id: &str, title: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: "Initech".to_string(),
            location: "Remote".to_string(),
            description: format!("{} position", title),
            salary: Some(120_000),
            job_type: Some("fulltime".to_string()),
            posted_date: Some("2026-07-15".to_string()),
            site: Some("static".to_string()),
            url: None,
            created_at: Utc::now(),
        }
    }

    async fn test_client() -> Client {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        let db_config = DatabaseConfig {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        };
        assert!(db_config.initialize().await);

        let provider = StaticJobProvider::new(vec![
            seed_job("job-rust", "Rust Engineer"),
            seed_job("job-data", "Data Scientist"),
        ]);

        let rocket = build_rocket(ServerConfig::default(), db_config, Box::new(provider));
        Client::tracked(rocket).await.expect("valid rocket instance")
    }

    fn multipart_content_type() -> ContentType {
        ContentType::parse_flexible(&format!("multipart/form-data; boundary={}", BOUNDARY))
            .unwrap()
    }

    fn resume_upload_body(file_name: &str, content: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"resume\"; \
             filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            c = content
        )
    }

    fn body_without_file() -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
            b = BOUNDARY
        )
    }

    #[rocket::async_test]
    async fn health_endpoint_responds() {
        let client = test_client().await;

        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.unwrap(), "\"OK\"");
    }

    #[rocket::async_test]
    async fn upload_without_file_is_a_client_error() {
        let client = test_client().await;

        let response = client
            .post("/api/resumes/upload")
            .header(multipart_content_type())
            .body(body_without_file())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "no file provided");
    }

    #[rocket::async_test]
    async fn upload_analyzes_and_persists_resume() {
        let client = test_client().await;

        let response = client
            .post("/api/resumes/upload")
            .header(multipart_content_type())
            .body(resume_upload_body(
                "dev_resume.txt",
                "Python SQL 团队协作 大学 工作 提高50%",
            ))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["fileName"], "dev_resume.txt");
        // 2 technical * 3 + 1 soft * 2 + education + experience
        assert_eq!(body["analysis"]["score"], 68);

        let response = client.get("/api/resumes").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let resumes = body["resumes"].as_array().unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0]["name"], "dev_resume.txt");
        assert_eq!(resumes[0]["status"], "analyzed");
    }

    #[rocket::async_test]
    async fn job_search_logs_and_detail_falls_back_to_store() {
        let client = test_client().await;

        let response = client
            .get("/api/jobs?search_term=rust")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["resultsCount"], 1);
        assert_eq!(body["jobs"][0]["id"], "job-rust");

        let response = client.get("/api/jobs/job-rust").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["job"]["title"], "Rust Engineer");

        let response = client.get("/api/jobs/no-such-job").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "job not found");
    }

    #[rocket::async_test]
    async fn cover_letter_generation_and_regeneration() {
        let client = test_client().await;

        // Ingest the posting so the letter can reference it
        client.get("/api/jobs?search_term=rust").dispatch().await;

        let response = client
            .post("/api/cover-letters")
            .header(ContentType::JSON)
            .body(r#"{"templateId": "standard", "jobId": "job-rust"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let letter_id = body["coverLetter"]["id"].as_str().unwrap().to_string();
        assert!(body["coverLetter"]["content"]
            .as_str()
            .unwrap()
            .contains("Rust Engineer"));

        let response = client
            .post("/api/cover-letters")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"templateId": "technical", "jobId": "job-rust", "coverLetterId": "{}"}}"#,
                letter_id
            ))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["coverLetter"]["id"], letter_id.as_str());
        assert_eq!(body["coverLetter"]["template_id"], "technical");

        let response = client
            .post("/api/cover-letters")
            .header(ContentType::JSON)
            .body(r#"{"templateId": "poetic"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn application_submission_and_status_updates() {
        let client = test_client().await;

        client.get("/api/jobs?search_term=rust").dispatch().await;
        client
            .post("/api/resumes/upload")
            .header(multipart_content_type())
            .body(resume_upload_body("r.txt", "Python 工作"))
            .dispatch()
            .await;

        let body: Value = client
            .get("/api/resumes")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        let resume_id = body["resumes"][0]["id"].as_str().unwrap().to_string();

        let response = client
            .post("/api/applications")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"jobId": "job-rust", "resumeId": "{}"}}"#,
                resume_id
            ))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["application"]["status"], "submitted");
        let application_id = body["application"]["id"].as_str().unwrap().to_string();

        // Unknown status values are rejected before any write
        let response = client
            .post("/api/applications/status")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"applicationId": "{}", "status": "ghosted"}}"#,
                application_id
            ))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .post("/api/applications/status")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"applicationId": "{}", "status": "under_review"}}"#,
                application_id
            ))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["application"]["status"], "under_review");

        // Applications against unknown jobs are rejected
        let response = client
            .post("/api/applications")
            .header(ContentType::JSON)
            .body(format!(
                r#"{{"jobId": "nope", "resumeId": "{}"}}"#,
                resume_id
            ))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn match_listing_starts_empty() {
        let client = test_client().await;

        let response = client.get("/api/matches").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["matches"].as_array().unwrap().len(), 0);
    }
}
