// src/database.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

// ===== Persisted Models =====

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resume {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub content: String,
    pub analysis: Option<String>,
    pub score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: Option<i64>,
    pub job_type: Option<String>,
    pub posted_date: Option<String>,
    pub site: Option<String>,
    pub url: Option<String>,
    #[serde(default = "default_now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobSearch {
    pub id: String,
    pub user_id: String,
    pub search_term: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: Option<bool>,
    pub results_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobMatch {
    pub id: String,
    pub user_id: String,
    pub resume_id: String,
    pub job_id: String,
    pub overall_score: i64,
    pub skill_score: Option<i64>,
    pub experience_score: Option<i64>,
    pub education_score: Option<i64>,
    pub language_score: Option<i64>,
    pub match_reasons: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CoverLetter {
    pub id: String,
    pub user_id: String,
    pub job_id: Option<String>,
    pub resume_id: Option<String>,
    pub template_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub resume_id: String,
    pub cover_letter_id: Option<String>,
    pub status: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle states of a submitted application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "accepted" => Ok(ApplicationStatus::Accepted),
            other => anyhow::bail!("Unknown application status: {}", other),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Connection & Schema Management =====

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!(
            "Database connection pool initialized: {}",
            self.database_path.display()
        );
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Check whether the schema has been created, using the user table as
    /// sentinel. A lookup failure propagates instead of reading as "absent"
    /// so an unreachable store is never mistaken for a fresh one.
    pub async fn tables_exist(&self) -> Result<bool> {
        let pool = self.pool()?;

        let sentinel: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_optional(pool)
        .await
        .context("Failed to inspect database catalog")?;

        Ok(sentinel.is_some())
    }

    /// Create all tables if the schema is absent. Safe to call repeatedly;
    /// the second call is a no-op. Failures are logged and surfaced as
    /// `false`, leaving the caller to decide whether startup continues.
    pub async fn initialize(&self) -> bool {
        match self.tables_exist().await {
            Ok(true) => {
                info!("Database tables already exist");
                true
            }
            Ok(false) => match self.create_tables().await {
                Ok(()) => {
                    info!("Database tables created successfully");
                    true
                }
                Err(e) => {
                    error!("Failed to create database tables: {:#}", e);
                    false
                }
            },
            Err(e) => {
                error!("Failed to check database tables: {:#}", e);
                false
            }
        }
    }

    /// Create the seven tables in foreign-key dependency order:
    /// users -> (resumes, job_searches, jobs) -> (job_matches, cover_letters)
    /// -> applications.
    async fn create_tables(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                analysis TEXT,
                score INTEGER,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_searches (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                search_term TEXT NOT NULL,
                location TEXT,
                job_type TEXT,
                is_remote BOOLEAN,
                results_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (user_id) REFERENCES users(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                description TEXT NOT NULL,
                salary INTEGER,
                job_type TEXT,
                posted_date TEXT,
                site TEXT,
                url TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS job_matches (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                resume_id TEXT NOT NULL,
                job_id TEXT NOT NULL,
                overall_score INTEGER NOT NULL,
                skill_score INTEGER,
                experience_score INTEGER,
                education_score INTEGER,
                language_score INTEGER,
                match_reasons TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (resume_id) REFERENCES resumes(id),
                FOREIGN KEY (job_id) REFERENCES jobs(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cover_letters (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                job_id TEXT,
                resume_id TEXT,
                template_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (job_id) REFERENCES jobs(id),
                FOREIGN KEY (resume_id) REFERENCES resumes(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                job_id TEXT NOT NULL,
                resume_id TEXT NOT NULL,
                cover_letter_id TEXT,
                status TEXT NOT NULL,
                response TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (job_id) REFERENCES jobs(id),
                FOREIGN KEY (resume_id) REFERENCES resumes(id),
                FOREIGN KEY (cover_letter_id) REFERENCES cover_letters(id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

// ===== User Repository =====

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn create(&self, email: &str, name: &str) -> Result<User> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(name)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Created user {} for email: {}", id, email);
        Ok(User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Fetch the user for an email, creating it on first sight
    pub async fn get_or_create(&self, email: &str, name: &str) -> Result<User> {
        if let Some(user) = self.find_by_email(email).await? {
            return Ok(user);
        }
        self.create(email, name).await
    }
}

// ===== Resume Repository =====

pub struct ResumeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ResumeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
        analysis: Option<&str>,
        score: Option<i64>,
    ) -> Result<Resume> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO resumes (id, user_id, name, content, analysis, score, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(content)
        .bind(analysis)
        .bind(score)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Stored resume {} ({}) for user {}", id, name, user_id);
        Ok(Resume {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            analysis: analysis.map(str::to_string),
            score,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Resume>> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, user_id, name, content, analysis, score, created_at, updated_at
            FROM resumes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(resume)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Resume>> {
        let resumes = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, user_id, name, content, analysis, score, created_at, updated_at
            FROM resumes
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(resumes)
    }

    /// Replace analysis and score together. The score is derived from the
    /// analysis, so they are never written separately.
    pub async fn update_analysis(&self, id: &str, analysis: &str, score: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET analysis = ?, score = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(analysis)
        .bind(score)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ===== Job Repository =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a fetched job, updating the mutable columns when the posting
    /// was seen before
    pub async fn upsert(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, title, company, location, description, salary,
                              job_type, posted_date, site, url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                company = excluded.company,
                location = excluded.location,
                description = excluded.description,
                salary = excluded.salary,
                job_type = excluded.job_type,
                posted_date = excluded.posted_date,
                site = excluded.site,
                url = excluded.url
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(job.salary)
        .bind(&job.job_type)
        .bind(&job.posted_date)
        .bind(&job.site)
        .bind(&job.url)
        .bind(job.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, company, location, description, salary,
                   job_type, posted_date, site, url, created_at
            FROM jobs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, company, location, description, salary,
                   job_type, posted_date, site, url, created_at
            FROM jobs
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(jobs)
    }
}

// ===== Job Search Repository =====

pub struct JobSearchRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobSearchRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one row per executed search. The log is append-only.
    pub async fn record(
        &self,
        user_id: &str,
        search_term: &str,
        location: Option<&str>,
        job_type: Option<&str>,
        is_remote: Option<bool>,
        results_count: i64,
    ) -> Result<JobSearch> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO job_searches (id, user_id, search_term, location, job_type,
                                      is_remote, results_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(search_term)
        .bind(location)
        .bind(job_type)
        .bind(is_remote)
        .bind(results_count)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(JobSearch {
            id,
            user_id: user_id.to_string(),
            search_term: search_term.to_string(),
            location: location.map(str::to_string),
            job_type: job_type.map(str::to_string),
            is_remote,
            results_count,
            created_at: now,
        })
    }

    pub async fn recent_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<JobSearch>> {
        let searches = sqlx::query_as::<_, JobSearch>(
            r#"
            SELECT id, user_id, search_term, location, job_type, is_remote,
                   results_count, created_at
            FROM job_searches
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(searches)
    }
}

// ===== Job Match Repository =====

pub struct JobMatchRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobMatchRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, job_match: &JobMatch) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_matches (id, user_id, resume_id, job_id, overall_score,
                                     skill_score, experience_score, education_score,
                                     language_score, match_reasons, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job_match.id)
        .bind(&job_match.user_id)
        .bind(&job_match.resume_id)
        .bind(&job_match.job_id)
        .bind(job_match.overall_score)
        .bind(job_match.skill_score)
        .bind(job_match.experience_score)
        .bind(job_match.education_score)
        .bind(job_match.language_score)
        .bind(&job_match.match_reasons)
        .bind(job_match.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<JobMatch>> {
        let matches = sqlx::query_as::<_, JobMatch>(
            r#"
            SELECT id, user_id, resume_id, job_id, overall_score, skill_score,
                   experience_score, education_score, language_score,
                   match_reasons, created_at
            FROM job_matches
            WHERE user_id = ?
            ORDER BY overall_score DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }
}

// ===== Cover Letter Repository =====

pub struct CoverLetterRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CoverLetterRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        job_id: Option<&str>,
        resume_id: Option<&str>,
        template_id: &str,
        content: &str,
    ) -> Result<CoverLetter> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO cover_letters (id, user_id, job_id, resume_id, template_id,
                                       content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(job_id)
        .bind(resume_id)
        .bind(template_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Generated cover letter {} for user {}", id, user_id);
        Ok(CoverLetter {
            id,
            user_id: user_id.to_string(),
            job_id: job_id.map(str::to_string),
            resume_id: resume_id.map(str::to_string),
            template_id: template_id.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<CoverLetter>> {
        let letter = sqlx::query_as::<_, CoverLetter>(
            r#"
            SELECT id, user_id, job_id, resume_id, template_id, content,
                   created_at, updated_at
            FROM cover_letters
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(letter)
    }

    /// Regeneration rewrites the letter body in place
    pub async fn update_content(&self, id: &str, template_id: &str, content: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cover_letters
            SET template_id = ?, content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(template_id)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ===== Application Repository =====

pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// New applications always enter as `submitted`
    pub async fn create(
        &self,
        user_id: &str,
        job_id: &str,
        resume_id: &str,
        cover_letter_id: Option<&str>,
    ) -> Result<Application> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let status = ApplicationStatus::Submitted;

        sqlx::query(
            r#"
            INSERT INTO applications (id, user_id, job_id, resume_id, cover_letter_id,
                                      status, response, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(job_id)
        .bind(resume_id)
        .bind(cover_letter_id)
        .bind(status.as_str())
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Recorded application {} for job {}", id, job_id);
        Ok(Application {
            id,
            user_id: user_id.to_string(),
            job_id: job_id.to_string(),
            resume_id: resume_id.to_string(),
            cover_letter_id: cover_letter_id.map(str::to_string),
            status: status.as_str().to_string(),
            response: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, user_id, job_id, resume_id, cover_letter_id, status,
                   response, created_at, updated_at
            FROM applications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(application)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, user_id, job_id, resume_id, cover_letter_id, status,
                   response, created_at, updated_at
            FROM applications
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(applications)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        response: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET status = ?, response = COALESCE(?, response), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(response)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Application {} moved to status {}", id, status);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> DatabaseConfig {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);

        // A single connection keeps every query on the same in-memory store
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        DatabaseConfig {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        }
    }

    fn sample_job(id: &str, title: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "Build things".to_string(),
            salary: Some(90_000),
            job_type: Some("fulltime".to_string()),
            posted_date: Some("2026-07-01".to_string()),
            site: Some("linkedin".to_string()),
            url: Some("https://example.com/job".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn initialize_creates_tables_once() {
        let db = memory_db().await;

        assert!(!db.tables_exist().await.unwrap());
        assert!(db.initialize().await);
        assert!(db.tables_exist().await.unwrap());

        // Second call is a no-op and still succeeds
        assert!(db.initialize().await);
        assert!(db.tables_exist().await.unwrap());
    }

    #[tokio::test]
    async fn resume_analysis_and_score_written_together() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let user = UserRepository::new(pool)
            .get_or_create("alice@example.com", "Alice")
            .await
            .unwrap();

        let resumes = ResumeRepository::new(pool);
        let resume = resumes
            .create(&user.id, "alice_resume.txt", "raw text", None, None)
            .await
            .unwrap();
        assert!(resume.analysis.is_none());
        assert!(resume.score.is_none());

        assert!(resumes
            .update_analysis(&resume.id, r#"{"score":42}"#, 42)
            .await
            .unwrap());

        let stored = resumes.find_by_id(&resume.id).await.unwrap().unwrap();
        assert_eq!(stored.score, Some(42));
        assert_eq!(stored.analysis.as_deref(), Some(r#"{"score":42}"#));
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let result = ResumeRepository::new(pool)
            .create("no-such-user", "orphan.txt", "text", None, None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn job_upsert_replaces_existing_row() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let jobs = JobRepository::new(pool);
        jobs.upsert(&sample_job("job-1", "Engineer")).await.unwrap();
        jobs.upsert(&sample_job("job-1", "Senior Engineer"))
            .await
            .unwrap();

        let listed = jobs.list_recent(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Senior Engineer");
    }

    #[tokio::test]
    async fn application_lifecycle() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let user = UserRepository::new(pool)
            .get_or_create("bob@example.com", "Bob")
            .await
            .unwrap();
        let resume = ResumeRepository::new(pool)
            .create(&user.id, "bob.txt", "text", None, None)
            .await
            .unwrap();
        JobRepository::new(pool)
            .upsert(&sample_job("job-2", "Backend Engineer"))
            .await
            .unwrap();

        let applications = ApplicationRepository::new(pool);
        let application = applications
            .create(&user.id, "job-2", &resume.id, None)
            .await
            .unwrap();
        assert_eq!(application.status, "submitted");

        assert!(applications
            .update_status(&application.id, ApplicationStatus::Accepted, Some("offer"))
            .await
            .unwrap());

        let stored = applications
            .find_by_id(&application.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, "accepted");
        assert_eq!(stored.response.as_deref(), Some("offer"));
    }

    #[tokio::test]
    async fn cover_letter_regeneration_updates_in_place() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let user = UserRepository::new(pool)
            .get_or_create("carol@example.com", "Carol")
            .await
            .unwrap();

        let letters = CoverLetterRepository::new(pool);
        let letter = letters
            .create(&user.id, None, None, "standard", "first draft")
            .await
            .unwrap();

        assert!(letters
            .update_content(&letter.id, "professional", "second draft")
            .await
            .unwrap());

        let stored = letters.find_by_id(&letter.id).await.unwrap().unwrap();
        assert_eq!(stored.id, letter.id);
        assert_eq!(stored.template_id, "professional");
        assert_eq!(stored.content, "second draft");
    }

    #[tokio::test]
    async fn job_search_log_appends() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let user = UserRepository::new(pool)
            .get_or_create("dave@example.com", "Dave")
            .await
            .unwrap();

        let searches = JobSearchRepository::new(pool);
        searches
            .record(&user.id, "rust", Some("Berlin"), None, Some(true), 7)
            .await
            .unwrap();
        searches
            .record(&user.id, "rust", Some("Berlin"), None, Some(true), 3)
            .await
            .unwrap();

        let recent = searches.recent_for_user(&user.id, 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|search| search.search_term == "rust"));
    }

    #[tokio::test]
    async fn job_match_records_are_listed_by_score() {
        let db = memory_db().await;
        assert!(db.initialize().await);
        let pool = db.pool().unwrap();

        let user = UserRepository::new(pool)
            .get_or_create("erin@example.com", "Erin")
            .await
            .unwrap();
        let resume = ResumeRepository::new(pool)
            .create(&user.id, "erin.txt", "text", None, None)
            .await
            .unwrap();
        JobRepository::new(pool)
            .upsert(&sample_job("job-3", "Engineer"))
            .await
            .unwrap();

        let matches = JobMatchRepository::new(pool);
        for (id, score) in [("m1", 55), ("m2", 80)] {
            matches
                .create(&JobMatch {
                    id: id.to_string(),
                    user_id: user.id.clone(),
                    resume_id: resume.id.clone(),
                    job_id: "job-3".to_string(),
                    overall_score: score,
                    skill_score: Some(score),
                    experience_score: None,
                    education_score: None,
                    language_score: None,
                    match_reasons: Some("skills overlap".to_string()),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let listed = matches.list_for_user(&user.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "m2");
        assert_eq!(listed[0].overall_score, 80);
    }

    #[test]
    fn application_status_round_trip() {
        for status in [
            ApplicationStatus::Submitted,
            ApplicationStatus::UnderReview,
            ApplicationStatus::Rejected,
            ApplicationStatus::Accepted,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }

        assert!("pending".parse::<ApplicationStatus>().is_err());
    }
}
