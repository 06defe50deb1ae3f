// src/jobs/http_provider.rs
use super::{JobProvider, JobQuery};
use crate::database::Job;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

const JOBS_ENDPOINT: &str = "/jobs";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider backed by an external job-listing API
pub struct HttpJobProvider {
    client: Client,
    base_url: String,
}

/// Posting shape returned by the remote API; missing fields get neutral
/// defaults when mapped into [`Job`]
#[derive(Debug, Deserialize)]
struct RemoteJob {
    id: Option<String>,
    title: String,
    company: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    salary: Option<i64>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    posted_date: Option<String>,
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteSearchResponse {
    jobs: Vec<RemoteJob>,
}

impl HttpJobProvider {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

}

impl From<RemoteJob> for Job {
    fn from(remote: RemoteJob) -> Self {
        Job {
            id: remote.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: remote.title,
            company: remote.company,
            location: remote.location.unwrap_or_default(),
            description: remote.description.unwrap_or_default(),
            salary: remote.salary,
            job_type: remote.job_type,
            posted_date: remote.posted_date,
            site: remote.site,
            url: remote.url,
            created_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl JobProvider for HttpJobProvider {
    async fn fetch_job(&self, id: &str) -> Result<Option<Job>> {
        let url = format!("{}{}/{}", self.base_url, JOBS_ENDPOINT, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach job API")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Job API error {} for {}: {}", status, url, body);
            anyhow::bail!("Job API returned error status: {}", status);
        }

        let remote: RemoteJob = response
            .json()
            .await
            .context("Failed to parse job API response")?;

        Ok(Some(remote.into()))
    }

    async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        let url = format!("{}{}", self.base_url, JOBS_ENDPOINT);

        let mut params: Vec<(&str, String)> =
            vec![("search_term", query.search_term.clone())];
        if let Some(location) = &query.location {
            params.push(("location", location.clone()));
        }
        if let Some(job_type) = &query.job_type {
            params.push(("job_type", job_type.clone()));
        }
        if let Some(is_remote) = query.is_remote {
            params.push(("is_remote", is_remote.to_string()));
        }

        info!("Searching job API for: {}", query.search_term);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("Failed to reach job API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Job API error {} for {}: {}", status, url, body);
            anyhow::bail!("Job API returned error status: {}", status);
        }

        let payload: RemoteSearchResponse = response
            .json()
            .await
            .context("Failed to parse job API response")?;

        Ok(payload.jobs.into_iter().map(Job::from).collect())
    }
}
