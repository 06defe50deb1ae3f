// src/jobs/mod.rs
//! Job data providers. The core never embeds a job catalog; listings come
//! from whichever provider the deployment wires in.

use crate::database::Job;
use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

pub mod http_provider;
pub mod static_provider;

pub use http_provider::HttpJobProvider;
pub use static_provider::StaticJobProvider;

/// Search parameters accepted by the listing endpoint
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub search_term: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub is_remote: Option<bool>,
}

/// Capability interface over an external job source
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Look up a single posting; `None` when the source does not know it
    async fn fetch_job(&self, id: &str) -> Result<Option<Job>>;

    /// Run a search against the source
    async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<Job>>;
}

/// Choose a provider from the environment: an HTTP provider when
/// `JOB_API_URL` is set, otherwise an empty in-memory one.
pub fn provider_from_env() -> Result<Box<dyn JobProvider>> {
    match std::env::var("JOB_API_URL") {
        Ok(base_url) => Ok(Box::new(HttpJobProvider::new(base_url)?)),
        Err(_) => {
            warn!("JOB_API_URL not set; job searches will return no results");
            Ok(Box::new(StaticJobProvider::empty()))
        }
    }
}
