// src/jobs/static_provider.rs
use super::{JobProvider, JobQuery};
use crate::database::Job;
use anyhow::Result;
use async_trait::async_trait;

/// In-memory provider for tests and deployments without an external job
/// API. Holds a fixed set of postings and answers queries by substring
/// filtering.
pub struct StaticJobProvider {
    jobs: Vec<Job>,
}

impl StaticJobProvider {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    pub fn empty() -> Self {
        Self { jobs: Vec::new() }
    }

    fn matches(job: &Job, query: &JobQuery) -> bool {
        let term = query.search_term.to_lowercase();
        if !term.is_empty() {
            let haystack = format!(
                "{} {} {}",
                job.title.to_lowercase(),
                job.company.to_lowercase(),
                job.description.to_lowercase()
            );
            if !haystack.contains(&term) {
                return false;
            }
        }

        if let Some(location) = &query.location {
            if !job
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(job_type) = &query.job_type {
            if job.job_type.as_deref() != Some(job_type.as_str()) {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl JobProvider for StaticJobProvider {
    async fn fetch_job(&self, id: &str) -> Result<Option<Job>> {
        Ok(self.jobs.iter().find(|job| job.id == id).cloned())
    }

    async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        Ok(self
            .jobs
            .iter()
            .filter(|job| Self::matches(job, query))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(id: &str, title: &str, location: &str, job_type: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: location.to_string(),
            description: format!("{} role", title),
            salary: None,
            job_type: Some(job_type.to_string()),
            posted_date: None,
            site: Some("static".to_string()),
            url: None,
            created_at: Utc::now(),
        }
    }

    fn provider() -> StaticJobProvider {
        StaticJobProvider::new(vec![
            job("j1", "Rust Engineer", "Berlin", "fulltime"),
            job("j2", "Data Scientist", "Remote", "contract"),
            job("j3", "Rust Intern", "Berlin", "internship"),
        ])
    }

    #[tokio::test]
    async fn fetch_job_by_id() {
        let provider = provider();

        let found = provider.fetch_job("j2").await.unwrap();
        assert_eq!(found.unwrap().title, "Data Scientist");

        assert!(provider.fetch_job("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_filters_by_term_and_type() {
        let provider = provider();

        let query = JobQuery {
            search_term: "rust".to_string(),
            ..JobQuery::default()
        };
        let rust_jobs = provider.search_jobs(&query).await.unwrap();
        assert_eq!(rust_jobs.len(), 2);

        let query = JobQuery {
            search_term: "rust".to_string(),
            job_type: Some("internship".to_string()),
            ..JobQuery::default()
        };
        let interns = provider.search_jobs(&query).await.unwrap();
        assert_eq!(interns.len(), 1);
        assert_eq!(interns[0].id, "j3");
    }

    #[tokio::test]
    async fn search_filters_by_location() {
        let provider = provider();

        let query = JobQuery {
            search_term: String::new(),
            location: Some("berlin".to_string()),
            ..JobQuery::default()
        };
        let berlin = provider.search_jobs(&query).await.unwrap();
        assert_eq!(berlin.len(), 2);
    }
}
