pub mod summary;
pub mod translation;

use std::time::Duration;

use crate::db::DbPool;
use crate::summarizer::SummarizerClient;

/// Timer intervals for the background jobs, seconds, from env.
#[derive(Debug, Clone, Copy)]
pub struct JobConfig {
    pub initiate_interval: Duration,
    pub fetch_interval: Duration,
    pub retry_interval: Duration,
    pub translate_interval: Duration,
}

impl JobConfig {
    pub fn from_env() -> JobConfig {
        JobConfig {
            initiate_interval: env_secs("INITIATE_SUMMARY_INTERVAL_SECS", 3600),
            fetch_interval: env_secs("FETCH_SUMMARY_RESULTS_INTERVAL_SECS", 3600),
            retry_interval: env_secs("RETRY_FAILED_SUMMARY_INTERVAL_SECS", 900),
            translate_interval: env_secs("AGENDA_TRANSLATION_INTERVAL_SECS", 900),
        }
    }
}

fn env_secs(name: &str, default: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

/// Spawn the four periodic reconciliation jobs. The jobs coordinate only
/// through persisted SummaryRequest state (the database-level
/// single-flight index), never through in-process flags, so they stay
/// correct across multiple process instances.
pub fn spawn_jobs(pool: DbPool, client: SummarizerClient, config: JobConfig) {
    {
        let pool = pool.clone();
        let client = client.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(config.initiate_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                log::info!("Running summary initiation job");
                summary::initiate_summary_generation(&pool, &client).await;
            }
        });
    }
    {
        let pool = pool.clone();
        let client = client.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(config.fetch_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                log::info!("Running summary result fetch job");
                summary::fetch_summary_results(&pool, &client).await;
            }
        });
    }
    {
        let pool = pool.clone();
        let client = client.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(config.retry_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                log::info!("Running summary retry job");
                summary::retry_failed_requests(&pool, &client).await;
            }
        });
    }
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(config.translate_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            log::info!("Running agenda translation job");
            translation::fill_missing_translations(&pool, &client).await;
        }
    });
}
