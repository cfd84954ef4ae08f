use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::*;
use crate::errors::AppError;
use crate::models::issue::Issue;

const TRANSLATION_POLL_ATTEMPTS: u32 = 10;
const TRANSLATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Client for the external summarization/translation backend.
#[derive(Clone)]
pub struct SummarizerClient {
    http: reqwest::Client,
    base_url: String,
}

impl SummarizerClient {
    pub fn new(base_url: impl Into<String>) -> SummarizerClient {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        SummarizerClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> SummarizerClient {
        let base_url =
            std::env::var("SUMMARIZER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        SummarizerClient::new(base_url)
    }

    /// Status/result URLs come back as paths relative to the service root.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AppError> {
        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "summarizer returned HTTP {}",
                resp.status()
            )));
        }
        Ok(resp.json::<T>().await?)
    }

    /// Kick off agenda generation from scratch for a batch of issues.
    pub async fn initiate_new_summary(
        &self,
        issues: &[Issue],
        language: &str,
    ) -> Result<InitiateResponse, AppError> {
        let payload = GeneratePayload {
            issues: issues.iter().map(SummaryIssue::from_issue).collect(),
        };
        let resp = self
            .http
            .post(self.url(&format!("/agenda/generate/{language}")))
            .json(&payload)
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    /// Kick off an update of an existing system-generated agenda.
    pub async fn initiate_update_summary(
        &self,
        current_agenda: &[CurrentAgendaItem],
        new_issues: &[Issue],
        language: &str,
    ) -> Result<InitiateResponse, AppError> {
        let payload = UpdatePayload {
            current_agenda: current_agenda.to_vec(),
            new_issues: new_issues.iter().map(SummaryIssue::from_issue).collect(),
        };
        let resp = self
            .http
            .post(self.url(&format!("/agenda/update/{language}")))
            .json(&payload)
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    pub async fn check_status(&self, status_url: &str) -> Result<StatusResponse, AppError> {
        let resp = self.http.get(self.url(status_url)).send().await?;
        Self::parse_json(resp).await
    }

    pub async fn fetch_result(&self, result_url: &str) -> Result<SummaryResultPayload, AppError> {
        let resp = self.http.get(self.url(result_url)).send().await?;
        Self::parse_json(resp).await
    }

    /// Submit one text for translation and poll for the result. Returns
    /// an empty string when the service yields nothing in time; callers
    /// treat that as "no translation yet".
    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, AppError> {
        let resp = self
            .http
            .post(self.url("/translate"))
            .json(&TranslateRequest {
                text,
                target_language,
            })
            .send()
            .await?;
        let accepted: TranslateResponse = Self::parse_json(resp).await?;
        let Some(result_url) = accepted.result_url else {
            return Ok(String::new());
        };

        for _ in 0..TRANSLATION_POLL_ATTEMPTS {
            let resp = self.http.get(self.url(&result_url)).send().await?;
            let result: TranslationResult = Self::parse_json(resp).await?;
            if let Some(text) = result.translated_text {
                return Ok(text);
            }
            tokio::time::sleep(TRANSLATION_POLL_INTERVAL).await;
        }
        Ok(String::new())
    }
}
