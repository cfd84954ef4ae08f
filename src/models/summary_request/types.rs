use serde::{Deserialize, Serialize};

/// Bound on retry attempts for a failed summary request; once reached the
/// request is terminally FAILED and needs manual intervention.
pub const MAX_RETRIES: i64 = 3;

/// Status of an outstanding call to the external summarization service.
///
/// `PROCESSING -> {COMPLETED, FAILED}`; `FAILED -> PROCESSING` via retry
/// while under the retry cap. Nothing leaves COMPLETED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Processing => "PROCESSING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<RequestStatus> {
        match s {
            "PENDING" => Some(RequestStatus::Pending),
            "PROCESSING" => Some(RequestStatus::Processing),
            "COMPLETED" => Some(RequestStatus::Completed),
            "FAILED" => Some(RequestStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Create,
    Update,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Create => "CREATE",
            RequestType::Update => "UPDATE",
        }
    }

    pub fn parse(s: &str) -> Option<RequestType> {
        match s {
            "CREATE" => Some(RequestType::Create),
            "UPDATE" => Some(RequestType::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub id: i64,
    /// Correlation id assigned by the external service.
    pub request_id: String,
    pub panchayat_id: i64,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub status_url: String,
    pub result_url: String,
    pub retry_count: i64,
    pub last_error: Option<String>,
    pub last_retry_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct NewSummaryRequest {
    pub request_id: String,
    pub panchayat_id: i64,
    pub request_type: RequestType,
    pub status_url: String,
    pub result_url: String,
}
