//! JSON client for the logbook REST API.
//!
//! Every response body is wrapped as `{errorCode, errorMessage?, payload}`;
//! a non-zero `errorCode` is a server-side failure even on HTTP 200.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("resource not found")]
    NotFound,

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("server error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    fn should_retry(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    error_code: i64,
    #[serde(default)]
    error_message: Option<String>,
    payload: Option<T>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        let base = Url::parse(&normalize_base_url(&config.base_url))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        Ok(Self {
            http,
            base,
            retry_attempts: config.retry_attempts,
            retry_backoff: config.retry_backoff,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// GET with retries on transport failures and 5xx.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        let path = segments.join("/");
        self.retry("GET", &path, || {
            let request = self.http.get(url.clone()).query(query);
            async move {
                let body = self.send(request).await?;
                decode_payload(&body)
            }
        })
        .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(body).map_err(encode_err)?;
        self.call(Method::POST, segments, &[], Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(body).map_err(encode_err)?;
        self.call(Method::PUT, segments, &[], Some(body)).await
    }

    pub async fn delete(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<(), ApiError> {
        self.call(Method::DELETE, segments, query, None).await
    }

    /// Non-idempotent calls are sent once.
    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        let path = segments.join("/");
        let mut request = self.http.request(method.clone(), self.url(segments)?).query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let body = self.send(request).await.inspect_err(|e| {
            error!(%method, %path, error = %e, "request failed");
        })?;
        check_envelope(&body)
    }

    /// Appends each segment percent-encoded, so ids cannot add path levels
    /// or a query. `.` and `..` are rejected.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.base)))?;
            path.pop_if_empty();
            for segment in segments {
                if segment.is_empty() || *segment == "." || *segment == ".." {
                    return Err(ApiError::InvalidUrl(format!(
                        "invalid path segment {segment:?}"
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            s => Err(ApiError::Status {
                status: s.as_u16(),
                message: error_message(&body).unwrap_or(body),
            }),
        }
    }

    async fn retry<F, Fut, T>(&self, op: &str, path: &str, mut action: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match action().await {
                Ok(val) => return Ok(val),
                Err(err) if attempt < self.retry_attempts && err.should_retry() => {
                    attempt += 1;
                    let backoff = self.retry_backoff * attempt;
                    warn!(op, path, attempt, error = %err, ?backoff, "request failed, retrying");
                    sleep(backoff).await;
                }
                Err(err) => {
                    error!(op, path, attempts = attempt + 1, error = %err, "request failed");
                    return Err(err);
                }
            }
        }
    }
}

/// Ensures the base URL ends with `/` so relative paths join under it.
fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn encode_err(err: serde_json::Error) -> ApiError {
    ApiError::Decode(format!("failed to encode request body: {err}"))
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope<IgnoredAny>>(body)
        .ok()
        .and_then(|e| e.error_message)
}

fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if envelope.error_code != 0 {
        return Err(ApiError::Server {
            code: envelope.error_code,
            message: envelope.error_message.unwrap_or_default(),
        });
    }
    envelope
        .payload
        .ok_or_else(|| ApiError::Decode("missing payload".into()))
}

fn check_envelope(body: &str) -> Result<(), ApiError> {
    if body.trim().is_empty() {
        return Ok(());
    }
    let envelope: Envelope<IgnoredAny> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if envelope.error_code != 0 {
        return Err(ApiError::Server {
            code: envelope.error_code,
            message: envelope.error_message.unwrap_or_default(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(normalize_base_url("http://host/api"), "http://host/api/");
        assert_eq!(normalize_base_url("http://host/api/"), "http://host/api/");
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiClientConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(1),
            retry_attempts: 0,
            retry_backoff: Duration::from_millis(1),
        })
        .unwrap()
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let client = client("http://host/api");
        let url = client.url(&["v1", "entries", "E1/attachments?x=1#top"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://host/api/v1/entries/E1%2Fattachments%3Fx=1%23top"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn dot_segments_are_rejected() {
        let client = client("http://host/api/");
        assert!(matches!(
            client.url(&["v1", "entries", ".."]),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            client.url(&["v1", "entries", ""]),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn non_zero_error_code_is_a_server_error() {
        let err = decode_payload::<Vec<u32>>(
            r#"{"errorCode":-1,"errorMessage":"logbook locked","payload":null}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                code: -1,
                message: "logbook locked".into()
            }
        );
    }

    #[test]
    fn payload_is_unwrapped() {
        let value: Vec<u32> = decode_payload(r#"{"errorCode":0,"payload":[1,2]}"#).unwrap();
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn only_transient_failures_retry() {
        assert!(ApiError::Timeout.should_retry());
        assert!(ApiError::Status {
            status: 503,
            message: String::new()
        }
        .should_retry());
        assert!(!ApiError::NotFound.should_retry());
        assert!(!ApiError::Decode("x".into()).should_retry());
    }
}
