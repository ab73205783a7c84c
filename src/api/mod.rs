//! REST client for the league backend.
//!
//! One shared [`ApiClient`] (base URL + timeout) plays the role of a response
//! interceptor: successful payloads are unwrapped (a top-level `data` member is
//! lifted out), failures are categorized into [`ApiError`] and shown to the user
//! through the notifier before the error is handed back to the caller.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::AppConfig,
    notify::{Notification, NotificationKind, NotifierState},
};

pub mod match_stats;
pub mod schedule;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error or server not responding";
pub const CONFIGURATION_ERROR_MESSAGE: &str = "Request configuration error";

/// ApiError
///
/// The three failure categories a caller can observe.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server responded with an error status (or an unreadable payload).
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The request was sent but no response arrived (refused, reset, timed out).
    #[error("Network error or server not responding")]
    Network { detail: String },
    /// The request could not be built (bad base URL, bad client settings).
    #[error("Request configuration error")]
    Configuration { detail: String },
}

impl ApiError {
    pub fn kind(&self) -> NotificationKind {
        match self {
            ApiError::Server { .. } => NotificationKind::Server,
            ApiError::Network { .. } => NotificationKind::Network,
            ApiError::Configuration { .. } => NotificationKind::Configuration,
        }
    }

    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::Configuration {
                detail: e.to_string(),
            }
        } else {
            ApiError::Network {
                detail: e.to_string(),
            }
        }
    }
}

/// ApiClient
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    notifier: NotifierState,
}

impl ApiClient {
    pub fn new(config: &AppConfig, notifier: NotifierState) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Configuration {
                detail: e.to_string(),
            })?;

        tracing::info!(base_url = %config.api_base, "api client ready");

        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            notifier,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send("GET", path, request).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        self.send("POST", path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        match self.execute(request).await {
            Ok(payload) => {
                tracing::debug!(method, path, "api request succeeded");
                Ok(payload)
            }
            Err(error) => {
                tracing::error!(method, path, error = ?error, "api request failed");
                self.notifier
                    .alert(Notification::new(error.kind(), error.to_string()))
                    .await;
                Err(error)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "api response");
        let body = response.bytes().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let payload: Value = serde_json::from_slice(&body).map_err(|e| ApiError::Server {
            status: status.as_u16(),
            message: format!("Malformed response payload: {e}"),
        })?;

        serde_json::from_value(unwrap_payload(payload)).map_err(|e| ApiError::Server {
            status: status.as_u16(),
            message: format!("Unexpected response payload: {e}"),
        })
    }
}

/// Lifts `{"data": ...}` envelopes; other payloads pass through untouched.
pub fn unwrap_payload(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.get("data").is_some_and(|data| !data.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Prefers a non-empty string (or non-zero number) `error` member; anything else gets
/// the generic status message.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_payload = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|payload| match payload.get("error") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            Some(Value::Number(code)) if code.as_f64().is_some_and(|n| n != 0.0) => {
                Some(code.to_string())
            }
            _ => None,
        });

    from_payload.unwrap_or_else(|| format!("Request failed ({})", status.as_u16()))
}
