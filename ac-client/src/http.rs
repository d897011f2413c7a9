//! HTTP transport for the reporting backend
//!
//! Builds requests (base URL, bearer header, JSON bodies) and unwraps the
//! `{status, message, data}` envelope. No retries: a failed request is a
//! single terminal error.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::response::{ApiResponse, ResponseStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SharedSession;

/// Network HTTP client bound to one backend and one session
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: SharedSession) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("server base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            session,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request without credentials (login only)
    pub(crate) fn public(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "request");
        self.client.request(method, self.url(path))
    }

    /// Request carrying `Authorization: Bearer <token>`.
    ///
    /// Fails with [`ClientError::NotAuthenticated`] before any I/O when the
    /// session holds no token.
    pub(crate) fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.public(method, path).bearer_auth(token))
    }

    /// Send and parse the envelope.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await?;
        let http_status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&text) {
            Ok(envelope) => {
                tracing::debug!(%http_status, status = %envelope.status, "response");
                Ok(envelope)
            }
            Err(_) if http_status == StatusCode::UNAUTHORIZED => {
                Err(ClientError::Unauthorized("Unauthorized".into()))
            }
            Err(e) => {
                tracing::warn!(%http_status, error = %e, "unexpected response shape");
                Err(ClientError::InvalidResponse(format!(
                    "HTTP {}: {}",
                    http_status, e
                )))
            }
        }
    }

    /// Send a request whose success is judged by the HTTP status.
    ///
    /// A 2xx with a failing envelope is still an error; a 2xx with an empty
    /// or non-envelope body is success.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await?;
        let http_status = response.status();
        let text = response.text().await?;
        let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text).ok();
        tracing::debug!(
            %http_status,
            status = ?envelope.as_ref().map(|e| e.status.as_str()),
            "response"
        );

        match envelope {
            Some(env) if !(http_status.is_success() && env.status.is_success()) => {
                Err(envelope_error(env))
            }
            Some(_) => Ok(()),
            None if http_status.is_success() => Ok(()),
            None if http_status == StatusCode::UNAUTHORIZED => {
                Err(ClientError::Unauthorized("Unauthorized".into()))
            }
            None => Err(ClientError::Api {
                status: http_status.as_u16().to_string(),
                message: format!("Request failed with HTTP {}", http_status),
            }),
        }
    }
}

/// Error for an envelope whose status is not a success
pub(crate) fn envelope_error<T>(envelope: ApiResponse<T>) -> ClientError {
    let message = envelope.message_or("Unknown error").to_string();
    match envelope.status {
        ResponseStatus::Unauthorized => ClientError::Unauthorized(message),
        status => ClientError::Api {
            status: status.to_string(),
            message,
        },
    }
}

/// Accept the envelope if its status is one of `accepted`, return its data.
pub(crate) fn accept<T>(
    envelope: ApiResponse<T>,
    accepted: &[ResponseStatus],
) -> ClientResult<Option<T>> {
    if accepted.contains(&envelope.status) {
        Ok(envelope.data)
    } else {
        Err(envelope_error(envelope))
    }
}

/// Like [`accept`] but the payload is mandatory.
pub(crate) fn accept_data<T>(
    envelope: ApiResponse<T>,
    accepted: &[ResponseStatus],
    what: &str,
) -> ClientResult<T> {
    accept(envelope, accepted)?
        .ok_or_else(|| ClientError::InvalidResponse(format!("Missing {} data", what)))
}
