use crate::{ErrorCategory, requests, responses, status_message};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Every request is abandoned after this long. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection.";
const INVALID_PAYLOAD_MESSAGE: &str = "Unexpected response from server";
const INVALID_REQUEST_MESSAGE: &str = "Invalid request. Please check the API address.";

/// An API client for the teams backend.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

impl APIClient {
    /// Client for the API at `address` using the standard request timeout.
    pub fn new(address: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(address, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        address: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        let address = address.into().trim_end_matches('/').to_string();
        Ok(Self {
            address,
            inner_client,
        })
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/{path}", &self.address)
    }

    /// Attach the bearer credential. Without one the request goes out bare
    /// and the server answers 401.
    fn authorized(
        request: RequestBuilder,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn post(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &impl Serialize,
    ) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path)).json(body);
        Self::authorized(request, token).send().await
    }

    async fn empty_put(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> ReqwestResult {
        let request = self.inner_client.put(self.format_url(path));
        Self::authorized(request, token).send().await
    }

    async fn empty_get(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path));
        Self::authorized(request, token).send().await
    }
}

/// Methods on the teams API
impl APIClient {
    /// Join the team identified by an invitation code.
    pub async fn join_team(
        &self,
        token: Option<&SecretString>,
        details: &requests::JoinTeam,
    ) -> Result<responses::TeamWithPower, ClientError> {
        let response = self.post("teams", token, details).await?;
        ok_body(response).await
    }

    /// Leave the current team, returning the team that was left.
    pub async fn leave_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<responses::TeamWithPower, ClientError> {
        let response = self.empty_put("teams", token).await?;
        ok_body(response).await
    }

    /// Get the team the current student belongs to.
    pub async fn current_team(
        &self,
        token: Option<&SecretString>,
    ) -> Result<responses::TeamWithPower, ClientError> {
        let response = self.empty_get("teams/current", token).await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with anything other than 200 OK. Contains the
    /// response text.
    #[error("{}", status_message(.0.as_u16()))]
    APIError(StatusCode, String),
    /// No response was received: connection failure, DNS, or timeout.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(#[source] reqwest::Error),
    /// The request could not be built, e.g. a malformed API address.
    #[error("{}", INVALID_REQUEST_MESSAGE)]
    Request(#[source] reqwest::Error),
    /// 200 OK, but the body wasn't the expected payload.
    #[error("{}", INVALID_PAYLOAD_MESSAGE)]
    InvalidPayload(#[source] reqwest::Error),
}

/// Cloneable summary of a [`ClientError`], suitable for keeping in UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    HttpStatus(u16),
    NetworkFailure,
    InvalidPayload,
    InvalidRequest,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::HttpStatus(code) => status_message(*code),
            Self::NetworkFailure => NETWORK_ERROR_MESSAGE,
            Self::InvalidPayload => INVALID_PAYLOAD_MESSAGE,
            Self::InvalidRequest => INVALID_REQUEST_MESSAGE,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpStatus(code) => ErrorCategory::from_status(*code),
            Self::NetworkFailure => ErrorCategory::Network,
            Self::InvalidPayload => ErrorCategory::InvalidPayload,
            Self::InvalidRequest => ErrorCategory::InvalidRequest,
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::APIError(status, _) => ErrorKind::HttpStatus(status.as_u16()),
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
            Self::Request(_) => ErrorKind::InvalidRequest,
        }
    }

    /// The response status, if a response was received at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(_) | Self::InvalidPayload(_) | Self::Request(_) => {
                None
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Request(e)
        } else {
            Self::Network(e)
        }
    }
}

/// Deserialize a 200 OK response into the desired type, or return an
/// appropriate error. Other success codes are treated as failures too.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status != StatusCode::OK {
        // the status is what matters; a body we can't read is just empty
        let text = response.text().await.unwrap_or_default();
        return Err(ClientError::APIError(status, text));
    }
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            ClientError::InvalidPayload(e)
        } else {
            ClientError::Network(e)
        }
    })
}
