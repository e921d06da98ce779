//! Crate for interacting with the restful-booker REST API.
//!
//! This crate provides a thin client over the booking service's documented
//! endpoints. Every call returns the raw [`ApiResponse`] (status, body and
//! latency) so callers can assert on the service's contract, including
//! status codes the service uses in unconventional ways.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{
    AuthResponse, AuthToken, BookingDates, BookingId, BookingIdEntry, BookingPatch,
    BookingRequest, CreatedBooking, Credentials,
};

pub use reqwest::StatusCode;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Base URL of the public demo instance.
pub const DEFAULT_BASE_URL: &str = "https://restful-booker.herokuapp.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const JSON_MEDIA_TYPE: &str = "application/json";

/// Settings used to construct a [`BookerClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// URL the request was sent to.
    pub url: String,
    pub status: StatusCode,
    /// Raw response body. Some endpoints answer with plain text (`Created`).
    pub body: String,
    /// Time from sending the request until the body was fully read.
    pub elapsed: Duration,
}

impl ApiResponse {
    /// Parses the body as untyped JSON.
    pub fn json(&self) -> Result<serde_json::Value, Error> {
        self.decode()
    }

    /// Parses the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Operations exposed by the booking service.
///
/// Implementations must not treat non-success status codes as errors; an
/// `Err` means no usable response was received at all.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `POST /auth`
    async fn authenticate(&self, credentials: &Credentials) -> Result<ApiResponse, Error>;

    /// `POST /booking`
    async fn create_booking(&self, booking: &BookingRequest) -> Result<ApiResponse, Error>;

    /// `GET /booking`
    async fn list_booking_ids(&self) -> Result<ApiResponse, Error>;

    /// `GET /booking/{id}`
    async fn get_booking(&self, id: BookingId) -> Result<ApiResponse, Error>;

    /// `PUT /booking/{id}`, authenticated with the token cookie.
    async fn update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        booking: &BookingRequest,
    ) -> Result<ApiResponse, Error>;

    /// `PATCH /booking/{id}`, authenticated with the token cookie.
    async fn partial_update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        patch: &BookingPatch,
    ) -> Result<ApiResponse, Error>;

    /// `DELETE /booking/{id}`, authenticated with the token cookie.
    async fn delete_booking(&self, token: &AuthToken, id: BookingId) -> Result<ApiResponse, Error>;

    /// `GET /ping`
    async fn ping(&self) -> Result<ApiResponse, Error>;
}

/// HTTP implementation of [`BookingApi`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct BookerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BookerClient {
    /// Creates a client for the service at `settings.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBaseUrl` if the URL cannot be parsed or is not
    /// an absolute http(s) URL, and `Error::ClientBuild` if the underlying
    /// HTTP client cannot be created.
    pub fn new(settings: &ClientSettings) -> Result<Self, Error> {
        let mut base_url = Url::parse(&settings.base_url).map_err(|e| Error::InvalidBaseUrl {
            url: settings.base_url.clone(),
            message: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl {
                url: settings.base_url.clone(),
                message: "expected an absolute http or https URL".to_string(),
            });
        }

        // Relative joins only keep the last path segment when it ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        debug!(
            base_url = %base_url,
            timeout_ms = settings.request_timeout.as_millis() as u64,
            "Created booking client"
        );

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
                message: e.to_string(),
            })
    }

    fn booking_endpoint(&self, id: BookingId) -> Result<Url, Error> {
        self.endpoint(&format!("booking/{}", id))
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> Result<ApiResponse, Error> {
        let started = Instant::now();

        let response = request
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_reqwest(url.as_str(), e))?;
        let elapsed = started.elapsed();

        debug!(
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            body_len = body.len(),
            "Received response"
        );

        Ok(ApiResponse {
            url: url.to_string(),
            status,
            body,
            elapsed,
        })
    }
}

#[async_trait]
impl BookingApi for BookerClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<ApiResponse, Error> {
        let url = self.endpoint("auth")?;
        let request = self.http.post(url.clone()).json(credentials);
        self.execute(&url, request).await
    }

    #[instrument(skip(self, booking))]
    async fn create_booking(&self, booking: &BookingRequest) -> Result<ApiResponse, Error> {
        let url = self.endpoint("booking")?;
        let request = self.http.post(url.clone()).json(booking);
        self.execute(&url, request).await
    }

    #[instrument(skip(self))]
    async fn list_booking_ids(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint("booking")?;
        let request = self.http.get(url.clone());
        self.execute(&url, request).await
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn get_booking(&self, id: BookingId) -> Result<ApiResponse, Error> {
        let url = self.booking_endpoint(id)?;
        let request = self.http.get(url.clone());
        self.execute(&url, request).await
    }

    #[instrument(skip(self, token, booking), fields(booking_id = %id))]
    async fn update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        booking: &BookingRequest,
    ) -> Result<ApiResponse, Error> {
        let url = self.booking_endpoint(id)?;
        let request = self
            .http
            .put(url.clone())
            .header(COOKIE, token.cookie_header())
            .json(booking);
        self.execute(&url, request).await
    }

    #[instrument(skip(self, token, patch), fields(booking_id = %id))]
    async fn partial_update_booking(
        &self,
        token: &AuthToken,
        id: BookingId,
        patch: &BookingPatch,
    ) -> Result<ApiResponse, Error> {
        let url = self.booking_endpoint(id)?;
        let request = self
            .http
            .patch(url.clone())
            .header(COOKIE, token.cookie_header())
            .json(patch);
        self.execute(&url, request).await
    }

    #[instrument(skip(self, token), fields(booking_id = %id))]
    async fn delete_booking(&self, token: &AuthToken, id: BookingId) -> Result<ApiResponse, Error> {
        let url = self.booking_endpoint(id)?;
        let request = self
            .http
            .delete(url.clone())
            .header(COOKIE, token.cookie_header());
        self.execute(&url, request).await
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<ApiResponse, Error> {
        let url = self.endpoint("ping")?;
        let request = self.http.get(url.clone());
        self.execute(&url, request).await
    }
}
