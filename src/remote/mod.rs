//! Client for the gym backend API.
//!
//! The backend owns every record; this layer only speaks HTTP to it. Each
//! entity's calls live behind a trait (`EquipmentApi`, `MaintenanceApi`,
//! `TicketApi`, `CostApi`) so services can be exercised against mocks.

pub mod costs;
pub mod equipment;
pub mod maintenance;
pub mod tickets;

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::{config::RemoteConfig, error::RemoteError};

pub use costs::CostApi;
pub use equipment::EquipmentApi;
pub use maintenance::MaintenanceApi;
pub use tickets::TicketApi;

/// HTTP client bound to one backend
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}/api{}", self.base_url, path))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            tracing::warn!(status = status.as_u16(), %url, "Remote API call failed");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    /// GET a JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        tracing::debug!(path, "GET");
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        Ok(response.json().await?)
    }

    /// GET a record the backend may not have. Both an empty body and
    /// `null` decode to `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, RemoteError> {
        tracing::debug!(path, "GET");
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// POST a JSON body and decode the JSON answer
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        tracing::debug!(path, "POST");
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body to an endpoint that answers with an empty body
    pub(crate) async fn post_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), RemoteError> {
        tracing::debug!(path, "POST");
        self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(())
    }

    /// Issue a call whose answer body is ignored
    pub(crate) async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), RemoteError> {
        tracing::debug!(%method, path, "Remote call");
        self.send(self.request(method, path).query(query)).await?;
        Ok(())
    }
}
