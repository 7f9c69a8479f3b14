// HTTP client for the broker management API.
// Builds URLs from the configured base, attaches the connection scope and maps error statuses.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::error::{ConsoleError, Result};

pub struct BrokerApiClient {
    client: Client,
    base_url: String,
}

impl BrokerApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConsoleError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str, connection_id: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match connection_id {
            Some(id) => builder.query(&[("connectionId", id)]),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, connection_id: Option<&str>) -> Result<Response> {
        self.send(self.request(reqwest::Method::GET, path, connection_id)).await
    }

    pub async fn post(&self, path: &str, connection_id: Option<&str>) -> Result<Response> {
        self.send(self.request(reqwest::Method::POST, path, connection_id)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        connection_id: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        self.send(self.request(reqwest::Method::POST, path, connection_id).json(body))
            .await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        self.send(self.request(reqwest::Method::PUT, path, None).json(body)).await
    }

    pub async fn delete(&self, path: &str, connection_id: Option<&str>) -> Result<Response> {
        self.send(self.request(reqwest::Method::DELETE, path, connection_id)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ConsoleError::Request)?;
        check_response(response).await
    }
}

/// Passes 2xx responses through and turns everything else into an error.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(ConsoleError::NotFound(response.url().path().to_string())),
        status => Err(ConsoleError::Http {
            status,
            body: response.text().await.unwrap_or_default(),
        }),
    }
}
