use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{header_map, ClientError, HttpFailure};

/// Route prefix every resource path is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Where and how requests are sent.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Base URL of the server, e.g. `http://localhost:3000`.
    pub host: String,
    /// Sent with every request.
    pub headers: HeaderMap,
    /// Answer locally with fixture data instead of performing I/O.
    pub simulate: bool,
    http: reqwest::Client,
}

impl Connection {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
            simulate: false,
            http: reqwest::Client::new(),
        }
    }

    /// A connection that never leaves the process.
    pub fn simulated() -> Self {
        Self::new("http://localhost").with_simulate(true)
    }

    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn with_bearer(self, token: &str) -> Result<Self, ClientError> {
        self.with_header(AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.host)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .headers(self.headers.clone())
    }

    /// Send a request and normalize any non-2xx answer into
    /// [`ClientError::Http`].
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request).await
    }

    /// Send a request and decode the JSON body of a 2xx answer.
    pub(crate) async fn fetch<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        decode(response).await
    }

    /// `GET` with `query` encoded as the query string.
    pub(crate) async fn fetch_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        let response = self.dispatch(request).await?;
        decode(response).await
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "Sending request");

        let response = self.http.execute(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let headers = header_map(response.headers());
        let text = response.text().await?;
        let data = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };
        tracing::debug!(status = status.as_u16(), %url, "Request failed");

        Err(ClientError::Http(HttpFailure::new(
            status.as_u16(),
            headers,
            data,
        )))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
