use reqwest::blocking::Client as HttpClient;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

pub const API_KEY_HEADER: &str = "x-edx-api-key";

/// A single JSON request against the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, None)
    }

    pub fn post(url: Url, body: Value) -> Self {
        Self::new(Method::POST, url, Some(body))
    }

    pub fn put(url: Url, body: Value) -> Self {
        Self::new(Method::PUT, url, Some(body))
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url, None)
    }

    fn new(method: Method, url: Url, body: Option<Value>) -> Self {
        Self { method, url, body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Status and body of a response, whatever the status was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`ApiError::Remote`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Remote {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Executes requests. Only transport failures are errors; any status code is a response.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport sending JSON with the configured headers and timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .default_headers(json_headers(config)?)
            .timeout(config.timeout())
            .build()
            .map_err(|err| ApiError::transport(config.address().as_str(), err))?;

        Ok(Self { client })
    }
}

fn json_headers(config: &ApiConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    if let Some(api_key) = config.api_key() {
        let mut value = HeaderValue::from_str(api_key)
            .map_err(|err| ApiError::Config(format!("API key is not a valid header: {err}")))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    }

    Ok(headers)
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let builder = self
            .client
            .request(request.method().clone(), request.url().clone());
        let builder = match request.body() {
            Some(body) => builder.json(body),
            None => builder,
        };

        let url = request.url().as_str();
        let response = builder
            .send()
            .map_err(|err| ApiError::transport(url, err))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|err| ApiError::transport(url, err))?;

        Ok(RawResponse::new(status, body))
    }
}

/// Logs every request and its outcome before handing it to the wrapped transport.
#[derive(Debug, Clone)]
pub struct Traced<T> {
    inner: T,
}

impl<T> Traced<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for Traced<T> {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let method = request.method();
        let url = request.url().as_str();
        info!(%method, %url, "sending request");
        if let Some(body) = request.body() {
            debug!(%body, "using data");
        }

        let result = self.inner.send(request);
        match &result {
            Ok(response) => info!(%method, %url, status = response.status(), "got response"),
            Err(err) => warn!(%method, %url, %err, "request failed"),
        }

        result
    }
}

/// Builds the transport described by the configuration.
pub fn transport(config: &ApiConfig) -> Result<Box<dyn Transport>> {
    let http = HttpTransport::new(config)?;
    if config.trace_requests() {
        Ok(Box::new(Traced::new(http)))
    } else {
        Ok(Box::new(http))
    }
}
