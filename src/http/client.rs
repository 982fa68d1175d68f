// ABOUTME: Thin JSON-over-HTTP client shared by the GitHub and cPanel clients.
// ABOUTME: Logs every call, decodes JSON bodies, and maps non-2xx into HttpError.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use tracing::{info, warn};

use super::error::{
    DecodeSnafu, HttpError, InvalidHeaderSnafu, StatusSnafu, TransportSnafu,
};

/// Default per-call timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request payload encoding. GitHub takes JSON, cPanel takes form fields.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A single API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a header. Fails if the value contains bytes a header cannot carry.
    pub fn header(mut self, name: &'static str, value: &str) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(value).context(InvalidHeaderSnafu { name })?;
        self.headers.insert(HeaderName::from_static(name), value);
        Ok(self)
    }

    /// Add a credential header. The value is marked sensitive so it stays
    /// out of `Debug` output.
    pub fn secret_header(
        mut self,
        name: &'static str,
        value: &SecretString,
    ) -> Result<Self, HttpError> {
        let mut value =
            HeaderValue::from_str(value.expose_secret()).context(InvalidHeaderSnafu { name })?;
        value.set_sensitive(true);
        self.headers.insert(HeaderName::from_static(name), value);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }
}

/// A decoded 2xx response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Log the body at warn level. Used when a 2xx response still signals failure.
    pub fn log_failure_body(&self) {
        warn!("response body:\n{}", pretty(&self.body));
    }
}

/// JSON-over-HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    verbose: bool,
}

impl ApiClient {
    /// Create a client with the given per-call timeout.
    ///
    /// With `verbose` set, every response body is logged; otherwise bodies
    /// are only logged when a call fails.
    pub fn new(timeout: Duration, verbose: bool) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, verbose })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Send a request and decode its JSON body.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        let ApiRequest {
            method,
            url,
            headers,
            query,
            body,
        } = request;

        info!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        let response = builder.send().await.context(TransportSnafu {
            method: method.clone(),
            url: url.clone(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.context(TransportSnafu {
            method: method.clone(),
            url: url.clone(),
        })?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                // An error page is rarely JSON; keep it as text so the status error survives.
                Err(_) if !status.is_success() => {
                    serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                Err(e) => {
                    warn!("{} {} returned a body that is not JSON", method, url);
                    warn!("response body:\n{}", String::from_utf8_lossy(&bytes));
                    return Err(e).context(DecodeSnafu { method, url });
                }
            }
        };

        if !status.is_success() {
            warn!("{} {} returned HTTP {}", method, url, status);
            warn!("response body:\n{}", pretty(&body));
            return StatusSnafu {
                method,
                url,
                status,
                body,
            }
            .fail();
        }

        if self.verbose {
            info!("response body:\n{}", pretty(&body));
        }

        Ok(ApiResponse { body })
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
