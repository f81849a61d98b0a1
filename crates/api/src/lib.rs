//! ColorEvolve API client utilities.
//!
//! This crate provides a lightweight client for the palette optimizer
//! service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating the configured base URL for safety
//! - Posting the multipart generation form and the url-encoded extraction
//!   form
//! - Decoding every body as JSON; an HTML error page from the server
//!   becomes [`ApiError::InvalidJson`] carrying the status and page title
//!
//! The client does not interpret payloads. A JSON body carrying an `error`
//! field is returned as-is; deciding what that means belongs to the caller.
//!
//! # Example
//!
//! ```ignore
//! use colorevolve_api::{ClientConfig, PaletteClient};
//! use colorevolve_types::{ExtractionSource};
//!
//! # async fn demo() -> Result<(), colorevolve_api::ApiError> {
//! let client = PaletteClient::new(ClientConfig::default())?;
//! let payload = client
//!     .extract_color(&ExtractionSource::Url("https://example.com".into()))
//!     .await?;
//! println!("{payload}");
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use colorevolve_types::{ExtractionSource, GenerationForm};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the optimizer base URL.
pub const API_BASE_ENV: &str = "COLOREVOLVE_API_BASE";
/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
/// Transport timeout applied when none is configured. Generation runs the
/// whole genetic algorithm server-side, so this is deliberately long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

const GENERATE_PATH: &str = "/generate";
const EXTRACT_COLOR_PATH: &str = "/extract-color";
/// Longest body summary carried by [`ApiError::InvalidJson`], in characters.
const SUMMARY_CHARS: usize = 120;

/// Errors surfaced by [`PaletteClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Network failure (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with something that is not JSON, usually the
    /// framework's HTML page for an unhandled exception.
    #[error("server returned {status} instead of JSON: {summary}")]
    InvalidJson { status: StatusCode, summary: String },
}

/// Connection settings for [`PaletteClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for the optimizer
/// service.
#[derive(Debug, Clone)]
pub struct PaletteClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl PaletteClient {
    /// Construct a client after validating the base URL.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("colorevolve-tui/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a POST request for an API-relative path.
    pub fn post(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http.post(url).header(header::USER_AGENT, &self.user_agent)
    }

    /// `POST /generate` with a multipart form body.
    pub async fn generate(&self, form: &GenerationForm) -> Result<Value, ApiError> {
        let multipart = form
            .fields()
            .into_iter()
            .fold(Form::new(), |multipart, (name, value)| multipart.text(name, value));
        let request = self.post(GENERATE_PATH).multipart(multipart);
        send_for_json(request).await
    }

    /// `POST /extract-color` with exactly one of `url` or `html`.
    pub async fn extract_color(&self, source: &ExtractionSource) -> Result<Value, ApiError> {
        let request = self.post(EXTRACT_COLOR_PATH).form(&[source.form_pair()]);
        send_for_json(request).await
    }
}

async fn send_for_json(request: RequestBuilder) -> Result<Value, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    debug!(%status, bytes = text.len(), "response received");
    decode_body(status, &text)
}

/// Error payloads such as `{"error": "..."}` may come with non-2xx statuses;
/// they are still JSON and are handed back untouched.
fn decode_body(status: StatusCode, text: &str) -> Result<Value, ApiError> {
    serde_json::from_str(text).map_err(|error| {
        debug!(%status, %error, "response body is not JSON");
        ApiError::InvalidJson {
            status,
            summary: body_summary(text),
        }
    })
}

/// One-line description of a non-JSON body: the `<title>` of an HTML page,
/// otherwise its first non-blank line.
fn body_summary(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "empty body".to_string();
    }
    // ASCII lowercasing keeps byte offsets valid for `text`.
    let lower = text.to_ascii_lowercase();
    let title = match (lower.find("<title>"), lower.find("</title>")) {
        (Some(open), Some(close)) if open + "<title>".len() <= close => Some(text[open + "<title>".len()..close].trim()),
        _ => None,
    };
    let summary = title
        .filter(|title| !title.is_empty())
        .or_else(|| text.lines().map(str::trim).find(|line| !line.is_empty()))
        .unwrap_or_default();

    if summary.chars().count() > SUMMARY_CHARS {
        let mut truncated: String = summary.chars().take(SUMMARY_CHARS).collect();
        truncated.push('…');
        truncated
    } else {
        summary.to_string()
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`, `127.0.0.1` or `[::1]`: any http(s) scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("the URL must include a host".into()))?;

    if !matches!(parsed_base_url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}://'", parsed_base_url.scheme())));
    }

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "non-localhost hosts must use https; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_accepts_plain_http() {
        assert!(validate_base_url("http://127.0.0.1:5000").is_ok());
        assert!(validate_base_url("http://LOCALHOST:8080").is_ok());
        assert!(validate_base_url("https://localhost").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_base_url("https://palettes.example.com").is_ok());
        let error = validate_base_url("http://palettes.example.com").unwrap_err();
        assert!(error.to_string().contains("must use https"));
    }

    #[test]
    fn rejects_garbage_and_other_schemes() {
        assert!(matches!(validate_base_url("not a url"), Err(ApiError::InvalidBaseUrl { .. })));
        assert!(validate_base_url("ftp://localhost").is_err());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = PaletteClient::new(ClientConfig {
            base_url: "http://localhost:5000/".into(),
            ..ClientConfig::default()
        })
        .expect("client");
        assert_eq!(client.base_url, "http://localhost:5000");
        let request = client.post(GENERATE_PATH).build().expect("request");
        assert_eq!(request.url().as_str(), "http://localhost:5000/generate");
        assert_eq!(request.method(), reqwest::Method::POST);
    }

    #[test]
    fn extraction_request_is_url_encoded() {
        let client = PaletteClient::new(ClientConfig::default()).expect("client");
        let source = ExtractionSource::Url("https://example.com/?a=b".into());
        let request = client.post(EXTRACT_COLOR_PATH).form(&[source.form_pair()]).build().expect("request");
        let content_type = request.headers().get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok());
        assert_eq!(content_type, Some("application/x-www-form-urlencoded"));
        let body = request.body().and_then(|body| body.as_bytes()).expect("buffered body");
        assert_eq!(body, b"url=https%3A%2F%2Fexample.com%2F%3Fa%3Db");
    }

    #[test]
    fn error_payloads_pass_through_whatever_the_status() {
        let value = decode_body(StatusCode::BAD_REQUEST, r#"{"error": "unreachable host"}"#).expect("json");
        assert_eq!(value["error"], "unreachable host");
    }

    #[test]
    fn html_error_page_is_summarized_by_its_title() {
        let page = "<!doctype html>\n<html lang=en>\n<TITLE>500 Internal Server Error</TITLE>\n<h1>Internal Server Error</h1>";
        match decode_body(StatusCode::INTERNAL_SERVER_ERROR, page) {
            Err(ApiError::InvalidJson { status, summary }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(summary, "500 Internal Server Error");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn plain_bodies_use_first_line_and_are_capped() {
        assert_eq!(body_summary("  \n "), "empty body");
        assert_eq!(body_summary("\nBad Gateway\nupstream closed"), "Bad Gateway");
        let long = body_summary(&"é".repeat(300));
        assert_eq!(long.chars().count(), SUMMARY_CHARS + 1);
        assert!(long.ends_with('…'));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = PaletteClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
        })
        .expect("client");
        let error = client
            .extract_color(&ExtractionSource::Html("<p></p>".into()))
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Network(_)));
        assert!(error.to_string().starts_with("Network error"));
    }
}
