//! Icon fetching abstraction
//!
//! [`IconFetcher`] is the transport seam: it performs one GET and reports
//! what came back. Deciding whether that response is a usable icon is
//! [`validate`]'s job, so every transport is held to the same rules.

pub mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;
use thiserror::Error;

/// Why a single candidate was excluded from the race
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("HTTP status {0}")]
    BadStatus(u16),

    #[error("not an image (content-type: {})", .0.as_deref().unwrap_or("none"))]
    NotAnImage(Option<String>),

    #[error("empty body")]
    Empty,

    #[error("icon larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),
}

/// What a transport got back for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A 200 response with the given content type and body
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            body,
        }
    }

    /// A body-less response with the given status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }
}

/// A response that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPayload {
    /// Lowercased media type without parameters, e.g. `image/png`
    pub mime: String,
    /// Image bytes
    pub bytes: Vec<u8>,
}

impl IconPayload {
    /// Encode as a `data:` URI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Size in bytes of the image carried by a base64 `data:` URI
pub fn data_uri_payload_len(uri: &str) -> Option<usize> {
    let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    STANDARD.decode(payload).ok().map(|bytes| bytes.len())
}

/// Performs a single icon request
#[async_trait]
pub trait IconFetcher: Send + Sync {
    /// GET `url`. Non-2xx statuses are returned as responses, not errors.
    async fn fetch(&self, url: &str) -> Result<RawResponse, ProviderFailure>;
}

/// Media type without parameters, lowercased
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Accept a response only if it is a non-empty image within `max_bytes`
pub fn validate(response: RawResponse, max_bytes: usize) -> Result<IconPayload, ProviderFailure> {
    if !(200..300).contains(&response.status) {
        return Err(ProviderFailure::BadStatus(response.status));
    }

    let mime = match response.content_type.as_deref().map(media_type) {
        Some(mime) if mime.starts_with("image/") => mime,
        _ => return Err(ProviderFailure::NotAnImage(response.content_type)),
    };

    if response.body.is_empty() {
        return Err(ProviderFailure::Empty);
    }

    if response.body.len() > max_bytes {
        return Err(ProviderFailure::TooLarge { limit: max_bytes });
    }

    Ok(IconPayload {
        mime,
        bytes: response.body,
    })
}
