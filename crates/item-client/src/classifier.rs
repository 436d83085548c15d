//! Response classification.
//!
//! A response with a 4xx/5xx status becomes a [`ClassifiedFailure`] whose
//! message is the error body, or a canned message when the body is empty or
//! cannot be read. Any other status yields [`ItemMetadata`] from the headers
//! and, for GET, the body text.

use crate::error::{ClassifiedFailure, ClassifyError};
use crate::types::{Item, ItemMetadata, DEFAULT_CONTENT_TYPE, DEFAULT_MAX_ERROR_BODY_BYTES};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;
use std::borrow::Cow;

const CODE_HEADER: &str = "code";

/// A received response: status, headers, and a body that is read once.
///
/// Ownership enforces single consumption: the classifier takes the response
/// by value and drops it after the body is drained.
#[async_trait]
pub trait ExchangeResponse: Send {
    /// Error raised by the transport while streaming the body.
    type Error: std::error::Error + Send + Sync + 'static;

    fn status(&self) -> StatusCode;

    /// All values of the named header, in order. Lookup is case-insensitive.
    ///
    /// Every present value is returned, including ones with non-ASCII bytes.
    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>>;

    /// Next body chunk, or `None` once the body is exhausted.
    async fn chunk(&mut self) -> Result<Option<Bytes>, Self::Error>;
}

#[async_trait]
impl ExchangeResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        reqwest::Response::status(self)
    }

    fn header_values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.headers().get_all(name).iter().map(decode_header_value).collect()
    }

    async fn chunk(&mut self) -> Result<Option<Bytes>, Self::Error> {
        reqwest::Response::chunk(self).await
    }
}

/// Turns responses into items or typed failures.
#[derive(Debug, Clone, Copy)]
pub struct ResponseClassifier {
    max_error_body_bytes: usize,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERROR_BODY_BYTES)
    }
}

impl ResponseClassifier {
    pub fn new(max_error_body_bytes: usize) -> Self {
        Self { max_error_body_bytes }
    }

    /// Classifies the response to a HEAD request.
    ///
    /// The body is still read on an error status, since servers may attach
    /// diagnostic text to failures.
    pub async fn classify_head<R: ExchangeResponse>(
        &self,
        response: R,
    ) -> Result<ItemMetadata, ClassifyError<R::Error>> {
        let response = self.check(response).await?;
        Ok(metadata(&response))
    }

    /// Classifies the response to a GET request.
    ///
    /// Metadata comes from the headers and content from the body; both are
    /// complete before the [`Item`] is built.
    pub async fn classify_get<R: ExchangeResponse>(
        &self,
        response: R,
    ) -> Result<Item, ClassifyError<R::Error>> {
        let mut response = self.check(response).await?;
        let metadata = metadata(&response);
        let content = read_text(&mut response, None).await.map_err(ClassifyError::Body)?;
        Ok(Item { metadata, content })
    }

    async fn check<R: ExchangeResponse>(&self, mut response: R) -> Result<R, ClassifiedFailure> {
        let status = response.status();
        if !is_error_status(status) {
            return Ok(response);
        }

        let message = self.error_message(&mut response, status).await;
        if status == StatusCode::UNAUTHORIZED {
            Err(ClassifiedFailure::Unauthorized { message })
        } else {
            Err(ClassifiedFailure::UnexpectedStatus { status: status.as_u16(), message })
        }
    }

    async fn error_message<R: ExchangeResponse>(
        &self,
        response: &mut R,
        status: StatusCode,
    ) -> String {
        match read_text(response, Some(self.max_error_body_bytes)).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => canned_message(status),
            Err(e) => {
                tracing::debug!(
                    "Error body for status {} unreadable, using canned message: {}",
                    status,
                    e
                );
                canned_message(status)
            },
        }
    }
}

/// Fallback failure message for error responses without a readable body.
pub fn canned_message(status: StatusCode) -> String {
    format!("An HTTP error happened (response code = {})", status.as_u16())
}

/// UTF-8 when the bytes are valid UTF-8, otherwise ISO-8859-1 (obs-text).
fn decode_header_value(value: &HeaderValue) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

fn is_error_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

fn metadata<R: ExchangeResponse>(response: &R) -> ItemMetadata {
    let first = |name: &str| response.header_values(name).into_iter().next().map(Cow::into_owned);

    ItemMetadata {
        length: first(CONTENT_LENGTH.as_str()).and_then(|v| v.trim().parse().ok()).unwrap_or(0),
        code: first(CODE_HEADER),
        content_type: first(CONTENT_TYPE.as_str())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
    }
}

/// Drains the body into text, stopping after `limit` bytes when given.
///
/// Invalid UTF-8, including a multi-byte character cut by the limit, is
/// replaced rather than rejected.
async fn read_text<R: ExchangeResponse>(
    response: &mut R,
    limit: Option<usize>,
) -> Result<String, R::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        match limit {
            Some(limit) if buf.len() + chunk.len() >= limit => {
                buf.extend_from_slice(&chunk[..limit - buf.len()]);
                break;
            },
            _ => buf.extend_from_slice(&chunk),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
