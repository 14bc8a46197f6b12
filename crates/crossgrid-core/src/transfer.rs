//! Network transfer of grid documents.
//!
//! The model does not own an HTTP client. Hosts supply a [`Transport`]; the
//! browser binding implements it over `fetch`, tests use a scripted one.

use crate::document::GridDocument;
use crate::error::{GridError, TransportError};

/// Response as seen by the model: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    pub status: u16,
    pub body: String,
}

impl TransferResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a success response, or a transfer error
    pub fn into_success_body(self) -> Result<String, GridError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(GridError::Transfer {
                status: self.status,
            })
        }
    }
}

/// Asynchronous HTTP-like transport
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<TransferResponse, TransportError>;

    /// POST `body` with a JSON content type
    async fn post_json(&self, url: &str, body: String) -> Result<TransferResponse, TransportError>;
}

/// Decode a load response into a document, checking status and shape
pub fn decode_load(
    response: Result<TransferResponse, TransportError>,
) -> Result<GridDocument, GridError> {
    let body = response?.into_success_body()?;
    let doc = GridDocument::from_json(&body)?;
    doc.validate()?;
    Ok(doc)
}

/// Fetch the list of puzzle file names from a catalog endpoint
pub async fn fetch_catalog<T: Transport>(
    transport: &T,
    endpoint: &str,
) -> Result<Vec<String>, GridError> {
    let body = transport.get(endpoint).await?.into_success_body()?;
    Ok(serde_json::from_str(&body)?)
}
