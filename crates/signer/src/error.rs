use http::header::InvalidHeaderValue;
use http::uri::InvalidUri;

use crate::headers::CallerContext;

/// Failures raised while computing a Backend.AI request signature.
///
/// All variants are deterministic and input-driven; retrying with the same
/// inputs always fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("Missing required signing argument: {field}")]
    InvalidArgument { field: &'static str },
    #[error("Endpoint URL has no usable host: {url}")]
    InvalidUri {
        url: String,
        #[source]
        source: Option<InvalidUri>,
    },
    #[error("Hash algorithm not available: {0}")]
    CryptoUnavailable(String),
    #[error("Value cannot be encoded into a request header: {0}")]
    EncodingUnsupported(String),
}

impl SigningError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::InvalidArgument { field }
    }
}

/// Failures raised while turning command-line/env arguments into a
/// [`SignerConfig`](crate::SignerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Backend.AI variant is partially configured; missing {missing}")]
    PartialVariant { missing: String },
}

/// Failures raised while assembling the common request headers.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("Failed to build request headers for {caller}")]
    Signing {
        caller: CallerContext,
        #[source]
        source: SigningError,
    },
    #[error("No signing configuration for {0}")]
    MissingVariant(CallerContext),
    #[error("Invalid value for header {name}")]
    InvalidHeaderValue {
        name: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
}
