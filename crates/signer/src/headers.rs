use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::config::SignerConfig;
use crate::error::HeaderError;
use crate::signing::{SignatureRequest, format_instant, sign};

pub const X_BACKENDAI_VERSION: HeaderName = HeaderName::from_static("x-backendai-version");

const SESSION_CALLER_ID: &str = "backend-ai-session";
const RESOURCE_CALLER_ID: &str = "backend-ai-resource";

/// Which backend variant a caller signs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallerContext {
    Default,
    BackendAiSession,
}

impl CallerContext {
    /// Session and resource clients talk to Backend.AI; everyone else uses
    /// the default Lablup endpoint.
    pub fn from_caller_id(caller_id: &str) -> Self {
        match caller_id {
            SESSION_CALLER_ID | RESOURCE_CALLER_ID => Self::BackendAiSession,
            _ => Self::Default,
        }
    }
}

impl FromStr for CallerContext {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_caller_id(s))
    }
}

impl fmt::Display for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::BackendAiSession => f.write_str(SESSION_CALLER_ID),
        }
    }
}

/// Headers every outbound Backend.AI call carries, plus the endpoint they
/// were signed for.
#[derive(Debug, Clone)]
pub struct CommonHeaders {
    pub base_url: String,
    pub headers: HeaderMap,
}

impl CommonHeaders {
    pub fn to_json(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
                )
            })
            .collect();
        json!({ "base_url": self.base_url, "headers": headers })
    }
}

pub struct HeaderBuilder<'c> {
    config: &'c SignerConfig,
}

impl<'c> HeaderBuilder<'c> {
    pub fn new(config: &'c SignerConfig) -> Self {
        Self { config }
    }

    pub fn generate_common_headers(
        &self,
        caller: CallerContext,
        method: &str,
        relative_url: &str,
        now: DateTime<Utc>,
    ) -> Result<CommonHeaders, HeaderError> {
        let config = self.config.for_context(caller)?;

        let request = SignatureRequest::new(method, relative_url, now);
        let signed = sign(&request, config).map_err(|source| {
            error!(%caller, method, relative_url, error = %source, "failed to sign request");
            HeaderError::Signing { caller, source }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(DATE, header_value("Date", &format_instant(&now))?);
        headers.insert(AUTHORIZATION, header_value("Authorization", &signed.authorization)?);
        headers.insert(CONTENT_TYPE, header_value("Content-Type", &config.content_type)?);
        headers.insert(
            X_BACKENDAI_VERSION,
            header_value("X-BackendAI-Version", &config.api_version)?,
        );

        Ok(CommonHeaders {
            base_url: config.base_url.clone(),
            headers,
        })
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, HeaderError> {
    HeaderValue::from_str(value).map_err(|source| HeaderError::InvalidHeaderValue { name, source })
}
