use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use super::canonical::{extract_hostname, format_date, sign_string};
use super::key_chain::{derive_signing_key, hmac_sha256};
use crate::config::SigningConfig;
use crate::error::SigningError;

/// One outbound request to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest<'a> {
    pub method: &'a str,
    pub relative_url: &'a str,
    pub timestamp: Option<DateTime<Utc>>,
}

impl<'a> SignatureRequest<'a> {
    pub fn new<Tz: TimeZone>(
        method: &'a str,
        relative_url: &'a str,
        timestamp: DateTime<Tz>,
    ) -> Self {
        Self {
            method,
            relative_url,
            timestamp: Some(timestamp.with_timezone(&Utc)),
        }
    }
}

/// Output of [`sign`]: the header value plus the raw hex signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureResult {
    #[serde(rename = "Authorization")]
    pub authorization: String,
    pub signature: String,
}

impl SignatureResult {
    pub fn into_map(self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("Authorization", self.authorization),
            ("signature", self.signature),
        ])
    }
}

fn require<'v>(value: &'v str, field: &'static str) -> Result<&'v str, SigningError> {
    if value.trim().is_empty() {
        Err(SigningError::missing(field))
    } else {
        Ok(value)
    }
}

// Servers only understand `HMAC-SHA256`, whichever spelling is configured.
fn sign_method(hash_type: &str) -> Result<&'static str, SigningError> {
    let upper = hash_type.to_uppercase();
    match upper.as_str() {
        "SHA256" | "SHA-256" => Ok("HMAC-SHA256"),
        _ => Err(SigningError::CryptoUnavailable(format!("HMAC-{upper}"))),
    }
}

/// Signs a request with the Backend.AI HMAC scheme.
///
/// The secret is scoped to the request's UTC date and the endpoint host before
/// it signs the canonical string (see [`sign_string`]). Pure and
/// deterministic: identical inputs always produce the identical result.
pub fn sign(
    request: &SignatureRequest<'_>,
    config: &SigningConfig,
) -> Result<SignatureResult, SigningError> {
    let method = require(request.method, "method")?;
    let relative_url = require(request.relative_url, "relative_url")?;
    let timestamp = request
        .timestamp
        .ok_or_else(|| SigningError::missing("timestamp"))?;
    let access_key = require(&config.access_key, "access_key")?;
    let secret_key = require(&config.secret_key, "secret_key")?;
    let content_type = require(&config.content_type, "content_type")?;
    let signing_method = sign_method(require(&config.hash_type, "hash_type")?)?;

    let hostname = extract_hostname(&config.base_url)?;
    let date = format_date(&timestamp);
    let canonical = sign_string(
        method,
        relative_url,
        &timestamp,
        &hostname,
        content_type,
        &config.api_version,
    );

    let signing_key = derive_signing_key(secret_key, &date, &hostname)?;
    let signature = hex::encode(hmac_sha256(&signing_key, canonical.as_bytes())?);

    let authorization =
        format!("BackendAI signMethod={signing_method}, credential={access_key}:{signature}");
    if !authorization.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
        return Err(SigningError::EncodingUnsupported(
            "Authorization must be visible ASCII".to_string(),
        ));
    }

    debug!(%hostname, %date, %signature, "signed backend.ai request");

    Ok(SignatureResult {
        authorization,
        signature,
    })
}
