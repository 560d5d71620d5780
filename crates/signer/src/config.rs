use std::fmt;

use clap::Args;

use crate::error::{ConfigError, HeaderError};
use crate::headers::CallerContext;

/// Everything needed to sign requests against one backend.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub base_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub api_version: String,
    pub content_type: String,
    pub hash_type: String,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("content_type", &self.content_type)
            .field("hash_type", &self.hash_type)
            .finish()
    }
}

/// The two backend variants a caller can sign for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub default: SigningConfig,
    pub backend_ai: Option<SigningConfig>,
}

impl SignerConfig {
    pub fn for_context(&self, caller: CallerContext) -> Result<&SigningConfig, HeaderError> {
        match caller {
            CallerContext::Default => Ok(&self.default),
            CallerContext::BackendAiSession => self
                .backend_ai
                .as_ref()
                .ok_or(HeaderError::MissingVariant(caller)),
        }
    }
}

#[derive(Clone, Args)]
pub struct LablupArgs {
    #[clap(id = "lablup_base_url", long = "lablup-base-url", env = "LABLUP_BASE_URL")]
    pub base_url: String,
    #[clap(id = "lablup_access_key", long = "lablup-access-key", env = "LABLUP_ACCESS_KEY")]
    pub access_key: String,
    #[clap(
        id = "lablup_secret_key",
        long = "lablup-secret-key",
        env = "LABLUP_SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: String,
    #[clap(id = "lablup_api_version", long = "lablup-api-version", env = "LABLUP_API_VERSION")]
    pub api_version: String,
    #[clap(
        id = "lablup_content_type",
        long = "lablup-content-type",
        env = "LABLUP_CONTENT_TYPE",
        default_value = "application/json"
    )]
    pub content_type: String,
    #[clap(
        id = "lablup_hash_type",
        long = "lablup-hash-type",
        env = "LABLUP_HASH_TYPE",
        default_value = "sha256"
    )]
    pub hash_type: String,
}

// Session/resource callers sign against this variant; it is optional as a whole.
#[derive(Clone, Args)]
pub struct BackendAiArgs {
    #[clap(id = "backendai_base_url", long = "backendai-base-url", env = "BACKENDAI_BASE_URL")]
    pub base_url: Option<String>,
    #[clap(
        id = "backendai_access_key",
        long = "backendai-access-key",
        env = "BACKENDAI_ACCESS_KEY"
    )]
    pub access_key: Option<String>,
    #[clap(
        id = "backendai_secret_key",
        long = "backendai-secret-key",
        env = "BACKENDAI_SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: Option<String>,
    #[clap(
        id = "backendai_api_version",
        long = "backendai-api-version",
        env = "BACKENDAI_API_VERSION"
    )]
    pub api_version: Option<String>,
    #[clap(
        id = "backendai_content_type",
        long = "backendai-content-type",
        env = "BACKENDAI_CONTENT_TYPE",
        default_value = "application/json"
    )]
    pub content_type: String,
    #[clap(
        id = "backendai_hash_type",
        long = "backendai-hash-type",
        env = "BACKENDAI_HASH_TYPE",
        default_value = "sha256"
    )]
    pub hash_type: String,
}

#[derive(Clone, Args)]
pub struct SignerArgs {
    #[command(flatten)]
    pub lablup: LablupArgs,
    #[command(flatten)]
    pub backend_ai: BackendAiArgs,
}

impl SignerArgs {
    /// Fails when the Backend.AI variant is only partly configured.
    pub fn into_config(self) -> Result<SignerConfig, ConfigError> {
        let LablupArgs {
            base_url,
            access_key,
            secret_key,
            api_version,
            content_type,
            hash_type,
        } = self.lablup;
        let default = SigningConfig {
            base_url,
            access_key,
            secret_key,
            api_version: api_version.clone(),
            content_type,
            hash_type,
        };

        let b = self.backend_ai;
        let backend_ai = match (b.base_url, b.access_key, b.secret_key) {
            (Some(base_url), Some(access_key), Some(secret_key)) => Some(SigningConfig {
                base_url,
                access_key,
                secret_key,
                api_version: b.api_version.unwrap_or(api_version),
                content_type: b.content_type,
                hash_type: b.hash_type,
            }),
            (None, None, None) => None,
            (base_url, access_key, secret_key) => {
                let missing: Vec<&'static str> = [
                    ("BACKENDAI_BASE_URL", base_url.is_none()),
                    ("BACKENDAI_ACCESS_KEY", access_key.is_none()),
                    ("BACKENDAI_SECRET_KEY", secret_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(ConfigError::PartialVariant {
                    missing: missing.join(", "),
                });
            }
        };

        Ok(SignerConfig { default, backend_ai })
    }
}
