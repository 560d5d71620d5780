pub mod config;
pub mod error;
pub mod headers;
pub mod signing;

pub use config::{SignerArgs, SignerConfig, SigningConfig};
pub use error::{ConfigError, HeaderError, SigningError};
pub use headers::{CallerContext, CommonHeaders, HeaderBuilder};
pub use signing::{SignatureRequest, SignatureResult, sign};
