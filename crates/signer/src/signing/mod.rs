mod canonical;
mod key_chain;
mod signer;

pub use canonical::{empty_body_hash, extract_hostname, format_date, format_instant, sign_string};
pub use key_chain::{HmacSha256, derive_signing_key, hmac_sha256};
pub use signer::{SignatureRequest, SignatureResult, sign};
