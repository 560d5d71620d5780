use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SigningError;

pub type HmacSha256 = Hmac<Sha256>;

pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| SigningError::CryptoUnavailable(format!("HMAC-SHA256: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Scopes the secret key to a day and then to a host.
///
/// `date` is the `yyyyMMdd` form of the request timestamp.
pub fn derive_signing_key(
    secret_key: &str,
    date: &str,
    hostname: &str,
) -> Result<Vec<u8>, SigningError> {
    let date_key = hmac_sha256(secret_key.as_bytes(), date.as_bytes())?;
    hmac_sha256(&date_key, hostname.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn signing_key_depends_on_date_and_host() {
        let base = derive_signing_key("secret123", "20250127", "api.example.com").unwrap();
        let other_day = derive_signing_key("secret123", "20250128", "api.example.com").unwrap();
        let other_host =
            derive_signing_key("secret123", "20250127", "api.example.com:8443").unwrap();
        assert_eq!(base.len(), 32);
        assert_ne!(base, other_day);
        assert_ne!(base, other_host);
    }

    #[test]
    fn signing_key_is_chained() {
        let date_key = hmac_sha256(b"secret123", b"20250127").unwrap();
        let expected = hmac_sha256(&date_key, b"api.example.com").unwrap();
        assert_eq!(
            derive_signing_key("secret123", "20250127", "api.example.com").unwrap(),
            expected
        );
    }
}
