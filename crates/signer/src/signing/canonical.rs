use chrono::{DateTime, SecondsFormat, Utc};
use http::Uri;
use sha2::{Digest, Sha256};

use crate::error::SigningError;

/// Request bodies are never hashed; every signed request carries the digest
/// of the empty body.
pub fn empty_body_hash() -> String {
    hex::encode(Sha256::digest(b""))
}

/// Host component used both in the sign string and as the second key in the
/// HMAC chain. The host is taken as written (no case folding); default HTTP(S)
/// ports are dropped.
pub fn extract_hostname(base_url: &str) -> Result<String, SigningError> {
    let invalid = |source| SigningError::InvalidUri {
        url: base_url.to_string(),
        source,
    };

    let uri: Uri = base_url.parse().map_err(|e| invalid(Some(e)))?;
    if uri.scheme().is_none() {
        return Err(invalid(None));
    }
    let host = uri
        .host()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| invalid(None))?;

    match uri.port_u16() {
        Some(port) if port != 80 && port != 443 => Ok(format!("{host}:{port}")),
        _ => Ok(host.to_string()),
    }
}

/// ISO-8601 instant, `Z` suffixed, fractional seconds only when present.
pub fn format_instant(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `yyyyMMdd` of the UTC date, the message of the first HMAC step.
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// Builds the newline-joined canonical string fed to the final HMAC step.
///
/// Field order is fixed by the wire format. The method is uppercased and the
/// content type lowercased; everything else is used verbatim.
pub fn sign_string(
    method: &str,
    relative_url: &str,
    timestamp: &DateTime<Utc>,
    hostname: &str,
    content_type: &str,
    api_version: &str,
) -> String {
    format!(
        "{}\n{}\n{}\nhost:{}\ncontent-type:{}\nx-backendai-version:{}\n{}",
        method.to_uppercase(),
        relative_url,
        format_instant(timestamp),
        hostname,
        content_type.to_lowercase(),
        api_version,
        empty_body_hash(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_body_hash_is_well_known_constant() {
        assert_eq!(
            empty_body_hash(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn default_ports_are_dropped() {
        assert_eq!(extract_hostname("https://host.example").unwrap(), "host.example");
        assert_eq!(extract_hostname("https://host.example:443/v1").unwrap(), "host.example");
        assert_eq!(extract_hostname("http://host.example:80").unwrap(), "host.example");
        // 80 over https is explicit but still omitted.
        assert_eq!(extract_hostname("https://host.example:80").unwrap(), "host.example");
    }

    #[test]
    fn other_ports_are_kept() {
        assert_eq!(
            extract_hostname("https://host.example:8443/api").unwrap(),
            "host.example:8443"
        );
        assert_eq!(extract_hostname("http://10.0.0.5:8090").unwrap(), "10.0.0.5:8090");
    }

    #[test]
    fn unparseable_url_is_invalid_uri() {
        assert!(matches!(
            extract_hostname("not a url"),
            Err(SigningError::InvalidUri { source: Some(_), .. })
        ));
    }

    #[test]
    fn url_without_scheme_or_host_is_invalid_uri() {
        assert!(matches!(
            extract_hostname("/v1/relative"),
            Err(SigningError::InvalidUri { source: None, .. })
        ));
        assert!(matches!(
            extract_hostname("api.example.com:8443"),
            Err(SigningError::InvalidUri { source: None, .. })
        ));
    }

    #[test]
    fn host_case_is_preserved() {
        assert_eq!(
            extract_hostname("https://API.Example.com:8443/v1").unwrap(),
            "API.Example.com:8443"
        );
        assert_eq!(extract_hostname("https://API.Example.COM").unwrap(), "API.Example.COM");
    }

    #[test]
    fn instant_omits_zero_fraction() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 27, 0, 0, 0).unwrap();
        assert_eq!(format_instant(&ts), "2025-01-27T00:00:00Z");
        assert_eq!(format_date(&ts), "20250127");

        let with_millis = ts + chrono::Duration::milliseconds(250);
        assert_eq!(format_instant(&with_millis), "2025-01-27T00:00:00.250Z");
    }

    #[test]
    fn sign_string_layout() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 27, 0, 0, 0).unwrap();
        let s = sign_string("get", "/v1/x", &ts, "h:8443", "Application/JSON", "v20190515");
        assert_eq!(
            s,
            "GET\n/v1/x\n2025-01-27T00:00:00Z\nhost:h:8443\ncontent-type:application/json\n\
             x-backendai-version:v20190515\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
