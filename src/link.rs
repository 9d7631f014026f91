//! Checks applied to item links before they are handed to the system opener.
//!
//! Links come straight from provider responses, so only absolute `http` and
//! `https` URLs are passed on.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid link: {0}")]
    Invalid(#[from] url::ParseError),

    #[error("Refusing to open {0} link (only http/https)")]
    UnsupportedScheme(String),
}

/// Parse `raw` and accept it only if it is an http(s) URL.
pub fn validate_url_for_open(raw: &str) -> Result<Url, LinkError> {
    let url = Url::parse(raw.trim())?;
    // http(s) URLs always carry a host once parsed.
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(LinkError::UnsupportedScheme(url.scheme().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_web_links() {
        let url = validate_url_for_open(" https://example.com/story?id=1 ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(validate_url_for_open("http://news.test/a").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        for raw in ["file:///etc/passwd", "javascript:alert(1)", "ftp://host/x"] {
            assert!(
                matches!(validate_url_for_open(raw), Err(LinkError::UnsupportedScheme(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_relative_and_empty_links() {
        assert!(matches!(validate_url_for_open(""), Err(LinkError::Invalid(_))));
        assert!(matches!(validate_url_for_open("https://"), Err(LinkError::Invalid(_))));
        assert!(matches!(
            validate_url_for_open("/placeholder-news.jpg"),
            Err(LinkError::Invalid(_))
        ));
    }
}
