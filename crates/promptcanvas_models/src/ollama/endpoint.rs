//! Host normalization and endpoint URLs.

use promptcanvas_error::{ClientError, ClientErrorKind};
use reqwest::Url;

/// Path probed to check that a server is up.
pub const PROBE_PATH: &str = "/api/tags";

/// Path receiving generation requests.
pub const GENERATE_PATH: &str = "/api/generate";

/// Builds the URL for `endpoint` on `host`.
///
/// Hosts without an `http://` or `https://` prefix get `http://` prepended.
/// Trailing slashes on the host's path are dropped before `endpoint` is
/// appended, so `localhost:11434/` and `localhost:11434` resolve the same way
/// and a reverse-proxy prefix such as `example.com/ollama/` is preserved.
///
/// # Errors
///
/// Returns [`ClientErrorKind::InvalidUrl`] when the host does not parse or has
/// no host component.
///
/// # Examples
///
/// ```
/// use promptcanvas_models::{GENERATE_PATH, endpoint_url};
///
/// let url = endpoint_url("localhost:11434/", GENERATE_PATH).unwrap();
/// assert_eq!(url.as_str(), "http://localhost:11434/api/generate");
/// ```
pub fn endpoint_url(host: &str, endpoint: &str) -> Result<Url, ClientError> {
    let host = host.trim();
    let with_scheme = if has_http_scheme(host) {
        host.to_string()
    } else {
        format!("http://{host}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| {
        ClientError::new(ClientErrorKind::InvalidUrl(format!("{host}: {e}")))
    })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::new(ClientErrorKind::InvalidUrl(format!(
            "{host}: missing host"
        ))));
    }

    let path = format!("{}{}", url.path().trim_end_matches('/'), endpoint);
    url.set_path(&path);
    Ok(url)
}

fn has_http_scheme(host: &str) -> bool {
    let lower = host.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
