//! Startup fetch of the two remote sources. One GET per source, no
//! retries: the dashboard cannot render without data, so any failure here
//! is fatal to startup.

use tracing::info;

/// Refuse to buffer upstream responses beyond this.
const MAX_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug)]
pub enum FetchError {
    Network(String),
    Http(u16),
    TooLarge(usize),
    NotUtf8,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(reason) => write!(f, "fetch failed: {reason}"),
            FetchError::Http(status) => write!(f, "upstream HTTP {status}"),
            FetchError::TooLarge(len) => {
                write!(f, "payload too large: {len} bytes (max {MAX_BYTES})")
            }
            FetchError::NotUtf8 => write!(f, "upstream response was not valid UTF-8"),
        }
    }
}

impl std::error::Error for FetchError {}

pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if bytes.len() > MAX_BYTES {
        return Err(FetchError::TooLarge(bytes.len()));
    }

    info!("fetched {url} ({} bytes)", bytes.len());
    String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::NotUtf8)
}
