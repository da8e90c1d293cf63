//! Image reachability probing.
//!
//! Uses the curl crate (libcurl) to send a HEAD request and read back the
//! status code. Only an exact `200` counts as reachable; redirects are not
//! followed, so a 301/302 is unreachable too.

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::DEFAULT_PROBE_TIMEOUT_SECS;

/// Why a probe produced no status code.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("empty URL")]
    EmptyUrl,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("HEAD request failed: {0}")]
    Curl(#[from] curl::Error),
}

impl ProbeError {
    /// True when the request ran out of time (connect or total).
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Curl(e) if e.is_operation_timedout())
    }
}

/// Anything that can decide whether an image URL is reachable.
pub trait ImageProbe {
    fn is_reachable(&self, url: &str) -> bool;
}

impl<F> ImageProbe for F
where
    F: Fn(&str) -> bool,
{
    fn is_reachable(&self, url: &str) -> bool {
        self(url)
    }
}

/// HEAD-request probe with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HeadProbe {
    timeout: Duration,
}

impl Default for HeadProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }
}

/// curl reads a zero timeout as "wait forever".
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

impl HeadProbe {
    /// Probe with the given timeout, raised to at least one second.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: timeout.max(MIN_TIMEOUT),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs a HEAD request and returns the HTTP status code.
    ///
    /// Runs in the current thread and blocks for at most the timeout.
    pub fn status(&self, url: &str) -> Result<u32, ProbeError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ProbeError::EmptyUrl);
        }
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let mut easy = curl::easy::Easy::new();
        easy.url(parsed.as_str())?;
        easy.nobody(true)?; // HEAD request
        easy.follow_location(false)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(concat!("roster-audit/", env!("CARGO_PKG_VERSION")))?;
        easy.perform()?;

        Ok(easy.response_code()?)
    }
}

impl ImageProbe for HeadProbe {
    fn is_reachable(&self, url: &str) -> bool {
        match self.status(url) {
            Ok(200) => true,
            Ok(code) => {
                tracing::debug!(url, code, "image probe: non-200 status");
                false
            }
            Err(e) => {
                tracing::debug!(url, timeout = e.is_timeout(), "image probe failed: {}", e);
                false
            }
        }
    }
}

/// HEAD `url` with the default 5 second timeout; true only on HTTP 200.
/// Never fails: every error is an unreachable image.
pub fn check_image(url: &str) -> bool {
    HeadProbe::default().is_reachable(url)
}
