//! HTTP transport used to reach the block explorer.

use regex::Regex;
use reqwest::Client;
use std::error::Error as StdError;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Chain validation failures only, in rustls and OpenSSL wording.
static CERTIFICATE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)unknown ?issuer|bad ?signature|\bexpired\b|not ?valid ?yet|certpath ?validat|certificate verify failed|unable to get local issuer|self[- ]signed|untrusted",
    )
    .expect("certificate error pattern is valid")
});

// A certificate issued for another host is never a reason to drop TLS.
static NAME_MISMATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)not ?valid ?for ?name|hostname mismatch|ip address mismatch")
        .expect("name mismatch pattern is valid")
});

#[derive(Debug, Error)]
pub enum TransportError {
    /// The server's certificate chain could not be validated.
    #[error("Certificate validation failed: {0}")]
    Certificate(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),
}

impl TransportError {
    pub fn is_certificate(&self) -> bool {
        matches!(self, TransportError::Certificate(_))
    }
}

/// Issues one GET per call and returns the response body. Retries are the caller's concern.
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { inner, timeout })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            inner: Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        debug!("GET {}", redact_api_key(url));

        let response = self
            .inner
            .get(url)
            .header("accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| classify(&e))
    }
}

fn classify(error: &reqwest::Error) -> TransportError {
    let chain = error_chain(error);
    if is_certificate_error(&chain) {
        TransportError::Certificate(chain)
    } else {
        TransportError::Network(chain)
    }
}

/// Flatten an error and all of its sources into one message.
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(crate) fn is_certificate_error(message: &str) -> bool {
    CERTIFICATE_ERROR.is_match(message) && !NAME_MISMATCH.is_match(message)
}

/// Strip the `apikey` query value so URLs can be logged.
pub fn redact_api_key(url: &str) -> String {
    match url.find("apikey=") {
        Some(idx) => {
            let value_start = idx + "apikey=".len();
            let value_end = url[value_start..]
                .find('&')
                .map_or(url.len(), |end| value_start + end);
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}
