//! Authenticated HTTP client.

use crate::error::NetworkError;
use joblab_core::Config;
use reqwest::{Client, Response, header};
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client bound to one resolved [`Config`].
///
/// Each call issues exactly one request. A transport failure or non-2xx
/// status is fatal for the run; there is no retry or backoff.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    config: Config,
}

impl ApiClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] if the underlying HTTP client cannot be
    /// built (broken TLS environment).
    pub fn new(config: Config) -> Result<Self, NetworkError> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("joblab/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { inner, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Performs one authenticated GET request.
    ///
    /// Returns the response for any 2xx status. In debug mode the
    /// equivalent `curl` invocation is written to stderr first, with
    /// whitespace-containing arguments quoted; this changes observability
    /// only, never behavior.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] for a transport failure or any non-2xx
    /// status.
    pub async fn get(&self, url: &str) -> Result<Response, NetworkError> {
        if self.config.debug {
            eprintln!("{}", self.curl_equivalent(url));
        }
        debug!(url = %url, "GET");

        let response = self
            .inner
            .get(url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.token),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Performs a GET and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] as [`Self::get`] does, or if the body
    /// cannot be read.
    pub async fn get_text(&self, url: &str) -> Result<String, NetworkError> {
        Ok(self.get(url).await?.text().await?)
    }

    /// Performs a GET and returns the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] as [`Self::get`] does, or if the body
    /// cannot be read.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }

    /// Renders the request as a `curl` command line for diagnostics.
    fn curl_equivalent(&self, url: &str) -> String {
        let parts = [
            "curl".to_string(),
            "--header".to_string(),
            format!("Authorization: Bearer {}", self.config.token),
            url.to_string(),
        ];
        shell_words::join(&parts)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: "https://gitlab.example.com".to_string(),
            repo: "group/proj".to_string(),
            token: "secret".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_curl_equivalent_quotes_whitespace() {
        let client = ApiClient::new(config()).unwrap();
        let line = client.curl_equivalent("https://gitlab.example.com/projects/x/deployments");

        assert!(line.starts_with("curl --header "));
        // The header argument contains spaces and must be quoted as one token
        assert!(line.contains("'Authorization: Bearer secret'"));
        assert!(line.ends_with("https://gitlab.example.com/projects/x/deployments"));
    }
}
