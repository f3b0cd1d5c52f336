use std::time::Duration;

use depdocs::SourceError;
use serde::de::DeserializeOwned;

pub const DEFAULT_PYPI_URL: &str = "https://pypi.org";
pub const DEFAULT_NPM_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default per-request timeout for registry lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("depdocs/", env!("CARGO_PKG_VERSION"));

/// Endpoints and credentials for the remote services.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub pypi_url: String,
    pub npm_url: String,
    pub github_raw_url: String,
    pub github_api_url: String,
    /// Sent to the GitHub REST API only.
    pub github_token: Option<String>,
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pypi_url: DEFAULT_PYPI_URL.to_owned(),
            npm_url: DEFAULT_NPM_URL.to_owned(),
            github_raw_url: DEFAULT_GITHUB_RAW_URL.to_owned(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_owned(),
            github_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RegistryConfig {
    /// Point every service at one base URL (a mock server in tests).
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            pypi_url: base.clone(),
            npm_url: base.clone(),
            github_raw_url: base.clone(),
            github_api_url: base,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }
}

/// Shared HTTP client plus the endpoints it talks to.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub(crate) fn request(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url)
    }

    /// Send a request, turning transport failures and non-2xx statuses into
    /// source errors.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, SourceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Network(format!("timed out fetching {url}"))
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SourceError::NotFound(url.to_owned()));
        }
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        self.send(self.request(url), url)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("{url}: {e}")))
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        self.send(self.request(url), url)
            .await?
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read body of {url}: {e}")))
    }
}
