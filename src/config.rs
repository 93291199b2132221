//! Where prepared requests are headed.
//!
//! [`ServiceConfig`] describes the compression service endpoint the
//! submission pipeline will call, plus the user-facing strings that go with
//! it. It is built via [`ServiceConfigBuilder`]; `build()` rejects base URLs
//! that cannot be joined with the endpoint path.

use crate::error::CtpsError;
use crate::tool::{CTPS_ENDPOINT, CTPS_ERROR_MESSAGE, CTPS_FILE_PREFIX};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default base URL of the compression service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for the remote compression service.
///
/// # Example
/// ```rust
/// use ctps_compress::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .base_url("https://pdf.example.org")
///     .timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(
///     config.endpoint_url().unwrap().as_str(),
///     "https://pdf.example.org/api/v1/misc/compress-pdf"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Scheme + host (+ optional path prefix) of the service. Default: `http://localhost:8080`.
    pub base_url: String,

    /// Endpoint path. Default: `/api/v1/misc/compress-pdf`, shared with the
    /// general-purpose compress tool.
    pub endpoint: String,

    /// Per-request timeout the submission pipeline should apply. Default: 120.
    ///
    /// Large image-heavy scans at level 9 take a while server-side.
    pub timeout_secs: u64,

    /// Prefix for result file names. Default: `ctps_`.
    pub file_prefix: String,

    /// Message shown when the service call fails without a usable detail.
    pub error_message: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: CTPS_ENDPOINT.to_string(),
            timeout_secs: 120,
            file_prefix: CTPS_FILE_PREFIX.to_string(),
            error_message: CTPS_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the compression endpoint.
    ///
    /// The endpoint path is appended to the base URL's path. Bases carrying a
    /// query or fragment are rejected since the path would end up inside them.
    pub fn endpoint_url(&self) -> Result<Url, CtpsError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CtpsError::InvalidConfig(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(CtpsError::InvalidConfig(format!(
                "Base URL '{}' must not have a query or fragment",
                self.base_url
            )));
        }

        url.path_segments_mut()
            .map_err(|_| {
                CtpsError::InvalidConfig(format!(
                    "Base URL '{}' cannot hold a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(self.endpoint.split('/').filter(|s| !s.is_empty()));

        Ok(url)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Scheme + host (+ path prefix). No query or fragment.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Endpoint path, appended to the base URL's path.
    pub fn endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.endpoint = path.into();
        self
    }

    /// Request timeout in seconds; at least 1.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    /// Prefix for result file names.
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// Fallback failure text. Must not be blank.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.config.error_message = message.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, CtpsError> {
        let c = &self.config;
        let url = c.endpoint_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CtpsError::InvalidConfig(format!(
                "Base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.error_message.trim().is_empty() {
            return Err(CtpsError::InvalidConfig(
                "Error message must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_url() {
        let c = ServiceConfig::default();
        assert_eq!(
            c.endpoint_url().unwrap().as_str(),
            "http://localhost:8080/api/v1/misc/compress-pdf"
        );
    }

    #[test]
    fn joins_without_double_slash() {
        let c = ServiceConfig::builder()
            .base_url("https://pdf.example.org/stirling/")
            .build()
            .unwrap();
        assert_eq!(
            c.endpoint_url().unwrap().as_str(),
            "https://pdf.example.org/stirling/api/v1/misc/compress-pdf"
        );
    }

    #[test]
    fn rejects_base_with_query() {
        let err = ServiceConfig::builder()
            .base_url("http://svc.local:8080/?tenant=a")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("query or fragment"), "got: {err}");
    }

    #[test]
    fn rejects_base_with_fragment() {
        let err = ServiceConfig::builder()
            .base_url("http://svc.local:8080/#main")
            .build()
            .unwrap_err();
        assert!(matches!(err, CtpsError::InvalidConfig(_)));
    }

    #[test]
    fn endpoint_lands_in_path() {
        let c = ServiceConfig::builder()
            .base_url("http://svc.local:8080")
            .endpoint("api/v1/misc/compress-pdf/")
            .build()
            .unwrap();
        let url = c.endpoint_url().unwrap();
        assert_eq!(url.path(), "/api/v1/misc/compress-pdf");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn rejects_cannot_be_a_base() {
        let err = ServiceConfig::builder()
            .base_url("mailto:ops@example.org")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cannot hold a path"), "got: {err}");
    }

    #[test]
    fn rejects_garbage_url() {
        let err = ServiceConfig::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, CtpsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ServiceConfig::builder()
            .base_url("ftp://files.example.org")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn rejects_empty_error_message() {
        assert!(ServiceConfig::builder().error_message("  ").build().is_err());
    }

    #[test]
    fn timeout_floor() {
        let c = ServiceConfig::builder().timeout_secs(0).build().unwrap();
        assert_eq!(c.timeout_secs, 1);
    }
}
