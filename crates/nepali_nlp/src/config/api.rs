//! API endpoint configuration for the hosted inference service

use lazy_static::lazy_static;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Production backend used when nothing else is configured
pub const PRODUCTION_BASE_URL: &str = "https://nlp-backend.itclub.asmitphuyal.com.np";

pub const ENV_API_URL: &str = "NEPALI_NLP_API_URL";
pub const ENV_DEV_PROXY: &str = "NEPALI_NLP_DEV_PROXY";
pub const ENV_TIMEOUT_SECS: &str = "NEPALI_NLP_TIMEOUT_SECS";

/// Where the base URL came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBase {
    /// Explicit override from the environment or command line
    Override(String),
    /// Development reverse-proxy prefix (e.g. `http://localhost:8009/api`)
    DevProxy(String),
    /// Hard-coded production fallback
    Production,
}

impl ApiBase {
    pub fn url(&self) -> &str {
        match self {
            Self::Override(url) | Self::DevProxy(url) => url,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::DevProxy(_) => "dev-proxy",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url(), self.source())
    }
}

/// Resolve the base URL: explicit override > development proxy > production fallback.
///
/// Blank values count as unset. Trailing slashes are dropped so endpoint paths join cleanly.
pub fn resolve_base_url(override_url: Option<&str>, dev_proxy: Option<&str>) -> ApiBase {
    fn clean(value: Option<&str>) -> Option<String> {
        value
            .map(|v| v.trim().trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    if let Some(url) = clean(override_url) {
        return ApiBase::Override(url);
    }
    if let Some(url) = clean(dev_proxy) {
        return ApiBase::DevProxy(url);
    }
    ApiBase::Production
}

/// Remote endpoints exposed by the inference service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Generate,
    Lemmatize,
    Ner,
    Stemmer,
    Aspect,
    Health,
    ModelInfo,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Generate => "/generate",
            Self::Lemmatize => "/lemmatize",
            Self::Ner => "/ner",
            Self::Stemmer => "/stemmer",
            Self::Aspect => "/aspect",
            Self::Health => "/health",
            Self::ModelInfo => "/model-info",
        }
    }
}

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            temperature: 0.7,
            do_sample: true,
        }
    }
}

/// Client-side settings for talking to the inference service
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base: ApiBase,
    /// Request timeout; `None` leaves the HTTP client's default in place
    pub timeout: Option<Duration>,
    pub generation: GenerationParams,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: ApiBase::Production,
            timeout: None,
            generation: GenerationParams::default(),
        }
    }
}

impl ApiConfig {
    /// Build a config pointed at an explicit base URL
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base: resolve_base_url(Some(base_url.as_ref()), None),
            ..Default::default()
        }
    }

    /// Build a config from the `NEPALI_NLP_*` environment variables
    pub fn from_env() -> Self {
        let override_url = env::var(ENV_API_URL).ok();
        let dev_proxy = env::var(ENV_DEV_PROXY).ok();
        let timeout = env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            base: resolve_base_url(override_url.as_deref(), dev_proxy.as_deref()),
            timeout,
            ..Default::default()
        }
    }

    pub fn with_base(mut self, base: ApiBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_generation(mut self, params: GenerationParams) -> Self {
        self.generation = params;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base.url()
    }

    /// Full URL for an endpoint
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base.url(), endpoint.path())
    }

    /// Reject settings the service could never accept
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.generation.max_length == 0 {
            return Err(ClientError::InvalidConfig("max_length must be positive".into()));
        }
        if !self.generation.temperature.is_finite() || self.generation.temperature < 0.0 {
            return Err(ClientError::InvalidConfig(format!(
                "temperature must be a non-negative number, got {}",
                self.generation.temperature
            )));
        }
        Ok(())
    }
}

lazy_static! {
    /// Configuration read from the environment at first use
    pub static ref API_CONFIG: ApiConfig = ApiConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ApiConfig::default().validate().is_ok());
        assert!(matches!(
            ApiConfig::new("localhost:5001").validate(),
            Err(ClientError::InvalidConfig(_))
        ));

        let bad = ApiConfig::default().with_generation(GenerationParams {
            temperature: -1.0,
            ..Default::default()
        });
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_override_wins() {
        let base = resolve_base_url(
            Some("http://localhost:5001/"),
            Some("http://localhost:8009/api"),
        );
        assert_eq!(base, ApiBase::Override("http://localhost:5001".to_string()));
    }

    #[test]
    fn test_dev_proxy_before_production() {
        let base = resolve_base_url(None, Some("http://localhost:8009/api"));
        assert_eq!(base, ApiBase::DevProxy("http://localhost:8009/api".to_string()));

        let base = resolve_base_url(Some("   "), Some("http://localhost:8009/api"));
        assert_eq!(base.source(), "dev-proxy");
    }

    #[test]
    fn test_production_fallback() {
        let base = resolve_base_url(None, Some(""));
        assert_eq!(base, ApiBase::Production);
        assert_eq!(base.url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_endpoint_url() {
        let config = ApiConfig::new("http://localhost:5001");
        assert_eq!(config.url(Endpoint::Ner), "http://localhost:5001/ner");
        assert_eq!(config.url(Endpoint::Stemmer), "http://localhost:5001/stemmer");
        assert_eq!(config.url(Endpoint::ModelInfo), "http://localhost:5001/model-info");
    }

    #[test]
    fn test_generation_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.max_length, 150);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert!(params.do_sample);
    }
}
