//! Brand lookup: domain normalization, provider fetch, and profile reduction.
//!
//! Given whatever the user typed, [`BrandResolver::resolve`] normalizes it to
//! a domain, makes exactly one authenticated GET to the brand provider, and
//! reduces the response to a [`BrandProfile`]. Failures are never retried;
//! they surface as `NotFound`, `Auth` or `Upstream` so the caller can offer a
//! retry or manual entry.

mod normalize;
mod payload;

use std::time::Duration;

use brandpitch_shared::{BrandPitchError, BrandProfile, BrandfetchConfig, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use normalize::normalize_domain;
pub use payload::{
    ProviderBrand, ProviderColor, ProviderFormat, ProviderLogo, resolve_logo,
    resolve_primary_color,
};

/// Default timeout in seconds for a brand lookup.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent string for provider requests.
const USER_AGENT: &str = concat!("BrandPitch/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Resolver options
// ---------------------------------------------------------------------------

/// Configuration for the brand resolver.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Provider API base URL (e.g. `https://api.brandfetch.io/v2`).
    pub base_url: String,
    /// Bearer token for the provider.
    pub api_key: Secret<String>,
    /// Timeout for the lookup request in seconds.
    pub timeout_secs: u64,
}

impl ResolverOptions {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Secret::new(api_key.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Build options from the `[brandfetch]` config section, reading the key
    /// from its env var.
    pub fn from_config(config: &BrandfetchConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key()?,
            timeout_secs: config.timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// BrandResolver
// ---------------------------------------------------------------------------

/// Resolves a raw domain to a [`BrandProfile`] via the brand provider.
pub struct BrandResolver {
    client: Client,
    base_url: Url,
    api_key: Secret<String>,
    timeout_secs: u64,
}

impl BrandResolver {
    /// Create a resolver. Fails with a config error on a bad base URL.
    pub fn new(options: ResolverOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            BrandPitchError::config(format!(
                "invalid brand provider URL '{}': {e}",
                options.base_url
            ))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| BrandPitchError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: options.api_key,
            timeout_secs: options.timeout_secs,
        })
    }

    /// Create a resolver from the `[brandfetch]` config section.
    pub fn from_config(config: &BrandfetchConfig) -> Result<Self> {
        Self::new(ResolverOptions::from_config(config)?)
    }

    /// Look up the brand behind `raw_input`.
    #[instrument(skip_all, fields(input = %raw_input.trim()))]
    pub async fn resolve(&self, raw_input: &str) -> Result<BrandProfile> {
        let domain = normalize_domain(raw_input);
        if domain.is_empty() {
            return Err(BrandPitchError::validation("brand domain is empty"));
        }

        let url = self.lookup_url(&domain)?;
        info!(%domain, "looking up brand");

        let response = self
            .client
            .get(url.as_str())
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrandPitchError::Upstream(format!(
                        "{domain}: request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    BrandPitchError::Upstream(format!("{domain}: {e}"))
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            404 => {
                debug!(%domain, "brand provider has no record");
                return Err(BrandPitchError::not_found(domain));
            }
            401 => {
                warn!(%domain, "brand provider rejected credentials");
                return Err(BrandPitchError::Auth(format!("HTTP {status}")));
            }
            _ => {
                return Err(BrandPitchError::Upstream(format!("{domain}: HTTP {status}")));
            }
        }

        let body = response.text().await.map_err(|e| {
            BrandPitchError::Upstream(format!("{domain}: failed to read body: {e}"))
        })?;

        let brand: ProviderBrand = serde_json::from_str(&body).map_err(|e| {
            BrandPitchError::Upstream(format!("{domain}: malformed brand payload: {e}"))
        })?;

        let profile = brand.into_profile(&domain);

        info!(
            name = %profile.name,
            has_logo = profile.logo.is_some(),
            primary_color = profile.primary_color.as_deref().unwrap_or("none"),
            "brand resolved"
        );

        Ok(profile)
    }

    /// `{base_url}/brands/{domain}`, with the domain as one escaped segment.
    fn lookup_url(&self, domain: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BrandPitchError::config(format!(
                    "brand provider URL cannot be a base: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("brands")
            .push(domain);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_for(server: &MockServer) -> BrandResolver {
        BrandResolver::new(ResolverOptions::new(server.uri(), "test-key")).unwrap()
    }

    #[test]
    fn lookup_url_appends_brand_segment() {
        let resolver =
            BrandResolver::new(ResolverOptions::new("https://api.brandfetch.io/v2/", "k")).unwrap();
        assert_eq!(
            resolver.lookup_url("uniqlo.com").unwrap().as_str(),
            "https://api.brandfetch.io/v2/brands/uniqlo.com"
        );
        assert_eq!(
            resolver.lookup_url("a/b").unwrap().as_str(),
            "https://api.brandfetch.io/v2/brands/a%2Fb"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = BrandResolver::new(ResolverOptions::new("not a url", "k")).err().unwrap();
        assert!(matches!(err, BrandPitchError::Config { .. }));
    }

    #[tokio::test]
    async fn resolves_profile_from_provider() {
        let server = MockServer::start().await;
        let body = std::fs::read_to_string("../../../fixtures/brandfetch/uniqlo.json")
            .expect("read brand fixture");

        Mock::given(method("GET"))
            .and(path("/brands/uniqlo.com"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let profile = resolver_for(&server)
            .resolve("https://www.uniqlo.com/us/en/")
            .await
            .unwrap();

        assert_eq!(profile.name, "UNIQLO");
        assert_eq!(profile.domain, "uniqlo.com");
        assert!(profile.logo.as_deref().unwrap().ends_with(".svg"));
        assert_eq!(profile.primary_color.as_deref(), Some("#FF0000"));
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brands/nope.example"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("nope.example").await.unwrap_err();
        match err {
            BrandPitchError::NotFound { domain } => assert_eq!(domain, "nope.example"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("uniqlo.com").await.unwrap_err();
        assert!(matches!(err, BrandPitchError::Auth(_)));
    }

    #[tokio::test]
    async fn server_error_maps_to_upstream_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("uniqlo.com").await.unwrap_err();
        assert!(matches!(err, BrandPitchError::Upstream(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn malformed_payload_maps_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("uniqlo.com").await.unwrap_err();
        match err {
            BrandPitchError::Upstream(msg) => assert!(msg.contains("malformed")),
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_maps_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut options = ResolverOptions::new(server.uri(), "test-key");
        options.timeout_secs = 1;
        let err = BrandResolver::new(options)
            .unwrap()
            .resolve("uniqlo.com")
            .await
            .unwrap_err();
        match err {
            BrandPitchError::Upstream(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_input_fails_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = resolver_for(&server).resolve("   ").await.unwrap_err();
        assert!(matches!(err, BrandPitchError::Validation { .. }));
    }
}
