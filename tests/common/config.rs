//! Test configuration helpers for building resolvers against mock and live lookup services

use company_code_resolver::{CompanyCodeResolver, LookupServiceConfig, ResolverConfig};
use std::time::Duration;
use wiremock::MockServer;

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Resolver configuration pointing at a wiremock server
pub fn mock_config(server: &MockServer) -> ResolverConfig {
    ResolverConfig {
        lookup: LookupServiceConfig {
            base_url: server.uri(),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Resolver backed by the HTTP lookup client, talking to `server`
pub fn mock_resolver(server: &MockServer) -> CompanyCodeResolver {
    CompanyCodeResolver::new(mock_config(server)).expect("mock resolver config is valid")
}

/// Load lookup service configuration from environment variables
///
/// Required environment variables:
/// - `LOOKUP_BASE_URL` - Base URL of the company lookup service
///
/// Optional environment variables:
/// - `LOOKUP_PATH` - Endpoint path (default: /api/company-code)
/// - `LOOKUP_AUTH_HEADER` - Authorization header value
/// - `LOOKUP_KNOWN_PHONE` - A phone number known to resolve to a company
pub fn load_live_config() -> Result<ResolverConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("LOOKUP_BASE_URL")
        .map_err(|_| ConfigError("LOOKUP_BASE_URL not set in environment".to_string()))?;

    let mut lookup = LookupServiceConfig {
        base_url,
        auth_header: std::env::var("LOOKUP_AUTH_HEADER").ok(),
        ..Default::default()
    };
    if let Ok(path) = std::env::var("LOOKUP_PATH") {
        lookup.lookup_path = path;
    }

    Ok(ResolverConfig {
        lookup,
        ..Default::default()
    })
}

/// Check whether live lookup credentials are available
pub fn has_live_config() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("LOOKUP_BASE_URL").is_ok()
}
