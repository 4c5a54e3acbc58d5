//! Lookup client: the company lookup seam and the classifying client built on it.

mod http;

pub use http::HttpCompanyLookup;

use std::sync::Arc;

use crate::classifier::{RawOutcome, classify};
use crate::types::{CompanyCodeResult, PhoneNumber};

/// Abstraction over the remote company lookup service, enabling testability.
///
/// One call per phone number. Implementations report failures through
/// [`LookupError`](crate::error::LookupError); they do not retry and do not cache.
#[async_trait::async_trait]
pub trait CompanyLookup: Send + Sync {
    /// Look up a single phone number, returning the decoded response body
    async fn lookup(&self, phone_number: &PhoneNumber) -> RawOutcome;
}

/// Resolves single phone numbers into classified results.
///
/// [`resolve`](LookupClient::resolve) has no error path: every failure of the
/// underlying lookup becomes an `ERROR` result.
#[derive(Clone)]
pub struct LookupClient {
    lookup: Arc<dyn CompanyLookup>,
}

impl LookupClient {
    /// Create a client over any [`CompanyLookup`]
    pub fn new(lookup: Arc<dyn CompanyLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve one phone number
    pub async fn resolve(&self, phone_number: &PhoneNumber) -> CompanyCodeResult {
        let raw = self.lookup.lookup(phone_number).await;

        if let Err(e) = &raw {
            tracing::warn!(phone = %phone_number, error = %e, "company lookup failed");
        }

        let result = classify(phone_number, raw);
        tracing::debug!(
            phone = %phone_number,
            company_code = %result.company_code,
            success = result.success,
            "company lookup classified"
        );
        result
    }
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient").finish_non_exhaustive()
    }
}
