//! Tests against a real company lookup service
//!
//! Configured from .env and marked #[ignore] so they never run in normal CI.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --features live-tests --test live_lookup -- --ignored --nocapture
//! ```
//!
//! # Required environment variables (.env file)
//!
//! - `LOOKUP_BASE_URL` - Base URL of the lookup service
//! - `LOOKUP_KNOWN_PHONE` - A phone number known to resolve (optional)

#![cfg(feature = "live-tests")]

mod common;

use common::{has_live_config, load_live_config};
use company_code_resolver::{CompanyCodeResolver, PhoneNumber};

/// An unknown number must come back as a sentinel, never a transport error
#[tokio::test]
#[ignore]
async fn test_unknown_number_is_not_an_error() {
    if !has_live_config() {
        eprintln!("Skipping: LOOKUP_BASE_URL not set");
        return;
    }
    let resolver = CompanyCodeResolver::new(load_live_config().unwrap()).unwrap();

    let phone = PhoneNumber::new("+000000000000").unwrap();
    let result = resolver.resolve_one(&phone).await;

    println!("{result:?}");
    assert!(result.success, "lookup call failed: {result:?}");
    assert!(result.company_code.is_sentinel());
}

/// A known number resolves to a genuine company code
#[tokio::test]
#[ignore]
async fn test_known_number_resolves() {
    if !has_live_config() {
        eprintln!("Skipping: LOOKUP_BASE_URL not set");
        return;
    }
    let Ok(known) = std::env::var("LOOKUP_KNOWN_PHONE") else {
        eprintln!("Skipping: LOOKUP_KNOWN_PHONE not set");
        return;
    };
    let resolver = CompanyCodeResolver::new(load_live_config().unwrap()).unwrap();

    let request = resolver.prepare_batch([known], None).unwrap();
    let result = resolver.resolve_batch(&request).await;

    println!("{:?}", result.summary());
    assert_eq!(result.summary().successful, 1);
    assert_eq!(result.unique_company_codes().len(), 1);
}
