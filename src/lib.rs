//! # company-code-resolver
//!
//! Resolves contact phone numbers to company codes for reporting.
//!
//! A batch of phone numbers is looked up against a remote company service with a bounded
//! number of lookups in flight. Every raw response (or failure) is classified into exactly
//! one outcome: a genuine company code, `NOT_FOUND`, `NO_DATA`, `UNKNOWN` or `ERROR`.
//! Results are then aggregated into a phone-to-code mapping, the sorted set of genuine
//! codes, and summary counts.
//!
//! ## Design Philosophy
//!
//! - **Never fails per phone** - every input gets a result, failures become sentinels
//! - **Bounded** - at most `concurrency` lookups run at once
//! - **Deadline-aware** - a batch stops at its deadline and keeps what finished
//! - **Library-first** - no subscriber or server, embed it in your handlers
//!
//! ## Quick Start
//!
//! ```no_run
//! use company_code_resolver::{CompanyCodeResolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ResolverConfig::default();
//!     config.lookup.base_url = "https://lookup.example.com".to_string();
//!
//!     let resolver = CompanyCodeResolver::new(config)?;
//!
//!     let request = resolver.prepare_batch(["0811111111", "0822222222"], None)?;
//!     let result = resolver.resolve_batch(&request).await;
//!
//!     println!("{:?}", result.summary());
//!     for code in result.unique_company_codes() {
//!         println!("company: {code}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Result aggregation (mapping, unique codes, summary)
pub mod aggregate;
/// Batch duration estimates
pub mod budget;
/// Raw lookup outcome classification
pub mod classifier;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Bounded concurrent batch execution
pub mod executor;
/// Company lookup seam and HTTP implementation
pub mod lookup;
/// Report helpers over resolved results
pub mod report;
/// High-level resolver facade
pub mod resolver;
/// Core types
pub mod types;

pub use aggregate::{PhoneToCompanyMapping, summarize, to_phone_mapping, unique_company_codes};
pub use classifier::{RawOutcome, classify};
pub use config::{LookupServiceConfig, ResolverConfig};
pub use error::{Error, LookupError, Result};
pub use executor::BatchExecutor;
pub use lookup::{CompanyLookup, HttpCompanyLookup, LookupClient};
pub use resolver::CompanyCodeResolver;
pub use types::{
    BatchRequest, BatchResult, CompanyCode, CompanyCodeResult, PhoneNumber, ResolutionEvent,
    ResultCategory, Summary,
};

/// Re-exported so callers can cancel batches without depending on `tokio-util` directly
pub use tokio_util::sync::CancellationToken;
