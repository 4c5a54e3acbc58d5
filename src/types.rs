//! Core types for company-code-resolver

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Sentinel code: the remote payload was not recognized
pub const UNKNOWN: &str = "UNKNOWN";
/// Sentinel code: the lookup failed, or the remote service reported an error
pub const ERROR: &str = "ERROR";
/// Sentinel code: the remote service has no record for the phone number
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Sentinel code: a record exists but carries no usable company code
pub const NO_DATA: &str = "NO_DATA";

/// Phone number used as the lookup key and as the join key for results
///
/// Phone numbers are opaque: the value is passed to the lookup service exactly as the
/// caller supplied it. The only rule enforced here is that the value is not empty or
/// whitespace-only.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a PhoneNumber, returning `None` for empty or whitespace-only values
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Get the phone number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the PhoneNumber, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for PhoneNumber {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Company code attached to a resolved phone number
///
/// Either a genuine organizational code or one of the four sentinels. Serializes as a
/// plain string (`"X001"`, `"NOT_FOUND"`, ...), so a remote value that spells a sentinel
/// is read back as that sentinel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompanyCode {
    /// Genuine organizational company code
    Code(String),
    /// Unrecognized payload shape
    Unknown,
    /// Call-level failure, or an error signalled by the remote payload
    Error,
    /// Remote service has no record
    NotFound,
    /// Record exists without a usable code
    NoData,
}

impl CompanyCode {
    /// Returns true for `UNKNOWN`, `ERROR`, `NOT_FOUND` and `NO_DATA`
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, CompanyCode::Code(_))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        match self {
            CompanyCode::Code(code) => code,
            CompanyCode::Unknown => UNKNOWN,
            CompanyCode::Error => ERROR,
            CompanyCode::NotFound => NOT_FOUND,
            CompanyCode::NoData => NO_DATA,
        }
    }
}

impl From<String> for CompanyCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            UNKNOWN => CompanyCode::Unknown,
            ERROR => CompanyCode::Error,
            NOT_FOUND => CompanyCode::NotFound,
            NO_DATA => CompanyCode::NoData,
            _ => CompanyCode::Code(value),
        }
    }
}

impl From<&str> for CompanyCode {
    fn from(value: &str) -> Self {
        CompanyCode::from(value.to_string())
    }
}

impl From<CompanyCode> for String {
    fn from(code: CompanyCode) -> Self {
        match code {
            CompanyCode::Code(code) => code,
            sentinel => sentinel.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible outcome category of a single result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCategory {
    /// Genuine company code resolved
    Successful,
    /// Call completed, but no usable code (`UNKNOWN`, `NOT_FOUND`, `NO_DATA`)
    Unknown,
    /// Call failed, or the payload signalled `ERROR`
    Error,
}

/// Outcome of resolving one phone number
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCodeResult {
    /// The phone number that was resolved
    pub phone_number: PhoneNumber,
    /// Resolved company code or sentinel
    pub company_code: CompanyCode,
    /// Human-readable company name (absent for sentinels)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Whether the remote call completed with parseable data
    pub success: bool,
}

impl CompanyCodeResult {
    /// A resolved result. Sentinel codes never carry a name.
    pub fn resolved(
        phone_number: PhoneNumber,
        company_code: CompanyCode,
        company_name: Option<String>,
    ) -> Self {
        let company_name = if company_code.is_sentinel() {
            None
        } else {
            company_name
        };
        Self {
            phone_number,
            company_code,
            company_name,
            success: true,
        }
    }

    /// A call-level failure: always `ERROR` with `success == false`
    pub fn failed(phone_number: PhoneNumber) -> Self {
        Self {
            phone_number,
            company_code: CompanyCode::Error,
            company_name: None,
            success: false,
        }
    }

    /// Category used by the summary counters
    pub fn category(&self) -> ResultCategory {
        match (&self.company_code, self.success) {
            (_, false) | (CompanyCode::Error, _) => ResultCategory::Error,
            (CompanyCode::Code(_), true) => ResultCategory::Successful,
            (CompanyCode::Unknown | CompanyCode::NotFound | CompanyCode::NoData, true) => {
                ResultCategory::Unknown
            }
        }
    }
}

/// A set of distinct phone numbers resolved under one concurrency cap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    /// Distinct phone numbers to resolve
    pub phone_numbers: BTreeSet<PhoneNumber>,
    /// Requested number of concurrent lookups (at least 1)
    pub concurrency: usize,
}

impl BatchRequest {
    /// Default concurrency used when the caller does not ask for one
    pub const DEFAULT_CONCURRENCY: usize = 3;

    /// Build a request from raw strings, dropping empty values and duplicates
    pub fn new<I, S>(phone_numbers: I, concurrency: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phone_numbers: phone_numbers
                .into_iter()
                .filter_map(PhoneNumber::new)
                .collect(),
            concurrency,
        }
    }

    /// Number of workers actually started: never more than the number of phone numbers
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1).min(self.phone_numbers.len())
    }

    /// Number of distinct phone numbers
    pub fn len(&self) -> usize {
        self.phone_numbers.len()
    }

    /// Returns true if there is nothing to resolve
    pub fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty()
    }
}

/// Summary counters over a batch
///
/// `successful + errors + unknown == total` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of results
    pub total: usize,
    /// Results with a genuine company code
    pub successful: usize,
    /// Failed lookups and `ERROR` payloads
    pub errors: usize,
    /// `UNKNOWN`, `NOT_FOUND` and `NO_DATA` results
    pub unknown: usize,
}

/// Results of one batch, exactly one per input phone number, in no particular order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// One result per phone number. Key by `phone_number`, never by position.
    pub results: Vec<CompanyCodeResult>,
    /// The batch deadline expired before every lookup completed
    pub timed_out: bool,
    /// The caller cancelled the batch before every lookup completed
    pub cancelled: bool,
    /// Phone numbers whose lookup never completed and were recorded as `ERROR`
    pub abandoned: usize,
    /// Wall-clock time spent on the batch
    #[serde(with = "duration_ms_serde")]
    pub elapsed: Duration,
}

impl BatchResult {
    /// Summary counters
    pub fn summary(&self) -> Summary {
        crate::aggregate::summarize(&self.results)
    }

    /// Phone number to company code mapping, sentinels included
    pub fn phone_mapping(&self) -> crate::aggregate::PhoneToCompanyMapping {
        crate::aggregate::to_phone_mapping(&self.results)
    }

    /// Sorted distinct genuine company codes
    pub fn unique_company_codes(&self) -> Vec<String> {
        crate::aggregate::unique_company_codes(&self.results)
    }

    /// Returns true if every lookup completed
    pub fn is_complete(&self) -> bool {
        self.abandoned == 0
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if the batch had no input
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Event emitted while a batch is being resolved
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionEvent {
    /// Workers are starting
    BatchStarted {
        /// Number of distinct phone numbers
        total: usize,
        /// Number of workers started
        concurrency: usize,
    },

    /// One lookup finished (any category)
    LookupCompleted {
        /// Phone number that was resolved
        phone_number: PhoneNumber,
        /// Resolved code or sentinel
        company_code: CompanyCode,
        /// Whether the remote call succeeded
        success: bool,
        /// Lookups finished so far
        completed: usize,
        /// Lookups in the batch
        total: usize,
    },

    /// The batch returned to the caller
    BatchFinished {
        /// Final counters
        summary: Summary,
        /// Wall-clock milliseconds
        elapsed_ms: u64,
        /// Whether the deadline expired
        timed_out: bool,
        /// Whether the caller cancelled the batch
        cancelled: bool,
        /// Lookups recorded as `ERROR` because they never completed
        abandoned: usize,
    },
}

// Duration as whole milliseconds
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
