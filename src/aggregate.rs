//! Reductions over batch results: phone mapping, unique codes, and summary counters.
//!
//! All functions are pure; running them twice on the same results yields the same output.

use std::collections::{BTreeSet, HashMap};

use crate::types::{CompanyCode, CompanyCodeResult, PhoneNumber, ResultCategory, Summary};

/// Phone number to company code, sentinels included
pub type PhoneToCompanyMapping = HashMap<PhoneNumber, CompanyCode>;

/// Map every resolved phone number to its company code
///
/// Results are one per input phone, so each key appears once.
pub fn to_phone_mapping(results: &[CompanyCodeResult]) -> PhoneToCompanyMapping {
    results
        .iter()
        .map(|r| (r.phone_number.clone(), r.company_code.clone()))
        .collect()
}

/// Distinct genuine company codes from successful results, sorted ascending
///
/// Sentinel codes never appear here; these are the values offered as report filters.
pub fn unique_company_codes(results: &[CompanyCodeResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| r.category() == ResultCategory::Successful)
        .map(|r| r.company_code.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Count results per category in a single pass
pub fn summarize(results: &[CompanyCodeResult]) -> Summary {
    results.iter().fold(
        Summary {
            total: results.len(),
            ..Summary::default()
        },
        |mut summary, result| {
            match result.category() {
                ResultCategory::Successful => summary.successful += 1,
                ResultCategory::Unknown => summary.unknown += 1,
                ResultCategory::Error => summary.errors += 1,
            }
            summary
        },
    )
}
