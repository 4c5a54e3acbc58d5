//! Report helpers: attach resolved company codes to chat records and group contacts.
//!
//! These are the reductions reporting handlers run after a batch: tagging each chat row
//! with its company, building the company filter list, and grouping contacts per company
//! with counts and the most recent contact time.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CompanyCode, CompanyCodeResult};

/// One chat-history row as supplied by the reporting database layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    /// Phone number of the contact
    pub phone_number: String,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
    /// Menu state the contact was in, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_state: Option<String>,
}

/// A chat record with its company attached
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedRecord {
    /// The original record
    #[serde(flatten)]
    pub record: ChatRecord,
    /// Resolved company code or sentinel
    pub company_code: CompanyCode,
    /// Company name, when the code is genuine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Contacts of one company
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactGroup {
    /// Company code or sentinel
    pub company_code: CompanyCode,
    /// Company name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Distinct phone numbers
    pub contact_count: usize,
    /// Chat records
    pub record_count: usize,
    /// Most recent record timestamp
    pub last_contact: DateTime<Utc>,
}

/// Distinct phone numbers to resolve, skipping empty and whitespace-only values
pub fn collect_phone_numbers(records: &[ChatRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| !r.phone_number.trim().is_empty())
        .map(|r| r.phone_number.clone())
        .collect()
}

/// Attach company code and name to every record
///
/// Records whose phone number has no result get `UNKNOWN`.
pub fn tag_records(records: &[ChatRecord], results: &[CompanyCodeResult]) -> Vec<TaggedRecord> {
    let by_phone: HashMap<&str, &CompanyCodeResult> = results
        .iter()
        .map(|r| (r.phone_number.as_str(), r))
        .collect();

    records
        .iter()
        .map(|record| {
            let (company_code, company_name) = match by_phone.get(record.phone_number.as_str()) {
                Some(result) => (result.company_code.clone(), result.company_name.clone()),
                None => (CompanyCode::Unknown, None),
            };
            TaggedRecord {
                record: record.clone(),
                company_code,
                company_name,
            }
        })
        .collect()
}

/// Group tagged records by company code
///
/// Genuine codes come first in ascending order, followed by the sentinel groups.
pub fn group_by_company(tagged: &[TaggedRecord]) -> Vec<CompanyContactGroup> {
    struct Acc<'a> {
        name: Option<&'a str>,
        contacts: HashSet<&'a str>,
        records: usize,
        last_contact: DateTime<Utc>,
    }

    let mut groups: BTreeMap<&CompanyCode, Acc<'_>> = BTreeMap::new();
    for t in tagged {
        let acc = groups.entry(&t.company_code).or_insert_with(|| Acc {
            name: None,
            contacts: HashSet::new(),
            records: 0,
            last_contact: t.record.timestamp,
        });
        if acc.name.is_none() {
            acc.name = t.company_name.as_deref();
        }
        acc.contacts.insert(t.record.phone_number.as_str());
        acc.records += 1;
        acc.last_contact = acc.last_contact.max(t.record.timestamp);
    }

    groups
        .into_iter()
        .map(|(code, acc)| CompanyContactGroup {
            company_code: code.clone(),
            company_name: acc.name.map(str::to_string),
            contact_count: acc.contacts.len(),
            record_count: acc.records,
            last_contact: acc.last_contact,
        })
        .collect()
}

/// Company codes a report may offer as filter values: genuine codes only, sorted
pub fn company_filter_options(results: &[CompanyCodeResult]) -> Vec<String> {
    crate::aggregate::unique_company_codes(results)
}
