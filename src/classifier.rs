//! Classification of raw lookup outcomes into [`CompanyCodeResult`]s.
//!
//! Rules, highest priority first:
//! 1. call-level failure → `ERROR`, `success = false`
//! 2. payload says there is no record → `NOT_FOUND`
//! 3. record present but without a usable code → `NO_DATA`
//! 4. payload shape not recognized → `UNKNOWN`
//! 5. record with a non-empty code → that code and its name
//!
//! A payload that reports an error of its own (`"status": "error"`) is `ERROR` with
//! `success = true`: the call worked, the service said no.

use serde_json::{Map, Value};

use crate::error::LookupError;
use crate::types::{CompanyCode, CompanyCodeResult, PhoneNumber};

/// Raw outcome of one lookup call: the decoded JSON body, or why the call failed
pub type RawOutcome = std::result::Result<Value, LookupError>;

/// Keys accepted for the company code, in lookup order
const CODE_KEYS: &[&str] = &["company_code", "companyCode", "code"];
/// Keys accepted for the company name, in lookup order
const NAME_KEYS: &[&str] = &["company_name", "companyName", "name"];
/// Keys that wrap the record
const RECORD_KEYS: &[&str] = &["data", "record", "result"];

/// What a successfully decoded payload says
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PayloadClass {
    Found { code: String, name: Option<String> },
    NotFound,
    NoData,
    Unknown,
    RemoteError,
}

/// Classify a raw lookup outcome for `phone_number`
pub fn classify(phone_number: &PhoneNumber, raw: RawOutcome) -> CompanyCodeResult {
    let payload = match raw {
        Ok(payload) => payload,
        Err(_) => return CompanyCodeResult::failed(phone_number.clone()),
    };

    let (code, name) = match classify_payload(&payload) {
        PayloadClass::Found { code, name } => (CompanyCode::from(code), name),
        PayloadClass::NotFound => (CompanyCode::NotFound, None),
        PayloadClass::NoData => (CompanyCode::NoData, None),
        PayloadClass::Unknown => (CompanyCode::Unknown, None),
        PayloadClass::RemoteError => (CompanyCode::Error, None),
    };

    CompanyCodeResult::resolved(phone_number.clone(), code, name)
}

pub(crate) fn classify_payload(payload: &Value) -> PayloadClass {
    match payload {
        Value::Object(map) => classify_object(map),
        Value::Array(items) => classify_list(items),
        _ => PayloadClass::Unknown,
    }
}

fn classify_object(map: &Map<String, Value>) -> PayloadClass {
    if let Some(status) = map.get("status").and_then(Value::as_str) {
        match status.trim().to_ascii_lowercase().as_str() {
            "not_found" | "notfound" | "no_record" | "missing" => return PayloadClass::NotFound,
            "no_data" | "empty" => return PayloadClass::NoData,
            "error" | "failed" | "failure" => return PayloadClass::RemoteError,
            _ => {}
        }
    }

    if map.get("found").and_then(Value::as_bool) == Some(false) {
        return PayloadClass::NotFound;
    }

    if map.get("error").is_some_and(|e| !e.is_null() && e != &Value::Bool(false)) {
        return PayloadClass::RemoteError;
    }

    if let Some(record) = RECORD_KEYS.iter().find_map(|key| map.get(*key)) {
        return match record {
            Value::Null => PayloadClass::NotFound,
            Value::Object(record) => classify_record(record),
            Value::Array(items) => classify_list(items),
            _ => PayloadClass::Unknown,
        };
    }

    if CODE_KEYS.iter().any(|key| map.contains_key(*key)) {
        return classify_record(map);
    }

    PayloadClass::Unknown
}

/// An empty list means no record; otherwise the first entry is the record
fn classify_list(items: &[Value]) -> PayloadClass {
    match items.first() {
        None => PayloadClass::NotFound,
        Some(Value::Object(record)) => classify_record(record),
        Some(_) => PayloadClass::Unknown,
    }
}

fn classify_record(record: &Map<String, Value>) -> PayloadClass {
    match first_non_empty(record, CODE_KEYS) {
        Some(code) => PayloadClass::Found {
            code,
            name: first_non_empty(record, NAME_KEYS),
        },
        None => PayloadClass::NoData,
    }
}

/// First key holding a non-blank string (numbers are accepted and stringified)
fn first_non_empty(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
