//! Canned lookup service responses

use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default lookup endpoint path
pub const LOOKUP_PATH: &str = "/api/company-code";

/// Successful lookup body
pub fn company_body(code: &str, name: &str) -> Value {
    json!({
        "status": "ok",
        "data": { "company_code": code, "company_name": name }
    })
}

/// Body the service returns for numbers it has no record of
pub fn not_found_body() -> Value {
    json!({ "status": "not_found" })
}

/// Answer lookups for `phone` with `body`
pub async fn mount_lookup(server: &MockServer, phone: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(LOOKUP_PATH))
        .and(query_param("phone", phone))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer lookups for `phone` with `status` and a plain-text body
pub async fn mount_status(server: &MockServer, phone: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(LOOKUP_PATH))
        .and(query_param("phone", phone))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
        .mount(server)
        .await;
}

/// Answer lookups for `phone` with `body` after `delay`
pub async fn mount_slow_lookup(server: &MockServer, phone: &str, body: Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(LOOKUP_PATH))
        .and(query_param("phone", phone))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
