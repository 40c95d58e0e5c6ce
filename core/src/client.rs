//! Stateless HTTP request builder and outcome mapping for the car API.
//!
//! # Design
//! `CarsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; `outcome` turns the matching `HttpResponse` into a
//! `RequestOutcome`. The caller (or an `Executor`) does the actual
//! round-trip in between, keeping this module free of I/O.
//!
//! Response bodies are handed back verbatim. Decoding them is the caller's
//! business, see `parse_json`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, RequestFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::ListQuery;
use crate::types::{CarPayload, ResourceId};

/// Characters escaped when an id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The raw body on success, or why the request did not succeed.
pub type RequestOutcome = Result<String, RequestFailure>;

/// Synchronous, stateless client for the car API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarsClient {
    base_url: String,
}

impl CarsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_cars(&self, query: &ListQuery) -> HttpRequest {
        let query = query.to_params().encode();
        let url = if query.is_empty() {
            self.url("/api/cars")
        } else {
            format!("{}?{query}", self.url("/api/cars"))
        };
        get(url)
    }

    pub fn build_get_car(&self, id: &ResourceId) -> HttpRequest {
        get(self.car_url(id))
    }

    pub fn build_create_car(&self, input: &CarPayload) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.url("/api/cars"), input, 200)
    }

    pub fn build_update_car(&self, id: &ResourceId, input: &CarPayload) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.car_url(id), input, 200)
    }

    pub fn build_delete_car(&self, id: &ResourceId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.car_url(id),
            headers: Vec::new(),
            body: None,
            expected_status: 204,
        }
    }

    pub fn build_list_makes(&self) -> HttpRequest {
        get(self.url("/api/dictionaries/makes"))
    }

    pub fn build_list_models(&self, make_id: &ResourceId) -> HttpRequest {
        get(self.url(&format!(
            "/api/dictionaries/makes/{}/models",
            segment(make_id)
        )))
    }

    pub fn build_list_body_types(&self) -> HttpRequest {
        get(self.url("/api/dictionaries/body-types"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn car_url(&self, id: &ResourceId) -> String {
        self.url(&format!("/api/cars/{}", segment(id)))
    }
}

/// Map a response to an outcome: success only on an exact status match.
pub fn outcome(response: HttpResponse, expected: u16) -> RequestOutcome {
    if response.status == expected {
        return Ok(response.body);
    }
    debug!(status = response.status, expected, "unexpected status");
    Err(RequestFailure::Status {
        status: response.status,
        expected,
        body: response.body,
    })
}

/// Decode a JSON response body.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn segment(id: &ResourceId) -> String {
    utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string()
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: Vec::new(),
        body: None,
        expected_status: 200,
    }
}

fn json_request(
    method: HttpMethod,
    url: String,
    input: &CarPayload,
    expected_status: u16,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
        expected_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Car, DictionaryEntry, ListResult};

    fn client() -> CarsClient {
        CarsClient::new("http://localhost:3000")
    }

    fn payload() -> CarPayload {
        CarPayload {
            make_id: Some(1),
            car_model_id: Some(2),
            body_type_id: Some(3),
            year: Some(2020),
            mileage: Some(1000),
            description: Some("Clean".to_string()),
            ..CarPayload::default()
        }
    }

    #[test]
    fn build_list_cars_without_filters() {
        let req = client().build_list_cars(&ListQuery::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/cars");
        assert_eq!(req.expected_status, 200);
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_cars_with_filters() {
        let query = ListQuery {
            page: Some(2),
            keyword: Some("a b&c".to_string()),
            order_by: None,
            sort_order: Some(String::new()),
        };
        let req = client().build_list_cars(&query);
        assert_eq!(req.url, "http://localhost:3000/api/cars?page=2&keyword=a%20b%26c");
    }

    #[test]
    fn build_get_car_puts_id_in_path() {
        let req = client().build_get_car(&ResourceId::from(17));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/cars/17");
    }

    #[test]
    fn id_is_escaped_as_path_segment() {
        let req = client().build_get_car(&ResourceId::from("1/../2"));
        assert_eq!(req.url, "http://localhost:3000/api/cars/1%2F..%2F2");
    }

    #[test]
    fn build_create_car_produces_json_post() {
        let req = client().build_create_car(&payload()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/cars");
        assert_eq!(req.expected_status, 200);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["year"], 2020);
        assert_eq!(body["description"], "Clean");
    }

    #[test]
    fn build_update_car_produces_json_put() {
        let req = client().build_update_car(&ResourceId::from(9), &payload()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/cars/9");
        assert_eq!(req.expected_status, 200);
        assert!(req.body.is_some());
    }

    #[test]
    fn build_delete_car_expects_204() {
        let req = client().build_delete_car(&ResourceId::from(9));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/cars/9");
        assert_eq!(req.expected_status, 204);
        assert!(req.body.is_none());
    }

    #[test]
    fn build_dictionary_requests() {
        let c = client();
        assert_eq!(c.build_list_makes().url, "http://localhost:3000/api/dictionaries/makes");
        assert_eq!(
            c.build_list_models(&ResourceId::from(4)).url,
            "http://localhost:3000/api/dictionaries/makes/4/models"
        );
        assert_eq!(
            c.build_list_body_types().url,
            "http://localhost:3000/api/dictionaries/body-types"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CarsClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_makes().url, "http://localhost:3000/api/dictionaries/makes");
    }

    #[test]
    fn matching_status_returns_raw_body() {
        let body = r#"{ "results" : [] }"#;
        let result = outcome(HttpResponse::new(200, body), 200);
        assert_eq!(result.unwrap(), body);
    }

    #[test]
    fn other_status_is_failure() {
        let err = outcome(HttpResponse::new(404, "missing"), 200).unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(matches!(err, RequestFailure::Status { expected: 200, .. }));
    }

    #[test]
    fn other_success_code_is_still_failure() {
        let err = outcome(HttpResponse::new(200, ""), 204).unwrap_err();
        assert_eq!(err.status_code(), 200);
    }

    #[test]
    fn parse_json_decodes_list() {
        let list: ListResult<DictionaryEntry> =
            parse_json(r#"{"results":[{"id":1,"name":"Sedan"}],"pagination":{}}"#).unwrap();
        assert_eq!(list.results[0].name, "Sedan");
    }

    #[test]
    fn parse_json_bad_body() {
        let err = parse_json::<Car>("not json").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
