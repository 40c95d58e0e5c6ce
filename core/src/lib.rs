//! API client core for the car inventory service.
//!
//! # Overview
//! Builds `HttpRequest` values for every backend operation (list, get,
//! create, update and delete cars; makes, models and body-type dictionaries)
//! and maps `HttpResponse` values to a `RequestOutcome`. The request/response
//! layer never touches the network; `Executor` runs it over a `Transport`.
//!
//! # Design
//! - `CarsClient` is stateless: it holds only `base_url`.
//! - A request succeeds only on the exact status its operation expects
//!   (204 for delete, 200 otherwise). Everything else is a `RequestFailure`,
//!   either `Status` or `Transport` when no response arrived.
//! - Success bodies are returned raw; `parse_json` decodes them on demand.
//! - Form input goes through `CarForm::to_payload`, which rejects
//!   non-integer values and sanitizes the free-text description.
//! - `EditFlow` drives the edit page: dictionaries, car, models, save.

pub mod client;
pub mod config;
pub mod edit;
pub mod error;
pub mod executor;
pub mod http;
pub mod payload;
pub mod query;
pub mod sanitize;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{outcome, parse_json, CarsClient, RequestOutcome};
pub use config::ClientConfig;
pub use edit::{car_id_from_url, EditError, EditFlow, EditPage, SelectOption};
pub use error::{ApiError, RequestFailure, TransportError, ValidationError, TRANSPORT_ERROR_STATUS};
pub use executor::Executor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::CarForm;
pub use query::{ListQuery, QueryParams, QueryValue};
pub use sanitize::{HtmlEscaper, Sanitizer};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{Car, CarPayload, DictionaryEntry, ListResult, ResourceId};
