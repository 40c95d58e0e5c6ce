//! Domain DTOs for the car inventory API.
//!
//! # Design
//! These mirror the backend schema but are defined independently from the
//! mock-server crate; integration tests catch any drift. Response types
//! ignore fields they do not know about, since the real backend returns
//! more than the edit page needs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a car, make, model or body type.
///
/// The backend sends integers, but the id only ever travels back as a path
/// segment, so it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => ResourceId::from(n),
            Raw::Text(s) => ResourceId(s),
        })
    }
}

/// A car record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Car {
    pub id: ResourceId,
    pub make_id: i64,
    pub car_model_id: i64,
    pub body_type_id: i64,
    pub year: i64,
    pub mileage: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for creating or updating a car.
///
/// Built from a form by `CarForm::to_payload`. Only the fields the form
/// carries are serialized; every field other than `description` is an
/// integer, including ones this client has no name for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_model_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, i64>,
}

/// An entry of a reference dictionary (make, model or body type).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub id: ResourceId,
    pub name: String,
}

/// A page of results. `pagination` is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResult<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub pagination: serde_json::Value,
}
