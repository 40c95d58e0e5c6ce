//! Form values and their conversion into a create/update payload.
//!
//! # Design
//! `CarForm` holds raw text exactly as a user typed it, in form order.
//! `to_payload` is the only way to get a `CarPayload` out of it: every
//! field except `description` must parse as an integer or the whole
//! conversion fails, and `description` is always run through a `Sanitizer`.

use crate::error::ValidationError;
use crate::sanitize::Sanitizer;
use crate::types::{Car, CarPayload};

pub const MAKE_ID: &str = "make_id";
pub const CAR_MODEL_ID: &str = "car_model_id";
pub const BODY_TYPE_ID: &str = "body_type_id";
pub const YEAR: &str = "year";
pub const MILEAGE: &str = "mileage";
pub const DESCRIPTION: &str = "description";

/// Raw text values of the car edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarForm {
    fields: Vec<(String, String)>,
}

impl CarForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled with the values of an existing car.
    pub fn from_car(car: &Car) -> Self {
        CarForm::new()
            .with(MAKE_ID, car.make_id.to_string())
            .with(CAR_MODEL_ID, car.car_model_id.to_string())
            .with(BODY_TYPE_ID, car.body_type_id.to_string())
            .with(YEAR, car.year.to_string())
            .with(MILEAGE, car.mileage.to_string())
            .with(DESCRIPTION, car.description.clone().unwrap_or_default())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Validate and convert into the JSON body sent on create/update.
    ///
    /// Every field present in the form is carried over: `description`
    /// through the sanitizer, everything else as an integer. Fields the form
    /// lacks are left out of the payload.
    pub fn to_payload(&self, sanitizer: &dyn Sanitizer) -> Result<CarPayload, ValidationError> {
        let mut payload = CarPayload::default();
        for (name, value) in &self.fields {
            if name == DESCRIPTION {
                payload.description = Some(sanitizer.sanitize(value));
                continue;
            }
            let number = integer(name, value)?;
            match name.as_str() {
                MAKE_ID => payload.make_id = Some(number),
                CAR_MODEL_ID => payload.car_model_id = Some(number),
                BODY_TYPE_ID => payload.body_type_id = Some(number),
                YEAR => payload.year = Some(number),
                MILEAGE => payload.mileage = Some(number),
                _ => {
                    payload.extra.insert(name.clone(), number);
                }
            }
        }
        Ok(payload)
    }
}

fn integer(field: &str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field: field.to_string(),
            value: raw.to_string(),
        })
}
