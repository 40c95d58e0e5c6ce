//! The car edit page as a sequence of API calls.
//!
//! # Design
//! The page needs three dictionaries and one car before it can show the
//! form. `EditFlow::load` fetches makes and body types, then the car, then
//! the models of the car's make, because the model list depends on the make.
//! The selected car id is an explicit argument all the way through; nothing
//! is remembered between `load` and `save`.
//!
//! Select lists are plain `SelectOption` values so any UI can render them.

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::client::parse_json;
use crate::error::{ApiError, RequestFailure, ValidationError};
use crate::executor::Executor;
use crate::payload::{CarForm, CAR_MODEL_ID, MAKE_ID};
use crate::sanitize::{HtmlEscaper, Sanitizer};
use crate::transport::Transport;
use crate::types::{Car, DictionaryEntry, ListResult, ResourceId};

/// Query parameter of the edit page URL holding the car id.
pub const CAR_PARAM: &str = "car";

#[derive(Debug, Error)]
pub enum EditError {
    /// The page was opened without a car id; show the car table instead.
    #[error("no car selected")]
    MissingCarId,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<RequestFailure> for EditError {
    fn from(err: RequestFailure) -> Self {
        EditError::Api(err.into())
    }
}

impl From<ValidationError> for EditError {
    fn from(err: ValidationError) -> Self {
        EditError::Api(err.into())
    }
}

/// One `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl From<DictionaryEntry> for SelectOption {
    fn from(entry: DictionaryEntry) -> Self {
        Self {
            value: entry.id.to_string(),
            label: entry.name,
        }
    }
}

/// Everything the edit page shows once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPage {
    pub car_id: ResourceId,
    pub makes: Vec<SelectOption>,
    pub body_types: Vec<SelectOption>,
    pub models: Vec<SelectOption>,
    pub form: CarForm,
}

/// Read the car id from an edit page URL such as `edit.html?car=12`.
///
/// Relative or otherwise unparsable URLs yield `None`, as does an empty
/// `car` value.
pub fn car_id_from_url(url: &str) -> Option<ResourceId> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == CAR_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .map(ResourceId::from)
}

pub struct EditFlow<'a, T> {
    api: &'a Executor<T>,
    sanitizer: Box<dyn Sanitizer + 'a>,
}

impl<'a, T: Transport> EditFlow<'a, T> {
    pub fn new(api: &'a Executor<T>) -> Self {
        Self {
            api,
            sanitizer: Box::new(HtmlEscaper),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'a) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    /// Fetch everything needed to show the form for `car_id`.
    pub async fn load(&self, car_id: Option<ResourceId>) -> Result<EditPage, EditError> {
        let car_id = car_id.ok_or(EditError::MissingCarId)?;

        let makes = self.dictionary(self.api.list_makes().await)?;
        let body_types = self.dictionary(self.api.list_body_types().await)?;

        let body = self
            .api
            .get_car(&car_id)
            .await
            .inspect_err(|err| warn!(car = %car_id, error = %err, "failed to load car"))?;
        let car: Car = parse_json(&body)?;

        let models = self.models_for_make(&ResourceId::from(car.make_id)).await?;

        Ok(EditPage {
            car_id,
            makes,
            body_types,
            models,
            form: CarForm::from_car(&car),
        })
    }

    /// The model options for one make.
    pub async fn models_for_make(&self, make_id: &ResourceId) -> Result<Vec<SelectOption>, EditError> {
        self.dictionary(self.api.list_models(make_id).await)
    }

    /// Switch the page to another make: reload its models and preselect the
    /// first one, or none when the make has no models.
    pub async fn change_make(&self, page: &mut EditPage, make_id: ResourceId) -> Result<(), EditError> {
        let models = self.models_for_make(&make_id).await?;
        let first = models.first().map(|m| m.value.clone()).unwrap_or_default();
        page.form.set(MAKE_ID, make_id.to_string());
        page.form.set(CAR_MODEL_ID, first);
        page.models = models;
        Ok(())
    }

    /// Validate `form` and store it as the new state of `car_id`.
    pub async fn save(&self, car_id: &ResourceId, form: &CarForm) -> Result<Car, EditError> {
        let payload = form
            .to_payload(self.sanitizer.as_ref())
            .inspect_err(|err| warn!(car = %car_id, error = %err, "form rejected"))?;
        let body = self
            .api
            .update_car(car_id, &payload)
            .await
            .inspect_err(|err| warn!(car = %car_id, error = %err, "failed to save car"))?;
        let car = parse_json(&body)?;
        info!(car = %car_id, "car saved");
        Ok(car)
    }

    fn dictionary(&self, outcome: Result<String, RequestFailure>) -> Result<Vec<SelectOption>, EditError> {
        let body = outcome.inspect_err(|err| warn!(error = %err, "failed to load dictionary"))?;
        let list: ListResult<DictionaryEntry> = parse_json(&body)?;
        Ok(list.results.into_iter().map(SelectOption::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CarsClient;
    use crate::http::HttpMethod;
    use crate::payload::{DESCRIPTION, YEAR};
    use crate::testing::ScriptedTransport;

    const BASE: &str = "http://cars.test";
    const CAR: &str = r#"{"id":12,"make_id":1,"car_model_id":11,"body_type_id":2,
        "year":2015,"mileage":80000,"description":"Daily driver"}"#;

    fn backend() -> ScriptedTransport {
        ScriptedTransport::new()
            .reply(
                HttpMethod::Get,
                "http://cars.test/api/dictionaries/makes",
                200,
                r#"{"results":[{"id":1,"name":"Audi"},{"id":2,"name":"BMW"}],"pagination":{}}"#,
            )
            .reply(
                HttpMethod::Get,
                "http://cars.test/api/dictionaries/body-types",
                200,
                r#"{"results":[{"id":2,"name":"Sedan"}],"pagination":{}}"#,
            )
            .reply(HttpMethod::Get, "http://cars.test/api/cars/12", 200, CAR)
            .reply(
                HttpMethod::Get,
                "http://cars.test/api/dictionaries/makes/1/models",
                200,
                r#"{"results":[{"id":10,"name":"A3"},{"id":11,"name":"A4"}],"pagination":{}}"#,
            )
            .reply(
                HttpMethod::Get,
                "http://cars.test/api/dictionaries/makes/2/models",
                200,
                r#"{"results":[{"id":20,"name":"M3"}],"pagination":{}}"#,
            )
    }

    fn api(transport: ScriptedTransport) -> Executor<ScriptedTransport> {
        Executor::new(CarsClient::new(BASE), transport)
    }

    #[test]
    fn car_id_is_read_from_url() {
        assert_eq!(
            car_id_from_url("file:///site/edit.html?car=12"),
            Some(ResourceId::from(12))
        );
        assert_eq!(
            car_id_from_url("http://x/edit?tab=1&car=a%2Fb#top"),
            Some(ResourceId::from("a/b"))
        );
    }

    #[test]
    fn missing_or_empty_car_id() {
        assert_eq!(car_id_from_url("http://x/edit.html"), None);
        assert_eq!(car_id_from_url("http://x/edit.html?tab=1"), None);
        assert_eq!(car_id_from_url("http://x/edit.html?car="), None);
        assert_eq!(car_id_from_url("edit.html?car=12"), None);
    }

    #[test]
    fn car_id_uses_form_decoding() {
        assert_eq!(
            car_id_from_url("http://x/edit.html?car=old+car&car=2"),
            Some(ResourceId::from("old car"))
        );
        assert_eq!(
            car_id_from_url("http://x/edit.html?c%61r=7"),
            Some(ResourceId::from(7))
        );
    }

    #[tokio::test]
    async fn load_without_id_sends_nothing() {
        let api = api(backend());
        let err = EditFlow::new(&api).load(None).await.unwrap_err();
        assert!(matches!(err, EditError::MissingCarId));
        assert!(api.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn load_fills_selects_and_form() {
        let api = api(backend());
        let page = EditFlow::new(&api).load(Some(ResourceId::from(12))).await.unwrap();

        assert_eq!(page.car_id, ResourceId::from(12));
        assert_eq!(page.makes.len(), 2);
        assert_eq!(
            page.makes[1],
            SelectOption {
                value: "2".to_string(),
                label: "BMW".to_string(),
            }
        );
        assert_eq!(page.body_types[0].label, "Sedan");
        assert_eq!(page.models.iter().map(|m| m.label.as_str()).collect::<Vec<_>>(), ["A3", "A4"]);
        assert_eq!(page.form.get(CAR_MODEL_ID), Some("11"));
        assert_eq!(page.form.get(YEAR), Some("2015"));
        assert_eq!(page.form.get(DESCRIPTION), Some("Daily driver"));

        let urls: Vec<String> = api.transport().sent().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            [
                "http://cars.test/api/dictionaries/makes",
                "http://cars.test/api/dictionaries/body-types",
                "http://cars.test/api/cars/12",
                "http://cars.test/api/dictionaries/makes/1/models",
            ]
        );
    }

    #[tokio::test]
    async fn load_reports_missing_car() {
        let api = api(backend());
        let err = EditFlow::new(&api).load(Some(ResourceId::from(99))).await.unwrap_err();
        match err {
            EditError::Api(ApiError::Request(failure)) => assert_eq!(failure.status_code(), 404),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn change_make_reloads_models() {
        let api = api(backend());
        let flow = EditFlow::new(&api);
        let mut page = flow.load(Some(ResourceId::from(12))).await.unwrap();

        flow.change_make(&mut page, ResourceId::from(2)).await.unwrap();
        assert_eq!(page.models.len(), 1);
        assert_eq!(page.form.get(MAKE_ID), Some("2"));
        assert_eq!(page.form.get(CAR_MODEL_ID), Some("20"));
    }

    #[tokio::test]
    async fn save_sends_sanitized_payload_to_given_id() {
        let api = api(backend().reply(HttpMethod::Put, "http://cars.test/api/cars/12", 200, CAR));
        let flow = EditFlow::new(&api);
        let form = CarForm::from_car(&parse_json::<Car>(CAR).unwrap())
            .with(DESCRIPTION, "<script>alert(1)</script>");

        let car = flow.save(&ResourceId::from(12), &form).await.unwrap();
        assert_eq!(car.id, ResourceId::from(12));

        let sent = api.transport().sent();
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["year"], 2015);
        assert!(!body["description"].as_str().unwrap().contains("<script"));
    }

    #[tokio::test]
    async fn save_rejects_invalid_form_before_sending() {
        let api = api(backend());
        let form = CarForm::from_car(&parse_json::<Car>(CAR).unwrap()).with(YEAR, "soon");

        let err = EditFlow::new(&api).save(&ResourceId::from(12), &form).await.unwrap_err();
        assert!(matches!(err, EditError::Api(ApiError::Validation(_))));
        assert!(api.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn custom_sanitizer_is_used() {
        let api = api(backend().reply(HttpMethod::Put, "http://cars.test/api/cars/12", 200, CAR));
        let flow = EditFlow::new(&api).with_sanitizer(|_: &str| "[removed]".to_string());
        let form = CarForm::from_car(&parse_json::<Car>(CAR).unwrap());

        flow.save(&ResourceId::from(12), &form).await.unwrap();
        let body: serde_json::Value =
            serde_json::from_str(api.transport().sent()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["description"], "[removed]");
    }
}
