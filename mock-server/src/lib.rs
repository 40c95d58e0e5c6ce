use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const PER_PAGE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: u64,
    pub make_id: u64,
    pub car_model_id: u64,
    pub body_type_id: u64,
    pub year: i64,
    pub mileage: i64,
    pub description: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CarInput {
    pub make_id: u64,
    pub car_model_id: u64,
    pub body_type_id: u64,
    pub year: i64,
    pub mileage: i64,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub keyword: Option<String>,
    pub order_by: Option<String>,
    pub sort_order: Option<String>,
}

/// A make with the models that belong to it.
#[derive(Clone, Debug)]
struct Make {
    entry: Entry,
    models: Vec<Entry>,
}

#[derive(Debug)]
pub struct Store {
    cars: BTreeMap<u64, Car>,
    next_id: u64,
    makes: Vec<Make>,
    body_types: Vec<Entry>,
}

pub type Db = Arc<RwLock<Store>>;

fn entry(id: u64, name: &str) -> Entry {
    Entry {
        id,
        name: name.to_string(),
    }
}

impl Default for Store {
    fn default() -> Self {
        let makes = vec![
            Make {
                entry: entry(1, "Audi"),
                models: vec![entry(10, "A3"), entry(11, "A4")],
            },
            Make {
                entry: entry(2, "BMW"),
                models: vec![entry(20, "M3"), entry(21, "X5")],
            },
            Make {
                entry: entry(3, "Toyota"),
                models: vec![entry(30, "Corolla"), entry(31, "Camry")],
            },
        ];
        let body_types = vec![
            entry(1, "Sedan"),
            entry(2, "Hatchback"),
            entry(3, "SUV"),
            entry(4, "Coupe"),
        ];
        Self {
            cars: BTreeMap::new(),
            next_id: 1,
            makes,
            body_types,
        }
    }
}

impl Store {
    /// The backend owns referential integrity: the model must belong to the
    /// make and the body type must exist.
    fn validate(&self, input: &CarInput) -> Result<(), StatusCode> {
        let make = self
            .makes
            .iter()
            .find(|m| m.entry.id == input.make_id)
            .ok_or(StatusCode::BAD_REQUEST)?;
        if !make.models.iter().any(|m| m.id == input.car_model_id) {
            return Err(StatusCode::BAD_REQUEST);
        }
        if !self.body_types.iter().any(|b| b.id == input.body_type_id) {
            return Err(StatusCode::BAD_REQUEST);
        }
        Ok(())
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/cars", get(list_cars).post(create_car))
        .route("/api/cars/{id}", get(get_car).put(update_car).delete(delete_car))
        .route("/api/dictionaries/makes", get(list_makes))
        .route("/api/dictionaries/makes/{id}/models", get(list_models))
        .route("/api/dictionaries/body-types", get(list_body_types))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock car backend listening");
    }
    axum::serve(listener, app()).await
}

fn paginate<T>(items: Vec<T>, page: usize) -> Page<T> {
    let page = page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(PER_PAGE);
    let results = items
        .into_iter()
        .skip((page - 1).saturating_mul(PER_PAGE))
        .take(PER_PAGE)
        .collect();
    Page {
        results,
        pagination: Pagination {
            page,
            per_page: PER_PAGE,
            total,
            total_pages,
        },
    }
}

fn compare(a: &Car, b: &Car, field: &str) -> Ordering {
    match field {
        "make_id" => a.make_id.cmp(&b.make_id),
        "car_model_id" => a.car_model_id.cmp(&b.car_model_id),
        "body_type_id" => a.body_type_id.cmp(&b.body_type_id),
        "year" => a.year.cmp(&b.year),
        "mileage" => a.mileage.cmp(&b.mileage),
        "description" => a.description.cmp(&b.description),
        _ => a.id.cmp(&b.id),
    }
}

async fn list_cars(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Page<Car>> {
    let store = db.read().await;
    let keyword = params.keyword.unwrap_or_default().to_lowercase();
    let mut cars: Vec<Car> = store
        .cars
        .values()
        .filter(|car| keyword.is_empty() || car.description.to_lowercase().contains(&keyword))
        .cloned()
        .collect();

    let field = params.order_by.unwrap_or_default();
    cars.sort_by(|a, b| compare(a, b, &field).then(a.id.cmp(&b.id)));
    if params.sort_order.as_deref() == Some("desc") {
        cars.reverse();
    }

    Json(paginate(cars, params.page.unwrap_or(1)))
}

async fn create_car(State(db): State<Db>, Json(input): Json<CarInput>) -> Result<Json<Car>, StatusCode> {
    let mut store = db.write().await;
    store.validate(&input)?;
    let id = store.next_id;
    store.next_id += 1;
    let car = Car {
        id,
        make_id: input.make_id,
        car_model_id: input.car_model_id,
        body_type_id: input.body_type_id,
        year: input.year,
        mileage: input.mileage,
        description: input.description,
    };
    store.cars.insert(id, car.clone());
    Ok(Json(car))
}

async fn get_car(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Car>, StatusCode> {
    let store = db.read().await;
    store.cars.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_car(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CarInput>,
) -> Result<Json<Car>, StatusCode> {
    let mut store = db.write().await;
    if !store.cars.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    store.validate(&input)?;
    let car = Car {
        id,
        make_id: input.make_id,
        car_model_id: input.car_model_id,
        body_type_id: input.body_type_id,
        year: input.year,
        mileage: input.mileage,
        description: input.description,
    };
    store.cars.insert(id, car.clone());
    Ok(Json(car))
}

async fn delete_car(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.cars.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn list_makes(State(db): State<Db>) -> Json<Page<Entry>> {
    let store = db.read().await;
    let makes = store.makes.iter().map(|m| m.entry.clone()).collect();
    Json(paginate_all(makes))
}

async fn list_models(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Page<Entry>>, StatusCode> {
    let store = db.read().await;
    let make = store
        .makes
        .iter()
        .find(|m| m.entry.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(paginate_all(make.models.clone())))
}

async fn list_body_types(State(db): State<Db>) -> Json<Page<Entry>> {
    let store = db.read().await;
    Json(paginate_all(store.body_types.clone()))
}

/// Dictionaries come back in a single page.
fn paginate_all<T>(items: Vec<T>) -> Page<T> {
    let total = items.len();
    Page {
        results: items,
        pagination: Pagination {
            page: 1,
            per_page: total,
            total,
            total_pages: usize::from(total > 0),
        },
    }
}
