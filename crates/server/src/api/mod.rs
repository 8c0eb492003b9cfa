//! # HTTP API
//!
//! Router construction, shared state and the OpenAPI document.

pub mod error;
pub mod pizza;

use axum::{
    body::Body,
    http::{header, Response},
    response::IntoResponse,
    routing::get,
    Router,
};
use pizzeria_core::kitchen::{IngredientCatalog, PizzaAssembler};
use pizzeria_core::state::{DataStore, PizzeriaDb, SqliteStore};
use std::sync::Arc;
use utoipa::OpenApi;

/// Application state
pub struct AppState {
    pub catalog: IngredientCatalog,
    pub assembler: PizzaAssembler,
}

impl AppState {
    pub fn new(db: &PizzeriaDb) -> Self {
        let store: Arc<dyn DataStore> = Arc::new(SqliteStore::new(db));
        Self {
            catalog: IngredientCatalog::new(Arc::clone(&store)),
            assembler: PizzaAssembler::new(store),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pizzeria API",
        version = "1.0.0",
        description = "Compose pizzas from a catalog of sauces and toppings"
    ),
    paths(
        health,
        pizza::list_sauces,
        pizza::list_toppings,
        pizza::add_sauce,
        pizza::add_topping,
        pizza::delete_sauce,
        pizza::delete_topping,
        pizza::create_pizza,
        pizza::get_pizza,
        pizza::delete_pizza
    ),
    components(
        schemas(
            pizza::IngredientResponse,
            pizza::PlacementBody,
            pizza::CreatePizzaRequest,
            pizza::PizzaIngredientResponse,
            pizza::PizzaResponse,
            error::ErrorBody
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "catalog", description = "Sauce and topping catalog"),
        (name = "pizza", description = "Pizza composition")
    )
)]
pub struct ApiDoc;

/// Health check
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
async fn health() -> &'static str {
    "The API is live and running!"
}

async fn serve_openapi() -> impl IntoResponse {
    let doc = ApiDoc::openapi().to_json().unwrap_or_default();
    Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(doc))
        .unwrap_or_default()
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .nest("/pizza", pizza::pizza_routes())
        .with_state(state)
}
