//! # Pizza API
//!
//! Catalog maintenance for sauces and toppings, and pizza creation/deletion.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use pizzeria_core::kitchen::PizzaOrder;
use pizzeria_core::models::{
    Ingredient, IngredientAmount, IngredientKind, IngredientSection, Pizza, PizzaIngredient,
    PizzaSize, PlacementRequest,
};
use pizzeria_core::PizzeriaError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{ApiError, ErrorBody};
use super::SharedState;

// === API Types ===

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
    /// SAUCE or TOPPING
    #[serde(rename = "type")]
    pub kind: String,
    pub deleted_at: Option<String>,
}

impl From<Ingredient> for IngredientResponse {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            kind: i.kind.as_str().to_string(),
            deleted_at: i.deleted_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// One sauce or topping placement; amount defaults to REGULAR, section to WHOLE
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlacementBody {
    pub name: String,
    /// LIGHT, REGULAR or EXTRA
    #[serde(default)]
    pub amount: Option<String>,
    /// WHOLE, LEFT or RIGHT
    #[serde(default)]
    pub section: Option<String>,
}

impl TryFrom<PlacementBody> for PlacementRequest {
    type Error = PizzeriaError;

    fn try_from(body: PlacementBody) -> Result<Self, Self::Error> {
        Ok(PlacementRequest {
            name: body.name,
            amount: body
                .amount
                .as_deref()
                .map(str::parse::<IngredientAmount>)
                .transpose()?,
            section: body
                .section
                .as_deref()
                .map(str::parse::<IngredientSection>)
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePizzaRequest {
    /// PERSONAL, SMALL, MEDIUM, LARGE or XL
    pub size: String,
    pub sauces: Vec<PlacementBody>,
    pub toppings: Vec<PlacementBody>,
}

impl TryFrom<CreatePizzaRequest> for PizzaOrder {
    type Error = PizzeriaError;

    fn try_from(req: CreatePizzaRequest) -> Result<Self, Self::Error> {
        Ok(PizzaOrder {
            size: req.size.parse::<PizzaSize>()?,
            sauces: req
                .sauces
                .into_iter()
                .map(PlacementRequest::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            toppings: req
                .toppings
                .into_iter()
                .map(PlacementRequest::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PizzaIngredientResponse {
    pub id: String,
    pub ingredient: IngredientResponse,
    pub amount: String,
    pub section: String,
}

impl From<PizzaIngredient> for PizzaIngredientResponse {
    fn from(pi: PizzaIngredient) -> Self {
        Self {
            id: pi.id,
            ingredient: pi.ingredient.into(),
            amount: pi.amount.as_str().to_string(),
            section: pi.section.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PizzaResponse {
    pub id: String,
    pub size: String,
    pub created_at: String,
    pub pizza_ingredients: Vec<PizzaIngredientResponse>,
}

impl From<Pizza> for PizzaResponse {
    fn from(p: Pizza) -> Self {
        Self {
            id: p.id,
            size: p.size.as_str().to_string(),
            created_at: p.created_at.to_rfc3339(),
            pizza_ingredients: p.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn pizza_routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_pizza))
        .route("/sauces", get(list_sauces))
        .route("/toppings", get(list_toppings))
        .route("/sauce/:name", post(add_sauce).delete(delete_sauce))
        .route("/topping/:name", post(add_topping).delete(delete_topping))
        .route("/:id", get(get_pizza).delete(delete_pizza))
}

// === Catalog Handlers ===

fn list_kind(state: &SharedState, kind: IngredientKind) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let ingredients = state.catalog.list_active(kind)?;
    Ok(Json(ingredients.into_iter().map(Into::into).collect()))
}

fn add_kind(
    state: &SharedState,
    name: &str,
    kind: IngredientKind,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let ingredient = state.catalog.add(name, kind)?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

fn delete_kind(state: &SharedState, name: &str, kind: IngredientKind) -> Result<StatusCode, ApiError> {
    state.catalog.soft_delete(name, kind)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List active sauces
#[utoipa::path(
    get,
    path = "/pizza/sauces",
    tag = "catalog",
    responses(
        (status = 200, description = "Active sauces", body = Vec<IngredientResponse>)
    )
)]
pub async fn list_sauces(
    State(state): State<SharedState>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    list_kind(&state, IngredientKind::Sauce)
}

/// List active toppings
#[utoipa::path(
    get,
    path = "/pizza/toppings",
    tag = "catalog",
    responses(
        (status = 200, description = "Active toppings", body = Vec<IngredientResponse>)
    )
)]
pub async fn list_toppings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    list_kind(&state, IngredientKind::Topping)
}

/// Add a sauce
#[utoipa::path(
    post,
    path = "/pizza/sauce/{name}",
    tag = "catalog",
    params(("name" = String, Path, description = "Sauce name (case-insensitive)")),
    responses(
        (status = 201, description = "Sauce added", body = IngredientResponse),
        (status = 409, description = "Sauce already exists", body = ErrorBody)
    )
)]
pub async fn add_sauce(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    add_kind(&state, &name, IngredientKind::Sauce)
}

/// Add a topping
#[utoipa::path(
    post,
    path = "/pizza/topping/{name}",
    tag = "catalog",
    params(("name" = String, Path, description = "Topping name (case-insensitive)")),
    responses(
        (status = 201, description = "Topping added", body = IngredientResponse),
        (status = 409, description = "Topping already exists", body = ErrorBody)
    )
)]
pub async fn add_topping(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    add_kind(&state, &name, IngredientKind::Topping)
}

/// Soft-delete a sauce
#[utoipa::path(
    delete,
    path = "/pizza/sauce/{name}",
    tag = "catalog",
    params(("name" = String, Path, description = "Sauce name")),
    responses(
        (status = 204, description = "Sauce removed from the catalog"),
        (status = 404, description = "No such sauce", body = ErrorBody)
    )
)]
pub async fn delete_sauce(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_kind(&state, &name, IngredientKind::Sauce)
}

/// Soft-delete a topping
#[utoipa::path(
    delete,
    path = "/pizza/topping/{name}",
    tag = "catalog",
    params(("name" = String, Path, description = "Topping name")),
    responses(
        (status = 204, description = "Topping removed from the catalog"),
        (status = 404, description = "No such topping", body = ErrorBody)
    )
)]
pub async fn delete_topping(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_kind(&state, &name, IngredientKind::Topping)
}

// === Pizza Handlers ===

/// Create a pizza
#[utoipa::path(
    post,
    path = "/pizza",
    tag = "pizza",
    request_body = CreatePizzaRequest,
    responses(
        (status = 201, description = "Pizza created", body = PizzaResponse),
        (status = 400, description = "Sauces or toppings do not cover the pizza", body = ErrorBody),
        (status = 404, description = "Unknown sauce or topping", body = ErrorBody),
        (status = 422, description = "Malformed body, size, amount or section", body = ErrorBody)
    )
)]
pub async fn create_pizza(
    State(state): State<SharedState>,
    payload: Result<Json<CreatePizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PizzaResponse>), ApiError> {
    let Json(req) = payload.map_err(|rejection| PizzeriaError::Invalid(rejection.body_text()))?;
    let order = PizzaOrder::try_from(req)?;

    let pizza = state.assembler.create_order(&order)?;
    Ok((StatusCode::CREATED, Json(pizza.into())))
}

/// Get a pizza by ID
#[utoipa::path(
    get,
    path = "/pizza/{id}",
    tag = "pizza",
    params(("id" = String, Path, description = "Pizza ID")),
    responses(
        (status = 200, description = "Pizza with its ingredients", body = PizzaResponse),
        (status = 404, description = "No such pizza", body = ErrorBody)
    )
)]
pub async fn get_pizza(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<PizzaResponse>, ApiError> {
    let pizza = state.assembler.find_pizza(&id)?;
    Ok(Json(pizza.into()))
}

/// Delete a pizza
#[utoipa::path(
    delete,
    path = "/pizza/{id}",
    tag = "pizza",
    params(("id" = String, Path, description = "Pizza ID")),
    responses(
        (status = 204, description = "Pizza deleted"),
        (status = 404, description = "No such pizza", body = ErrorBody)
    )
)]
pub async fn delete_pizza(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.assembler.delete_pizza(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
