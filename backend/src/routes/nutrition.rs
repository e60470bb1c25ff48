//! Nutrition API routes
//!
//! Members read the catalogue and published plans; admins maintain them.

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::services::nutrition::parse_id;
use crate::services::NutritionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use top_tier_shared::targets::CalorieTarget;
use top_tier_shared::types::{
    CalorieTargetRequest, CategoryRequest, CategoryResponse, CreateUnitTypeRequest,
    IngredientQuery, IngredientRequest, IngredientResponse, PlanDetailResponse, PlanRequest,
    PlanResponse, UnitTypeResponse,
};

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", put(rename_category).delete(delete_category))
        .route("/unit-types", get(list_unit_types).post(create_unit_type))
        .route("/ingredients", get(list_ingredients).post(create_ingredient))
        .route(
            "/ingredients/:id",
            get(get_ingredient).put(update_ingredient).delete(delete_ingredient),
        )
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .route("/targets", post(calculate_target))
}

// ============================================================================
// Categories
// ============================================================================

/// GET /api/v1/nutrition/categories - List categories with usage counts
async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    Ok(Json(NutritionService::list_categories(state.db()).await?))
}

/// POST /api/v1/nutrition/categories - Create a category
async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = NutritionService::create_category(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/nutrition/categories/:id - Rename a category
async fn rename_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(NutritionService::rename_category(state.db(), id, req).await?))
}

/// DELETE /api/v1/nutrition/categories/:id - Delete an unused category
async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    NutritionService::delete_category(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Unit types
// ============================================================================

/// GET /api/v1/nutrition/unit-types - List unit types
async fn list_unit_types(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<UnitTypeResponse>>, ApiError> {
    Ok(Json(NutritionService::list_unit_types(state.db()).await?))
}

/// POST /api/v1/nutrition/unit-types - Create a unit type
async fn create_unit_type(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateUnitTypeRequest>,
) -> Result<(StatusCode, Json<UnitTypeResponse>), ApiError> {
    let unit_type = NutritionService::create_unit_type(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(unit_type)))
}

// ============================================================================
// Ingredients
// ============================================================================

/// GET /api/v1/nutrition/ingredients - List ingredients, optionally filtered
async fn list_ingredients(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    Ok(Json(NutritionService::list_ingredients(state.db(), query).await?))
}

/// GET /api/v1/nutrition/ingredients/:id - Get an ingredient
async fn get_ingredient(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(NutritionService::get_ingredient(state.db(), id).await?))
}

/// POST /api/v1/nutrition/ingredients - Create an ingredient
async fn create_ingredient(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<IngredientRequest>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let ingredient = NutritionService::create_ingredient(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PUT /api/v1/nutrition/ingredients/:id - Update an ingredient
async fn update_ingredient(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<IngredientRequest>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(NutritionService::update_ingredient(state.db(), id, req).await?))
}

/// DELETE /api/v1/nutrition/ingredients/:id - Delete an ingredient
async fn delete_ingredient(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    NutritionService::delete_ingredient(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Plans
// ============================================================================

/// GET /api/v1/nutrition/plans - Published plans (all plans for admins)
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    Ok(Json(NutritionService::list_plans(state.db(), auth.is_admin).await?))
}

/// GET /api/v1/nutrition/plans/:id - Plan with schedule and computed totals
async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PlanDetailResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(NutritionService::get_plan(state.db(), id, auth.is_admin).await?))
}

/// POST /api/v1/nutrition/plans - Create a plan
async fn create_plan(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<PlanRequest>,
) -> Result<(StatusCode, Json<PlanDetailResponse>), ApiError> {
    let plan = NutritionService::create_plan(state.db(), admin.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/v1/nutrition/plans/:id - Replace a plan
async fn update_plan(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanDetailResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(NutritionService::update_plan(state.db(), id, req).await?))
}

/// DELETE /api/v1/nutrition/plans/:id - Delete a plan
async fn delete_plan(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    NutritionService::delete_plan(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Targets
// ============================================================================

/// POST /api/v1/nutrition/targets - Daily calorie and macro target
async fn calculate_target(
    _auth: AuthUser,
    Json(req): Json<CalorieTargetRequest>,
) -> Result<Json<CalorieTarget>, ApiError> {
    Ok(Json(NutritionService::calculate_target(&req)?))
}
