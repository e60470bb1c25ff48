//! Nutrition admin service
//!
//! Manages the ingredient catalogue and the weekly meal plans built on it.
//! Plan figures are computed on read with the shared aggregator, so the
//! stored schedule is the single source of truth.

use crate::error::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::repositories::{
    CategoryRecord, CategoryRepository, IngredientInput, IngredientRecord, IngredientRepository,
    PlanInput, PlanRecord, PlanRepository, UnitTypeRecord, UnitTypeRepository,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashSet;
use top_tier_shared::nutrition::{
    deviation, index_ingredients, plan_summary, IngredientFacts, WeeklySchedule,
};
use top_tier_shared::targets::{calorie_target, CalorieTarget, PlanGoal};
use top_tier_shared::types::{
    CalorieTargetRequest, CategoryRequest, CategoryResponse, CreateUnitTypeRequest,
    IngredientQuery, IngredientRequest, IngredientResponse, PlanDetailResponse, PlanRequest,
    PlanResponse, UnitTypeResponse,
};
use top_tier_shared::validation::{
    validate_calorie_target, validate_category_name, validate_macro_value, validate_name,
};
use top_tier_shared::{MeasureUnit, NutritionError};
use tracing::{info, warn};
use uuid::Uuid;

fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn f64_to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or_default().round_dp(2)
}

/// Parse an id supplied in a request body
pub(crate) fn parse_id(field: &str, value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::field(field, "Invalid id"))
}

fn stored_unit(raw: &str) -> MeasureUnit {
    raw.parse().unwrap_or_else(|_| {
        warn!(unit = raw, "Unknown unit stored in database, treating as gram");
        MeasureUnit::Gram
    })
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(r: CategoryRecord) -> Self {
        CategoryResponse {
            id: r.id.to_string(),
            name: r.name,
            ingredient_count: r.ingredient_count,
            created_at: r.created_at,
        }
    }
}

impl From<UnitTypeRecord> for UnitTypeResponse {
    fn from(r: UnitTypeRecord) -> Self {
        let unit = stored_unit(&r.unit);
        UnitTypeResponse {
            id: r.id.to_string(),
            name: r.name,
            unit,
            per_label: unit.per_label(),
        }
    }
}

impl From<IngredientRecord> for IngredientResponse {
    fn from(r: IngredientRecord) -> Self {
        let unit = stored_unit(&r.unit);
        IngredientResponse {
            id: r.id.to_string(),
            name: r.name,
            category_id: r.category_id.map(|id| id.to_string()),
            category_name: r.category_name,
            unit_type_id: r.unit_type_id.to_string(),
            unit,
            per_label: unit.per_label(),
            calories: decimal_to_f64(r.calories),
            protein_g: decimal_to_f64(r.protein_g),
            carbs_g: decimal_to_f64(r.carbs_g),
            fat_g: decimal_to_f64(r.fat_g),
        }
    }
}

impl From<&IngredientRecord> for IngredientFacts {
    fn from(r: &IngredientRecord) -> Self {
        IngredientFacts {
            id: r.id,
            name: r.name.clone(),
            unit: stored_unit(&r.unit),
            calories: decimal_to_f64(r.calories),
            protein_g: decimal_to_f64(r.protein_g),
            carbs_g: decimal_to_f64(r.carbs_g),
            fat_g: decimal_to_f64(r.fat_g),
        }
    }
}

fn plan_response(r: &PlanRecord) -> PlanResponse {
    PlanResponse {
        id: r.id.to_string(),
        name: r.name.clone(),
        description: r.description.clone(),
        goal: parse_goal(&r.goal),
        target_calories: r.target_calories,
        macro_split: r.macro_split.as_ref().map(|s| s.0),
        is_published: r.is_published,
        created_at: r.created_at,
        updated_at: r.updated_at,
    }
}

/// Nutrition service for business logic
pub struct NutritionService;

impl NutritionService {
    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryResponse>, ApiError> {
        let records = CategoryRepository::list(pool).await.map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn create_category(
        pool: &PgPool,
        req: CategoryRequest,
    ) -> Result<CategoryResponse, ApiError> {
        let name = Self::checked_category_name(pool, &req.name, None).await?;

        let record = CategoryRepository::create(pool, &name)
            .await
            .map_err(Self::duplicate_category)?;

        info!(category_id = %record.id, name = %record.name, "Ingredient category created");
        Ok(record.into())
    }

    pub async fn rename_category(
        pool: &PgPool,
        id: Uuid,
        req: CategoryRequest,
    ) -> Result<CategoryResponse, ApiError> {
        let name = Self::checked_category_name(pool, &req.name, Some(id)).await?;

        CategoryRepository::rename(pool, id, &name)
            .await
            .map_err(Self::duplicate_category)?
            .map(CategoryResponse::from)
            .ok_or_else(|| ApiError::NotFound("Categorie niet gevonden".to_string()))
    }

    /// Delete a category that no ingredient uses anymore
    pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let category = CategoryRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Categorie niet gevonden".to_string()))?;

        if category.ingredient_count > 0 {
            return Err(ApiError::Conflict(format!(
                "Categorie wordt nog gebruikt door {} ingrediënten",
                category.ingredient_count
            )));
        }

        CategoryRepository::delete(pool, id).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                ApiError::Conflict("Categorie wordt nog gebruikt".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(category_id = %id, "Ingredient category deleted");
        Ok(())
    }

    async fn checked_category_name(
        pool: &PgPool,
        raw: &str,
        except: Option<Uuid>,
    ) -> Result<String, ApiError> {
        validate_category_name(raw).map_err(|msg| ApiError::field("name", msg))?;
        let name = raw.trim().to_string();

        let exists = CategoryRepository::name_exists(pool, &name, except)
            .await
            .map_err(ApiError::Internal)?;
        if exists {
            return Err(ApiError::Conflict("Categorie bestaat al".to_string()));
        }
        Ok(name)
    }

    fn duplicate_category(e: anyhow::Error) -> ApiError {
        if is_unique_violation(&e) {
            ApiError::Conflict("Categorie bestaat al".to_string())
        } else {
            ApiError::Internal(e)
        }
    }

    // ------------------------------------------------------------------
    // Unit types
    // ------------------------------------------------------------------

    pub async fn list_unit_types(pool: &PgPool) -> Result<Vec<UnitTypeResponse>, ApiError> {
        let records = UnitTypeRepository::list(pool).await.map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(UnitTypeResponse::from).collect())
    }

    pub async fn create_unit_type(
        pool: &PgPool,
        req: CreateUnitTypeRequest,
    ) -> Result<UnitTypeResponse, ApiError> {
        validate_name("Naam", &req.name).map_err(|msg| ApiError::field("name", msg))?;
        let unit: MeasureUnit = req.unit.parse().map_err(|msg: String| ApiError::field("unit", msg))?;

        let record = UnitTypeRepository::create(pool, req.name.trim(), unit.abbreviation())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Eenheid bestaat al".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(unit_type_id = %record.id, unit = %unit, "Unit type created");
        Ok(record.into())
    }

    // ------------------------------------------------------------------
    // Ingredients
    // ------------------------------------------------------------------

    pub async fn list_ingredients(
        pool: &PgPool,
        query: IngredientQuery,
    ) -> Result<Vec<IngredientResponse>, ApiError> {
        let category_id = query
            .category_id
            .as_deref()
            .map(|id| parse_id("category_id", id))
            .transpose()?;
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let records = IngredientRepository::list(pool, category_id, search)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(IngredientResponse::from).collect())
    }

    pub async fn get_ingredient(pool: &PgPool, id: Uuid) -> Result<IngredientResponse, ApiError> {
        IngredientRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .map(IngredientResponse::from)
            .ok_or_else(|| ApiError::NotFound("Ingrediënt niet gevonden".to_string()))
    }

    pub async fn create_ingredient(
        pool: &PgPool,
        req: IngredientRequest,
    ) -> Result<IngredientResponse, ApiError> {
        let input = Self::ingredient_input(pool, req).await?;
        let record = IngredientRepository::create(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(ingredient_id = %record.id, name = %record.name, "Ingredient created");
        Ok(record.into())
    }

    pub async fn update_ingredient(
        pool: &PgPool,
        id: Uuid,
        req: IngredientRequest,
    ) -> Result<IngredientResponse, ApiError> {
        let input = Self::ingredient_input(pool, req).await?;
        IngredientRepository::update(pool, id, input)
            .await
            .map_err(ApiError::Internal)?
            .map(IngredientResponse::from)
            .ok_or_else(|| ApiError::NotFound("Ingrediënt niet gevonden".to_string()))
    }

    /// Delete an ingredient no plan uses anymore
    pub async fn delete_ingredient(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let plans = PlanRepository::count_using_ingredient(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if plans > 0 {
            return Err(ApiError::Conflict(format!(
                "Ingrediënt wordt nog gebruikt in {} voedingsplannen",
                plans
            )));
        }

        let deleted = IngredientRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Ingrediënt niet gevonden".to_string()));
        }
        info!(ingredient_id = %id, "Ingredient deleted");
        Ok(())
    }

    async fn ingredient_input(
        pool: &PgPool,
        req: IngredientRequest,
    ) -> Result<IngredientInput, ApiError> {
        validate_ingredient_values(&req)?;

        let unit_type_id = parse_id("unit_type_id", &req.unit_type_id)?;
        let unit_exists = UnitTypeRepository::exists(pool, unit_type_id)
            .await
            .map_err(ApiError::Internal)?;
        if !unit_exists {
            return Err(ApiError::field("unit_type_id", "Eenheid bestaat niet"));
        }

        let category_id = match req.category_id.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let id = parse_id("category_id", raw)?;
                let found = CategoryRepository::find_by_id(pool, id)
                    .await
                    .map_err(ApiError::Internal)?;
                if found.is_none() {
                    return Err(ApiError::field("category_id", "Categorie bestaat niet"));
                }
                Some(id)
            }
            None => None,
        };

        Ok(IngredientInput {
            name: req.name.trim().to_string(),
            category_id,
            unit_type_id,
            calories: f64_to_decimal(req.calories),
            protein_g: f64_to_decimal(req.protein_g),
            carbs_g: f64_to_decimal(req.carbs_g),
            fat_g: f64_to_decimal(req.fat_g),
        })
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    pub async fn list_plans(
        pool: &PgPool,
        include_unpublished: bool,
    ) -> Result<Vec<PlanResponse>, ApiError> {
        let records = PlanRepository::list(pool, include_unpublished)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.iter().map(plan_response).collect())
    }

    /// Plan with its schedule and computed totals
    ///
    /// Unpublished plans are only visible to admins.
    pub async fn get_plan(
        pool: &PgPool,
        id: Uuid,
        include_unpublished: bool,
    ) -> Result<PlanDetailResponse, ApiError> {
        let record = PlanRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .filter(|p| include_unpublished || p.is_published)
            .ok_or_else(|| ApiError::NotFound("Voedingsplan niet gevonden".to_string()))?;

        Self::plan_detail(pool, record).await
    }

    pub async fn create_plan(
        pool: &PgPool,
        created_by: Uuid,
        req: PlanRequest,
    ) -> Result<PlanDetailResponse, ApiError> {
        let input = Self::plan_input(pool, req).await?;
        let record = PlanRepository::create(pool, created_by, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(plan_id = %record.id, name = %record.name, "Nutrition plan created");
        Self::plan_detail(pool, record).await
    }

    pub async fn update_plan(
        pool: &PgPool,
        id: Uuid,
        req: PlanRequest,
    ) -> Result<PlanDetailResponse, ApiError> {
        let input = Self::plan_input(pool, req).await?;
        let record = PlanRepository::update(pool, id, input)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Voedingsplan niet gevonden".to_string()))?;

        info!(plan_id = %id, "Nutrition plan updated");
        Self::plan_detail(pool, record).await
    }

    pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let deleted = PlanRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Voedingsplan niet gevonden".to_string()));
        }
        info!(plan_id = %id, "Nutrition plan deleted");
        Ok(())
    }

    async fn plan_input(pool: &PgPool, req: PlanRequest) -> Result<PlanInput, ApiError> {
        validate_name("Naam", &req.name).map_err(|msg| ApiError::field("name", msg))?;
        if let Some(calories) = req.target_calories {
            validate_calorie_target(calories)
                .map_err(|msg| ApiError::field("target_calories", msg))?;
        }
        if let Some(split) = &req.macro_split {
            split.validate()?;
        }
        req.schedule.validate()?;

        let ids = req.schedule.ingredient_ids();
        let found = IngredientRepository::find_by_ids(pool, &ids)
            .await
            .map_err(ApiError::Internal)?;
        ensure_ingredients_exist(&ids, &found)?;

        Ok(PlanInput {
            name: req.name.trim().to_string(),
            description: req
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            goal: req.goal.as_str().to_string(),
            target_calories: req.target_calories,
            macro_split: req.macro_split,
            is_published: req.is_published,
            schedule: req.schedule,
        })
    }

    async fn plan_detail(pool: &PgPool, record: PlanRecord) -> Result<PlanDetailResponse, ApiError> {
        let schedule = record.schedule.0.clone();
        let ids = schedule.ingredient_ids();
        let ingredients = IngredientRepository::find_by_ids(pool, &ids)
            .await
            .map_err(ApiError::Internal)?;

        let plan = plan_response(&record);
        build_plan_detail(plan, schedule, &ingredients)
    }

    // ------------------------------------------------------------------
    // Targets
    // ------------------------------------------------------------------

    /// Daily calorie target and macro grams for a body profile
    pub fn calculate_target(req: &CalorieTargetRequest) -> Result<CalorieTarget, ApiError> {
        let profile = &req.profile;
        if !(30.0..=300.0).contains(&profile.weight_kg) {
            return Err(ApiError::field("profile.weight_kg", "Weight must be between 30 and 300 kg"));
        }
        if !(100.0..=250.0).contains(&profile.height_cm) {
            return Err(ApiError::field("profile.height_cm", "Height must be between 100 and 250 cm"));
        }
        if !(14..=100).contains(&profile.age_years) {
            return Err(ApiError::field("profile.age_years", "Age must be between 14 and 100"));
        }

        let split = req.split.unwrap_or_default();
        Ok(calorie_target(profile, req.goal, &split)?)
    }
}

fn validate_ingredient_values(req: &IngredientRequest) -> Result<(), ApiError> {
    validate_name("Naam", &req.name).map_err(|msg| ApiError::field("name", msg))?;
    for (field, label, value) in [
        ("calories", "Calorieën", req.calories),
        ("protein_g", "Eiwit", req.protein_g),
        ("carbs_g", "Koolhydraten", req.carbs_g),
        ("fat_g", "Vet", req.fat_g),
    ] {
        validate_macro_value(label, value).map_err(|msg| ApiError::field(field, msg))?;
    }
    Ok(())
}

/// Reject schedules that reference ingredients missing from the catalogue
fn ensure_ingredients_exist(ids: &[Uuid], found: &[IngredientRecord]) -> Result<(), ApiError> {
    let known: HashSet<Uuid> = found.iter().map(|r| r.id).collect();
    match ids.iter().find(|id| !known.contains(id)) {
        Some(missing) => Err(NutritionError::UnknownIngredient(missing.to_string()).into()),
        None => Ok(()),
    }
}

/// Assemble plan figures: per-day totals, weekly average and the
/// deviation from the plan's own target when one is set
pub fn build_plan_detail(
    plan: PlanResponse,
    schedule: WeeklySchedule,
    ingredients: &[IngredientRecord],
) -> Result<PlanDetailResponse, ApiError> {
    let index = index_ingredients(ingredients.iter().map(IngredientFacts::from));
    let summary = plan_summary(&schedule, &index)?;

    let target = match plan.target_calories {
        Some(calories) => Some(
            plan.macro_split
                .unwrap_or_default()
                .grams_for(calories as f64)?
                .rounded(),
        ),
        None => None,
    };
    let deviation = target
        .as_ref()
        .map(|t| deviation(&summary.weekly_average, t).rounded());

    Ok(PlanDetailResponse {
        plan,
        schedule,
        summary,
        target,
        deviation,
    })
}

/// Goal parsed from a stored plan row
pub fn parse_goal(raw: &str) -> PlanGoal {
    raw.parse().unwrap_or_default()
}
