//! Nutrition repository - categories, unit types, ingredients and plans

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use top_tier_shared::nutrition::{MacroSplit, WeeklySchedule};
use uuid::Uuid;

/// Ingredient category with its usage count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub ingredient_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Unit type record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnitTypeRecord {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

/// Ingredient joined with its unit and category
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub unit_type_id: Uuid,
    pub unit: String,
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating an ingredient
#[derive(Debug, Clone)]
pub struct IngredientInput {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub unit_type_id: Uuid,
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
}

/// Nutrition plan record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub goal: String,
    pub target_calories: Option<i32>,
    pub macro_split: Option<Json<MacroSplit>>,
    pub is_published: bool,
    pub schedule: Json<WeeklySchedule>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a plan
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub name: String,
    pub description: Option<String>,
    pub goal: String,
    pub target_calories: Option<i32>,
    pub macro_split: Option<MacroSplit>,
    pub is_published: bool,
    pub schedule: WeeklySchedule,
}

const INGREDIENT_COLUMNS: &str = r#"
    i.id, i.name, i.category_id, c.name AS category_name, i.unit_type_id, u.unit,
    i.calories, i.protein_g, i.carbs_g, i.fat_g, i.created_at, i.updated_at
"#;

const PLAN_COLUMNS: &str = r#"
    id, name, description, goal, target_calories, macro_split, is_published,
    schedule, created_by, created_at, updated_at
"#;

/// Category repository
pub struct CategoryRepository;

impl CategoryRepository {
    /// List categories alphabetically with ingredient counts
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRecord>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.id, c.name, COUNT(i.id) AS ingredient_count, c.created_at
            FROM ingredient_categories c
            LEFT JOIN ingredients i ON i.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CategoryRecord>> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.id, c.name, COUNT(i.id) AS ingredient_count, c.created_at
            FROM ingredient_categories c
            LEFT JOIN ingredients i ON i.category_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Check for a category name, ignoring case and one category id
    pub async fn name_exists(pool: &PgPool, name: &str, except: Option<Uuid>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM ingredient_categories
                WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(except)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<CategoryRecord> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO ingredient_categories (name)
            VALUES ($1)
            RETURNING id, name, 0::bigint AS ingredient_count, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Rename a category, returning None when it does not exist
    pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<CategoryRecord>> {
        let updated = sqlx::query("UPDATE ingredient_categories SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ingredient_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Unit type repository
pub struct UnitTypeRepository;

impl UnitTypeRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<UnitTypeRecord>> {
        let records = sqlx::query_as::<_, UnitTypeRecord>(
            "SELECT id, name, unit, created_at FROM unit_types ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM unit_types WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    pub async fn create(pool: &PgPool, name: &str, unit: &str) -> Result<UnitTypeRecord> {
        let record = sqlx::query_as::<_, UnitTypeRecord>(
            r#"
            INSERT INTO unit_types (name, unit)
            VALUES ($1, $2)
            RETURNING id, name, unit, created_at
            "#,
        )
        .bind(name)
        .bind(unit)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}

/// Ingredient repository
pub struct IngredientRepository;

impl IngredientRepository {
    /// List ingredients, optionally by category and name fragment
    pub async fn list(
        pool: &PgPool,
        category_id: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<Vec<IngredientRecord>> {
        let sql = format!(
            r#"
            SELECT {INGREDIENT_COLUMNS}
            FROM ingredients i
            JOIN unit_types u ON u.id = i.unit_type_id
            LEFT JOIN ingredient_categories c ON c.id = i.category_id
            WHERE ($1::uuid IS NULL OR i.category_id = $1)
              AND ($2::text IS NULL OR i.name ILIKE '%' || $2 || '%')
            ORDER BY i.name
            "#
        );

        let records = sqlx::query_as::<_, IngredientRecord>(&sql)
            .bind(category_id)
            .bind(search)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<IngredientRecord>> {
        let sql = format!(
            r#"
            SELECT {INGREDIENT_COLUMNS}
            FROM ingredients i
            JOIN unit_types u ON u.id = i.unit_type_id
            LEFT JOIN ingredient_categories c ON c.id = i.category_id
            WHERE i.id = $1
            "#
        );

        let record = sqlx::query_as::<_, IngredientRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Fetch all ingredients with the given ids; missing ids are skipped
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<IngredientRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {INGREDIENT_COLUMNS}
            FROM ingredients i
            JOIN unit_types u ON u.id = i.unit_type_id
            LEFT JOIN ingredient_categories c ON c.id = i.category_id
            WHERE i.id = ANY($1)
            "#
        );

        let records = sqlx::query_as::<_, IngredientRecord>(&sql)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn create(pool: &PgPool, input: IngredientInput) -> Result<IngredientRecord> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO ingredients (name, category_id, unit_type_id, calories, protein_g, carbs_g, fat_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.unit_type_id)
        .bind(input.calories)
        .bind(input.protein_g)
        .bind(input.carbs_g)
        .bind(input.fat_g)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Ingredient {} vanished after insert", id))
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: IngredientInput,
    ) -> Result<Option<IngredientRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET name = $2, category_id = $3, unit_type_id = $4,
                calories = $5, protein_g = $6, carbs_g = $7, fat_g = $8,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.unit_type_id)
        .bind(input.calories)
        .bind(input.protein_g)
        .bind(input.carbs_g)
        .bind(input.fat_g)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Nutrition plan repository
pub struct PlanRepository;

impl PlanRepository {
    /// Number of plans whose schedule uses the ingredient
    pub async fn count_using_ingredient(pool: &PgPool, ingredient_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM nutrition_plans
            WHERE jsonb_path_exists(
                schedule,
                '$.days[*].meals[*].ingredients[*] ? (@.ingredient_id == $id)',
                jsonb_build_object('id', $1::text)
            )
            "#,
        )
        .bind(ingredient_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// List plans, newest first; members only see published plans
    pub async fn list(pool: &PgPool, include_unpublished: bool) -> Result<Vec<PlanRecord>> {
        let sql = format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM nutrition_plans
            WHERE $1 OR is_published
            ORDER BY created_at DESC
            "#
        );

        let records = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PlanRecord>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM nutrition_plans WHERE id = $1");

        let record = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn create(pool: &PgPool, created_by: Uuid, input: PlanInput) -> Result<PlanRecord> {
        let sql = format!(
            r#"
            INSERT INTO nutrition_plans
                (name, description, goal, target_calories, macro_split, is_published, schedule, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLAN_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.goal)
            .bind(input.target_calories)
            .bind(input.macro_split.map(Json))
            .bind(input.is_published)
            .bind(Json(&input.schedule))
            .bind(created_by)
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    pub async fn update(pool: &PgPool, id: Uuid, input: PlanInput) -> Result<Option<PlanRecord>> {
        let sql = format!(
            r#"
            UPDATE nutrition_plans
            SET name = $2, description = $3, goal = $4, target_calories = $5,
                macro_split = $6, is_published = $7, schedule = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, PlanRecord>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.goal)
            .bind(input.target_calories)
            .bind(input.macro_split.map(Json))
            .bind(input.is_published)
            .bind(Json(&input.schedule))
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM nutrition_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
