use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::models::Category;

// Input data for creating a new category
#[derive(serde::Deserialize)]
pub struct CreateCategoryData {
    pub name: String,
    pub description: String,
}

// Sparse patch for a category: absent fields keep their stored value
#[derive(serde::Deserialize, Default)]
pub struct UpdateCategoryData {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Inserts a new category.
pub async fn create_category(
    pool: &SqlitePool,
    data: CreateCategoryData,
) -> Result<Category, ApiError> {
    let mut tx = pool.begin().await?;
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(category)
}

/// Fetches a single category by its ID.
pub async fn get_category_by_id(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Option<Category>, ApiError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories WHERE id = $1",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

/// Fetches all categories in id order.
pub async fn get_all_categories(pool: &SqlitePool) -> Result<Vec<Category>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Applies a sparse patch to an existing category.
/// Returns `None` when the id does not resolve.
pub async fn update_category(
    pool: &SqlitePool,
    category_id: i64,
    data: UpdateCategoryData,
) -> Result<Option<Category>, ApiError> {
    let mut tx = pool.begin().await?;
    let Some(mut category) = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories WHERE id = $1",
    )
    .bind(category_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    if let Some(name) = data.name {
        category.name = name;
    }
    if let Some(description) = data.description {
        category.description = description;
    }

    sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
        .bind(&category.name)
        .bind(&category.description)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Some(category))
}

/// Deletes a category by its ID. Deletion is rejected while any topic still
/// references the category. Returns the number of rows affected.
pub async fn delete_category(pool: &SqlitePool, category_id: i64) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM topics WHERE category_id = $1)")
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?;
    if referenced {
        return Err(ApiError::unprocessable(
            "category is still referenced by existing topics",
        ));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}
