use async_trait::async_trait;
use uuid::Uuid;

use super::{
    repo_types::{Recipe, RecipeRow},
    validation::NewRecipe,
};
use crate::{db::PgStore, error::StoreError};

#[async_trait]
pub trait RecipeRepo: Send + Sync {
    /// Persist `recipe` for `owner_id`. An unknown owner yields
    /// `StoreError::MissingReference`.
    async fn insert(&self, owner_id: Uuid, recipe: &NewRecipe) -> Result<Recipe, StoreError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Recipe>, StoreError>;
}

#[async_trait]
impl RecipeRepo for PgStore {
    async fn insert(&self, owner_id: Uuid, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, instructions, minutes_to_complete, user_id
            "#,
        )
        .bind(recipe.title())
        .bind(recipe.instructions())
        .bind(recipe.minutes_to_complete())
        .bind(owner_id)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(row.into())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }
}
