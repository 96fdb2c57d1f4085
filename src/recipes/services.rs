use tracing::{error, warn};
use uuid::Uuid;

use super::{
    repo::RecipeRepo,
    repo_types::Recipe,
    validation::NewRecipe,
};
use crate::error::{AppError, StoreError};

/// Validate the fields in order and persist the recipe for `owner_id`.
pub async fn create_recipe(
    recipes: &dyn RecipeRepo,
    owner_id: Uuid,
    title: Option<String>,
    instructions: Option<String>,
    minutes_to_complete: Option<i32>,
) -> Result<Recipe, AppError> {
    let recipe = NewRecipe::parse(title, instructions, minutes_to_complete).map_err(|e| {
        warn!(%owner_id, reason = %e, "recipe rejected");
        AppError::Validation(e.to_string())
    })?;

    match recipes.insert(owner_id, &recipe).await {
        Ok(r) => Ok(r),
        Err(StoreError::MissingReference) => {
            warn!(%owner_id, "recipe owner no longer exists");
            Err(AppError::NotFound("User not found".into()))
        }
        Err(e) => {
            error!(error = %e, %owner_id, "insert recipe failed");
            Err(e.into())
        }
    }
}

pub async fn list_for_owner(
    recipes: &dyn RecipeRepo,
    owner_id: Uuid,
) -> Result<Vec<Recipe>, AppError> {
    Ok(recipes.list_by_owner(owner_id).await?)
}
