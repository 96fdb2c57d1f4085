use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{auth::session::Session, error::AppError, state::AppState};

use super::dto::{CreateRecipeRequest, CreatedRecipeResponse};
use super::repo_types::Recipe;
use super::services::{create_recipe, list_for_owner};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let recipes = list_for_owner(state.recipes.as_ref(), session.user_id).await?;
    Ok(Json(recipes))
}

/// POST /recipes. The session is checked before the body is parsed.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRecipeResponse>), AppError> {
    let Json(body) = payload?;

    let recipe = create_recipe(
        state.recipes.as_ref(),
        session.user_id,
        body.title,
        body.instructions,
        body.minutes_to_complete,
    )
    .await?;

    info!(recipe_id = %recipe.id, user_id = %session.user_id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedRecipeResponse {
            message: "Recipe created successfully",
            recipe_id: recipe.id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_serializes_allow_list_only() {
        let recipe = Recipe {
            id: uuid::Uuid::new_v4(),
            title: "Stew".into(),
            instructions: "x".repeat(50),
            minutes_to_complete: 30,
            user_id: uuid::Uuid::new_v4(),
        };
        let json = serde_json::to_value(&recipe).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["id", "instructions", "minutes_to_complete", "title", "user_id"]
        );
        assert_eq!(json["minutes_to_complete"], 30);
    }
}
