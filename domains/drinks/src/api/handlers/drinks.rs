//! Drink menu API handlers
//!
//! Protected handlers only run after the route's permission guard has
//! validated the caller, so they read the claims from request extensions.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use coffeeshop_auth::ValidatedClaims;
use coffeeshop_common::{Error, RepositoryError, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::DrinksState;
use crate::domain::entities::{validate_recipe, Drink, DrinkChanges, DrinkShort, Recipe};

/// Request for adding a drink to the menu
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDrinkRequest {
    #[validate(length(min = 1, max = 80))]
    pub title: String,

    /// Single ingredient object or a list of ingredients
    #[validate(custom(function = "validate_recipe"))]
    pub recipe: Recipe,
}

/// Request for changing a drink; absent fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDrinkRequest {
    #[validate(length(min = 1, max = 80))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_recipe"))]
    pub recipe: Option<Recipe>,
}

impl From<UpdateDrinkRequest> for DrinkChanges {
    fn from(request: UpdateDrinkRequest) -> Self {
        DrinkChanges {
            title: request.title,
            recipe: request.recipe.map(Recipe::into_ingredients),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    fn ok(drinks: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            drinks,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: u64,
}

/// Name the drink in storage failures so clients see what went wrong.
fn drink_error(err: RepositoryError, id: Option<u64>, title: Option<&str>) -> Error {
    match (err, id, title) {
        (RepositoryError::NotFound, Some(id), _) => Error::NotFound(format!("drink {}", id)),
        (RepositoryError::AlreadyExists, _, Some(title)) => {
            Error::Unprocessable(format!("a drink titled '{}' already exists", title))
        }
        (other, _, _) => other.into(),
    }
}

/// Public menu in the short view
pub async fn list_drinks(
    State(state): State<DrinksState>,
) -> Result<Json<DrinksResponse<DrinkShort>>> {
    let drinks = state.drinks.list().await?;
    Ok(DrinksResponse::ok(drinks.iter().map(Drink::short).collect()))
}

/// Full menu in the long view
pub async fn list_drinks_detail(
    State(state): State<DrinksState>,
    Extension(claims): Extension<ValidatedClaims>,
) -> Result<Json<DrinksResponse<Drink>>> {
    let drinks = state.drinks.list().await?;
    tracing::debug!(sub = %claims.sub, count = drinks.len(), "Listing drink details");
    Ok(DrinksResponse::ok(drinks))
}

pub async fn create_drink(
    State(state): State<DrinksState>,
    Extension(claims): Extension<ValidatedClaims>,
    ValidatedJson(request): ValidatedJson<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<Drink>>> {
    let title = request.title.clone();
    let drink = state
        .drinks
        .create(request.title, request.recipe.into_ingredients())
        .await
        .map_err(|e| drink_error(e, None, Some(&title)))?;

    tracing::info!(sub = %claims.sub, drink_id = drink.id, title = %drink.title, "Drink added to menu");
    Ok(DrinksResponse::ok(vec![drink.long()]))
}

pub async fn update_drink(
    State(state): State<DrinksState>,
    Extension(claims): Extension<ValidatedClaims>,
    Path(id): Path<u64>,
    ValidatedJson(request): ValidatedJson<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<Drink>>> {
    let changes = DrinkChanges::from(request);
    if changes.is_empty() {
        return Err(Error::Unprocessable(
            "request must change the title or the recipe".to_string(),
        ));
    }

    let title = changes.title.clone();
    let drink = state
        .drinks
        .update(id, changes)
        .await
        .map_err(|e| drink_error(e, Some(id), title.as_deref()))?;

    tracing::info!(sub = %claims.sub, drink_id = drink.id, "Drink updated");
    Ok(DrinksResponse::ok(vec![drink.long()]))
}

pub async fn delete_drink(
    State(state): State<DrinksState>,
    Extension(claims): Extension<ValidatedClaims>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteDrinkResponse>> {
    state
        .drinks
        .delete(id)
        .await
        .map_err(|e| drink_error(e, Some(id), None))?;

    tracing::info!(sub = %claims.sub, drink_id = id, "Drink removed from menu");
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
