//! Drink menu entities
//!
//! A drink is a titled recipe of ingredients measured in parts. The public
//! menu shows the short view (colors and proportions only); staff with the
//! `get:drinks-detail` permission see the long view with ingredient names.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One ingredient of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Ingredient {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    /// Display color of the layer, e.g. `brown` or `#6f4e37`
    #[validate(length(min = 1, max = 32))]
    pub color: String,

    #[validate(range(min = 1, max = 100))]
    pub parts: u32,
}

/// Drink stored in the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Ingredient as shown on the public menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// Drink as shown on the public menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    /// Public view without ingredient names
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }

    /// Full view including ingredient names
    pub fn long(&self) -> Drink {
        self.clone()
    }
}

/// Recipe as submitted by clients: a single ingredient or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipe {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl Recipe {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            Recipe::One(ingredient) => vec![ingredient],
            Recipe::Many(ingredients) => ingredients,
        }
    }

    fn ingredients(&self) -> &[Ingredient] {
        match self {
            Recipe::One(ingredient) => std::slice::from_ref(ingredient),
            Recipe::Many(ingredients) => ingredients,
        }
    }
}

/// A recipe needs at least one ingredient and every ingredient must be valid.
pub fn validate_recipe(recipe: &Recipe) -> Result<(), ValidationError> {
    let ingredients = recipe.ingredients();
    if ingredients.is_empty() {
        return Err(ValidationError::new("empty_recipe"));
    }
    if ingredients.iter().any(|ingredient| ingredient.validate().is_err()) {
        return Err(ValidationError::new("invalid_ingredient"));
    }
    Ok(())
}

/// Partial update applied to a stored drink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }

    pub fn apply(self, drink: &mut Drink) {
        if let Some(title) = self.title {
            drink.title = title;
        }
        if let Some(recipe) = self.recipe {
            drink.recipe = recipe;
        }
    }
}
