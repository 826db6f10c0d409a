use std::collections::BTreeMap;

use async_trait::async_trait;
use coffeeshop_common::RepositoryError;
use tokio::sync::RwLock;

use super::DrinkRepository;
use crate::domain::entities::{Drink, DrinkChanges, Ingredient};

#[derive(Debug)]
struct Menu {
    next_id: u64,
    drinks: BTreeMap<u64, Drink>,
}

impl Menu {
    fn title_taken(&self, title: &str, except: Option<u64>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

/// Process-local drink storage
#[derive(Debug)]
pub struct InMemoryDrinkRepository {
    menu: RwLock<Menu>,
}

impl Default for InMemoryDrinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDrinkRepository {
    pub fn new() -> Self {
        Self {
            menu: RwLock::new(Menu {
                next_id: 1,
                drinks: BTreeMap::new(),
            }),
        }
    }

    /// Repository holding the starter menu: a single glass of water.
    pub fn with_starter_menu() -> Self {
        let water = Drink {
            id: 1,
            title: "water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        };

        Self {
            menu: RwLock::new(Menu {
                next_id: 2,
                drinks: BTreeMap::from([(water.id, water)]),
            }),
        }
    }
}

#[async_trait]
impl DrinkRepository for InMemoryDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, RepositoryError> {
        let menu = self.menu.read().await;
        Ok(menu.drinks.values().cloned().collect())
    }

    async fn find(&self, id: u64) -> Result<Option<Drink>, RepositoryError> {
        let menu = self.menu.read().await;
        Ok(menu.drinks.get(&id).cloned())
    }

    async fn create(
        &self,
        title: String,
        recipe: Vec<Ingredient>,
    ) -> Result<Drink, RepositoryError> {
        let mut menu = self.menu.write().await;
        if menu.title_taken(&title, None) {
            return Err(RepositoryError::AlreadyExists);
        }

        let drink = Drink {
            id: menu.next_id,
            title,
            recipe,
        };
        menu.next_id += 1;
        menu.drinks.insert(drink.id, drink.clone());

        tracing::debug!(drink_id = drink.id, title = %drink.title, "Drink created");
        Ok(drink)
    }

    async fn update(&self, id: u64, changes: DrinkChanges) -> Result<Drink, RepositoryError> {
        let mut menu = self.menu.write().await;
        if !menu.drinks.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if let Some(title) = changes.title.as_deref() {
            if menu.title_taken(title, Some(id)) {
                return Err(RepositoryError::AlreadyExists);
            }
        }

        let drink = menu.drinks.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        changes.apply(drink);
        Ok(drink.clone())
    }

    async fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        let mut menu = self.menu.write().await;
        menu.drinks
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
