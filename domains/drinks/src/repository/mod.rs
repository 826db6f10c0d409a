//! Drink storage
//!
//! Handlers talk to storage through [`DrinkRepository`]. The in-memory
//! implementation backs the local server and the test suites.

mod memory;

use async_trait::async_trait;
use coffeeshop_common::RepositoryError;

use crate::domain::entities::{Drink, DrinkChanges, Ingredient};

pub use memory::InMemoryDrinkRepository;

#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// All drinks ordered by id
    async fn list(&self) -> Result<Vec<Drink>, RepositoryError>;

    async fn find(&self, id: u64) -> Result<Option<Drink>, RepositoryError>;

    /// Store a new drink. Titles are unique.
    async fn create(&self, title: String, recipe: Vec<Ingredient>)
        -> Result<Drink, RepositoryError>;

    /// Apply `changes` to an existing drink and return the stored result.
    async fn update(&self, id: u64, changes: DrinkChanges) -> Result<Drink, RepositoryError>;

    async fn delete(&self, id: u64) -> Result<(), RepositoryError>;
}
