//! Drinks domain: menu entities, storage and the guarded CRUD API

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use repository::{DrinkRepository, InMemoryDrinkRepository};

// Re-export API types
pub use api::routes;
pub use api::DrinksState;
