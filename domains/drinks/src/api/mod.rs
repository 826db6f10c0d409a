//! API layer for the Drinks domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::DrinksState;
pub use routes::routes;
