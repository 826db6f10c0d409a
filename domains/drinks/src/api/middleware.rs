//! Drinks domain state and auth guard integration

use std::sync::Arc;

use coffeeshop_auth::{AuthGate, RequirePermission};

use crate::repository::DrinkRepository;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Application state for the Drinks domain
#[derive(Clone)]
pub struct DrinksState {
    pub drinks: Arc<dyn DrinkRepository>,
    pub auth: AuthGate,
}

impl DrinksState {
    pub fn new(drinks: Arc<dyn DrinkRepository>, auth: AuthGate) -> Self {
        Self { drinks, auth }
    }

    /// Guard layer for a route requiring `permission`
    pub fn require(&self, permission: &'static str) -> RequirePermission {
        RequirePermission::new(self.auth.clone(), permission)
    }
}
