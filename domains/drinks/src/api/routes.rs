//! Route definitions for the Drinks domain API
//!
//! `GET /drinks` is public. Every other route carries its own permission
//! guard, applied with `route_layer` so unmatched paths still answer 404.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers::drinks;
use super::middleware::{
    DrinksState, DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS,
};

/// Create all Drinks domain routes bound to `state`
pub fn routes(state: DrinksState) -> Router {
    Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks)
                .merge(post(drinks::create_drink).route_layer(state.require(POST_DRINKS))),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_drinks_detail).route_layer(state.require(GET_DRINKS_DETAIL)),
        )
        .route(
            "/drinks/{id}",
            patch(drinks::update_drink)
                .route_layer(state.require(PATCH_DRINKS))
                .merge(delete(drinks::delete_drink).route_layer(state.require(DELETE_DRINKS))),
        )
        .with_state(state)
}
