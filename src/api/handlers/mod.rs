//! REST endpoint handlers organized by resource.

pub mod city;
pub mod country;
mod crud;
pub mod street;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the entity routes (`/country`, `/city`, `/street`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(country::routes())
        .merge(city::routes())
        .merge(street::routes())
}
