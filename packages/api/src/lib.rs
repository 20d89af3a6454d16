//! # API crate: REST client for the recipe backend
//!
//! Every call the app makes to the backend goes through [`ApiClient`]. The
//! client attaches the session's bearer token, maps non-2xx responses to
//! [`ApiError::Status`] with the backend's own message, and decodes the
//! camelCase JSON bodies into the types in [`models`].
//!
//! ## Modules
//!
//! | Module | Endpoints |
//! |--------|-----------|
//! | [`auth`] | `POST /auth/login`, `POST /auth/register` |
//! | [`favorites`] | `/api/favorites`, `/api/favorites/ids`, `/api/recipes/{id}/favorite`; implements [`store::FavoritesClient`] |
//! | [`recipes`] | `/api/recipes`, `/api/recipes/{id}`, `/api/recipes/search` |
//! | [`ratings`] | `/api/recipes/{id}/rating` |
//! | [`pantry`] | `/api/pantry`, `/api/ingredients` |
//! | [`shopping_lists`] | `/api/shopping-lists/**`, including the recipe-ingredient merge |
//!
//! Configuration comes from [`ApiConfig::from_env`] (`RECIPES_API_URL`,
//! `RECIPES_API_TIMEOUT_SECS`, optionally from a `.env` file).

pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod pantry;
pub mod ratings;
pub mod recipes;
pub mod shopping_lists;

pub use auth::{LoginResponse, Registration};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use models::{Page, RecipeDetails, RecipeSummary};
pub use recipes::RecipeQuery;

pub use store::{Credential, RecipeId};
