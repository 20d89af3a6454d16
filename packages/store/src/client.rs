//! # Backend contract for favorites
//!
//! [`FavoritesClient`] is the only thing the store needs from the network. The
//! HTTP implementation lives in the `api` crate; tests use an in-process fake.
//!
//! | Method | Backend call | Returns |
//! |--------|--------------|---------|
//! | [`favorite_ids`](FavoritesClient::favorite_ids) | `GET /api/favorites/ids` | every recipe id the user has favorited |
//! | [`add_favorite`](FavoritesClient::add_favorite) | `POST /api/recipes/{id}/favorite` | the backend's `favorite` flag after the call |
//! | [`remove_favorite`](FavoritesClient::remove_favorite) | `DELETE /api/recipes/{id}/favorite` | the backend's `favorite` flag after the call (`false` when absent) |

use std::future::Future;

use crate::error::ClientError;
use crate::models::{Credential, RecipeId};

/// Async access to the favorites endpoints of the recipe backend.
pub trait FavoritesClient {
    fn favorite_ids(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<RecipeId>, ClientError>>;
    fn add_favorite(
        &self,
        id: RecipeId,
        credential: &Credential,
    ) -> impl Future<Output = Result<bool, ClientError>>;
    fn remove_favorite(
        &self,
        id: RecipeId,
        credential: &Credential,
    ) -> impl Future<Output = Result<bool, ClientError>>;
}
