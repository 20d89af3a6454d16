//! # Favorites store
//!
//! Client-side cache of the recipes the logged-in user has marked as
//! favorite, kept in sync with the backend through optimistic updates.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | [`RecipeId`] and the [`AsRecipeId`] coercion, [`Credential`], [`FavoritesSnapshot`] |
//! | [`client`] | [`FavoritesClient`], the backend contract |
//! | [`favorites`] | [`FavoritesStore`]: hydration, optimistic toggle with rollback, logout reset |
//! | [`listeners`] | Ordered change-callback registry and [`Subscription`] handles |
//! | [`binding`] | [`FavoritesBinding`], one consumer's view of the store |

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod binding;
pub mod client;
pub mod error;
pub mod favorites;
pub mod listeners;
pub mod models;

#[cfg(test)]
mod testing;

pub use binding::{CredentialChange, FavoritesBinding};
pub use client::FavoritesClient;
pub use error::{ClientError, FavoritesError};
pub use favorites::FavoritesStore;
pub use listeners::{Listener, Subscription};
pub use models::{AsRecipeId, Credential, FavoritesSnapshot, RecipeId};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
