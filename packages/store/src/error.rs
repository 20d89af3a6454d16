//! Errors surfaced by the favorites store.

/// Boxed error returned by a [`crate::FavoritesClient`] implementation.
pub type ClientError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// Toggle was called without an active session.
    #[error("must be logged in to change favorites")]
    NotLoggedIn,

    /// The identifier has no canonical integer form.
    #[error("invalid recipe id: {0}")]
    InvalidRecipeId(String),

    /// The backend call failed. For toggles, local state has already been
    /// rolled back when this is returned.
    #[error("could not change favorite status: {0}")]
    Request(#[source] ClientError),
}

impl FavoritesError {
    /// True for failures the user can fix by logging in.
    pub fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
    }
}
