//! Shared UI for the recipe app: session and favorites context, and the
//! components built on them.

use dioxus::prelude::*;

pub const RECIPES_CSS: Asset = asset!("/assets/recipes.css");

pub mod activity_log;
pub use activity_log::{
    log_activity, use_activity_log, ActivityLog, ActivityLogPanel, ActivityLogToggle, LogLevel,
};

mod session;
pub use session::{continue_as_guest, login, logout, use_session, SessionProvider, SessionState};

mod favorites;
pub use favorites::{use_api, use_favorites, FavoritesProvider, SharedFavorites, UseFavorites};

mod favorite_button;
pub use favorite_button::FavoriteButton;
