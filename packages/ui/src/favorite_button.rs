use dioxus::prelude::*;
use store::{FavoritesError, RecipeId};

use crate::activity_log::{log_activity, use_activity_log, LogLevel};
use crate::favorites::use_favorites;

/// Heart toggle for one recipe. Disabled for guests and while a toggle of
/// the same recipe is in flight.
#[component]
pub fn FavoriteButton(recipe_id: RecipeId) -> Element {
    let favorites = use_favorites();
    let log = use_activity_log();
    let mut busy = use_signal(|| false);

    let favorite = favorites.is_favorite(recipe_id);
    let logged_in = favorites.is_logged_in();
    let disabled = busy() || !logged_in || favorites.is_pending(recipe_id);

    let onclick = {
        let favorites = favorites.clone();
        move |_| {
            let favorites = favorites.clone();
            let mut log = log;
            async move {
                if busy() {
                    return;
                }
                busy.set(true);
                match favorites.toggle(recipe_id).await {
                    Ok(true) => log_activity(&mut log, LogLevel::Success, "Added to favorites"),
                    Ok(false) => log_activity(&mut log, LogLevel::Info, "Removed from favorites"),
                    Err(FavoritesError::NotLoggedIn) => {
                        log_activity(&mut log, LogLevel::Warning, "Log in to save favorites")
                    }
                    Err(e) => {
                        tracing::error!("Failed to toggle favorite {}: {}", recipe_id, e);
                        log_activity(&mut log, LogLevel::Error, "Could not change favorite status");
                    }
                }
                busy.set(false);
            }
        }
    };

    rsx! {
        button {
            class: if favorite { "favorite-button on" } else { "favorite-button" },
            disabled,
            title: if logged_in { "Toggle favorite" } else { "Log in to save favorites" },
            onclick,
            if favorite {
                "♥"
            } else {
                "♡"
            }
        }
    }
}
