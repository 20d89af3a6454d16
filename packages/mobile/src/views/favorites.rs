use api::RecipeSummary;
use dioxus::prelude::*;
use ui::{log_activity, use_activity_log, use_api, use_favorites, use_session, LogLevel};

use super::RecipeCard;

/// The user's favorite recipes. Reloads whenever the favorites set changes.
#[component]
pub fn Favorites() -> Element {
    let client = use_api();
    let session = use_session();
    let favorites = use_favorites();
    let mut log = use_activity_log();
    let mut recipes = use_signal(Vec::<RecipeSummary>::new);

    let mut version = use_signal(|| favorites.snapshot().version);
    if *version.peek() != favorites.snapshot().version {
        version.set(favorites.snapshot().version);
    }

    let _loader = use_resource(move || {
        let client = client.clone();
        let _ = version();
        async move {
            let token = session().token;
            match client.list_favorites(0, None, token.as_ref()).await {
                Ok(page) => recipes.set(page.content),
                Err(e) if e.is_unauthorized() => recipes.set(Vec::new()),
                Err(e) => log_activity(
                    &mut log,
                    LogLevel::Error,
                    &format!("Could not load favorites: {e}"),
                ),
            }
        }
    });

    let refresh = {
        let favorites = favorites.clone();
        move |_| {
            let favorites = favorites.clone();
            async move {
                favorites.refresh().await;
            }
        }
    };

    rsx! {
        button { class: "refresh", onclick: refresh, "Refresh" }
        if recipes().is_empty() {
            p { class: "empty", "No favorites yet" }
        }
        for recipe in recipes() {
            RecipeCard { key: "{recipe.id}", recipe: recipe.clone() }
        }
    }
}
