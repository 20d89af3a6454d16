use api::RecipeSummary;
use dioxus::prelude::*;
use ui::{log_activity, use_activity_log, use_api, FavoriteButton, LogLevel};

#[component]
pub fn RecipeCard(recipe: RecipeSummary) -> Element {
    let title = recipe.display_title().to_string();

    rsx! {
        div {
            class: "recipe-card",
            div {
                h3 { "{title}" }
                if let Some(time) = recipe.time {
                    span { class: "recipe-time", "{time:.0} min" }
                }
                if let Some(rating) = recipe.rating {
                    span { class: "recipe-rating", " ★ {rating:.1}" }
                }
            }
            FavoriteButton { recipe_id: recipe.id }
        }
    }
}

/// Best rated recipes, paged.
#[component]
pub fn Recipes() -> Element {
    let client = use_api();
    let mut log = use_activity_log();
    let mut page = use_signal(|| 0u32);
    let mut recipes = use_signal(Vec::<RecipeSummary>::new);
    let mut has_more = use_signal(|| false);

    let _loader = use_resource(move || {
        let client = client.clone();
        let page = page();
        async move {
            match client.fetch_recipes(page, None).await {
                Ok(result) => {
                    has_more.set(result.has_more());
                    if page == 0 {
                        recipes.set(result.content);
                    } else {
                        recipes.write().extend(result.content);
                    }
                }
                Err(e) => {
                    log_activity(&mut log, LogLevel::Error, &format!("Could not load recipes: {e}"))
                }
            }
        }
    });

    rsx! {
        for recipe in recipes() {
            RecipeCard { key: "{recipe.id}", recipe: recipe.clone() }
        }
        if has_more() {
            button {
                class: "load-more",
                onclick: move |_| page += 1,
                "Load more"
            }
        }
    }
}
