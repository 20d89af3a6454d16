use dioxus::prelude::*;
use views::{Entry, Favorites, Recipes, TabLayout};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Entry {},
    #[layout(TabLayout)]
        #[route("/recipes")]
        Recipes {},
        #[route("/favorites")]
        Favorites {},
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));
    let client = use_hook(|| {
        api::ApiClient::from_env().map_err(|e| {
            tracing::error!("Invalid backend configuration: {}", e);
            e.to_string()
        })
    });

    let body = match client {
        Ok(client) => rsx! {
            ui::SessionProvider {
                ui::FavoritesProvider {
                    client,
                    Router::<Route> {}
                }
            }
        },
        Err(message) => rsx! {
            p { class: "config-error", "Invalid backend configuration: {message}" }
        },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: ui::RECIPES_CSS }
        {body}
    }
}
