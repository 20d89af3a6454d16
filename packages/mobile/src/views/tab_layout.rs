use dioxus::prelude::*;
use ui::{logout, use_session, ActivityLogPanel, ActivityLogToggle, SharedFavorites};

use crate::Route;

#[component]
pub fn TabLayout() -> Element {
    let mut session = use_session();
    let favorites = use_context::<SharedFavorites>();
    let nav = use_navigator();

    if !session().has_entered() {
        nav.replace(Route::Entry {});
    }

    rsx! {
        nav {
            class: "tab-bar",
            Link { to: Route::Recipes {}, "Recipes" }
            if session().is_logged_in() {
                Link { to: Route::Favorites {}, "Favorites" }
            }
            ActivityLogToggle {}
            button {
                onclick: move |_| {
                    logout(&mut session, &favorites);
                    nav.replace(Route::Entry {});
                },
                if session().is_logged_in() { "Log out" } else { "Log in" }
            }
        }
        main {
            Outlet::<Route> {}
        }
        ActivityLogPanel {}
    }
}
