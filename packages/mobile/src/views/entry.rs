use dioxus::prelude::*;
use ui::{
    continue_as_guest, log_activity, use_activity_log, use_api, use_session, LogLevel,
    SharedFavorites,
};

use crate::Route;

/// Login form with a guest shortcut.
#[component]
pub fn Entry() -> Element {
    let client = use_api();
    let mut session = use_session();
    let favorites = use_context::<SharedFavorites>();
    let mut log = use_activity_log();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    if session().has_entered() {
        nav.replace(Route::Recipes {});
    }

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        async move {
            error.set(None);
            match ui::login(&mut session, &client, &email(), &password()).await {
                Ok(()) => {
                    password.set(String::new());
                    log_activity(&mut log, LogLevel::Success, "Logged in");
                    nav.replace(Route::Recipes {});
                }
                Err(e) if e.is_unauthorized() => error.set(Some("Wrong email or password".into())),
                Err(e) => error.set(Some(format!("Login failed: {e}"))),
            }
        }
    };

    rsx! {
        form {
            class: "entry-form",
            onsubmit,
            h1 { "Recipes" }
            input {
                r#type: "email",
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            if let Some(message) = error() {
                p { class: "entry-error", "{message}" }
            }
            button {
                r#type: "submit",
                disabled: session().loading,
                if session().loading { "Logging in..." } else { "Log in" }
            }
            button {
                r#type: "button",
                onclick: move |_| {
                    continue_as_guest(&mut session, &favorites);
                    nav.replace(Route::Recipes {});
                },
                "Continue as guest"
            }
        }
    }
}
