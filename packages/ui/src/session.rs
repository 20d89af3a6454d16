//! Session context: who is using the app, if anyone.

use api::{ApiClient, ApiError, Credential};
use dioxus::prelude::*;

use crate::favorites::SharedFavorites;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub token: Option<Credential>,
    /// Browsing without an account.
    pub guest: bool,
    pub loading: bool,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the entry screen can be skipped.
    pub fn has_entered(&self) -> bool {
        self.guest || self.is_logged_in()
    }
}

/// Current session. Updates when the user logs in or out.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

#[component]
pub fn SessionProvider(children: Element) -> Element {
    let session = use_signal(SessionState::default);
    use_context_provider(|| session);

    rsx! {
        {children}
    }
}

/// Log in and store the credential in the session.
pub async fn login(
    session: &mut Signal<SessionState>,
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    session.write().loading = true;
    match client.login(email, password).await {
        Ok(response) => {
            session.set(SessionState {
                token: Some(response.credential),
                guest: false,
                loading: false,
            });
            Ok(())
        }
        Err(e) => {
            tracing::warn!("login failed: {}", e);
            session.write().loading = false;
            Err(e)
        }
    }
}

/// Enter without an account. Clears any favorites left from a session.
pub fn continue_as_guest(session: &mut Signal<SessionState>, favorites: &SharedFavorites) {
    favorites.reset();
    session.set(SessionState {
        token: None,
        guest: true,
        loading: false,
    });
}

/// End the session and clear the user's favorites in the same step.
pub fn logout(session: &mut Signal<SessionState>, favorites: &SharedFavorites) {
    favorites.reset();
    session.set(SessionState::default());
    tracing::info!("logged out");
}
