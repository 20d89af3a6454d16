//! Dioxus bindings for the shared favorites store.
//!
//! [`FavoritesProvider`] puts one [`FavoritesStore`] in context. Every
//! component calling [`use_favorites`] binds to it, rerenders when the set
//! changes, and follows the session credential.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use api::ApiClient;
use dioxus::prelude::*;
use store::{
    AsRecipeId, Credential, CredentialChange, FavoritesBinding, FavoritesError, FavoritesSnapshot,
    FavoritesStore, RecipeId,
};

use crate::session::use_session;

pub type SharedFavorites = FavoritesStore<ApiClient>;

/// Provides the backend client and the favorites store to the subtree.
#[component]
pub fn FavoritesProvider(client: ApiClient, children: Element) -> Element {
    use_context_provider(|| client.clone());
    use_context_provider(|| SharedFavorites::new(client.clone()));

    rsx! {
        {children}
    }
}

pub fn use_api() -> ApiClient {
    use_context::<ApiClient>()
}

/// One render's view of the favorites set.
#[derive(Clone, PartialEq)]
pub struct UseFavorites {
    store: SharedFavorites,
    snapshot: FavoritesSnapshot,
    credential: Option<Credential>,
}

impl UseFavorites {
    pub fn ids(&self) -> &BTreeSet<RecipeId> {
        &self.snapshot.ids
    }

    pub fn snapshot(&self) -> &FavoritesSnapshot {
        &self.snapshot
    }

    /// Reads the live store, so it is current even between renders.
    pub fn is_favorite(&self, id: impl AsRecipeId) -> bool {
        self.store.is_favorite(id)
    }

    pub fn is_pending(&self, id: RecipeId) -> bool {
        self.store.is_pending(id)
    }

    pub fn hydrated(&self) -> bool {
        self.snapshot.hydrated
    }

    pub fn is_logged_in(&self) -> bool {
        self.credential.is_some()
    }

    /// Toggle with the session credential of this render.
    pub async fn toggle(&self, id: RecipeId) -> Result<bool, FavoritesError> {
        self.store.toggle(id, self.credential.as_ref()).await
    }

    /// Refetch the server set, e.g. on pull-to-refresh.
    pub async fn refresh(&self) -> bool {
        self.store.hydrate(self.credential.as_ref()).await
    }
}

pub fn use_favorites() -> UseFavorites {
    let store = use_context::<SharedFavorites>();
    let session = use_session();
    let version = use_signal_sync(|| 0u64);

    let binding = use_hook(|| {
        let store = store.clone();
        Rc::new(RefCell::new(FavoritesBinding::bind(store, move || {
            let mut version = version;
            *version.write() += 1;
        })))
    });

    {
        let binding = binding.clone();
        use_effect(move || {
            let token = session.read().token.clone();
            let change = binding.borrow_mut().update_credential(token);
            match change {
                CredentialChange::LoggedIn(credential) => {
                    let store = binding.borrow().store().clone();
                    spawn(async move {
                        store.hydrate(Some(&credential)).await;
                    });
                }
                CredentialChange::LoggedOut => tracing::debug!("favorites cleared"),
                CredentialChange::Unchanged => {}
            }
        });
    }

    {
        let binding = binding.clone();
        use_drop(move || binding.borrow_mut().unbind());
    }

    // Subscribe this scope to store notifications.
    let _ = *version.read();

    let snapshot = binding.borrow().read();
    let credential = session.read().token.clone();
    UseFavorites {
        store,
        snapshot,
        credential,
    }
}
