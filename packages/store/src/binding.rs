//! View binding: connects one consumer (a screen, a component) to the shared
//! [`FavoritesStore`].
//!
//! A binding subscribes a change callback for as long as it lives and follows
//! the session credential: logging in (or switching users) hydrates, logging
//! out resets the store. The Dioxus hook in the `ui` crate is a thin wrapper
//! around this type.

use std::fmt;

use crate::client::FavoritesClient;
use crate::error::FavoritesError;
use crate::favorites::FavoritesStore;
use crate::listeners::Subscription;
use crate::models::{AsRecipeId, Credential, FavoritesSnapshot};

/// What a credential update asks the caller to do.
#[derive(Clone, Debug, PartialEq)]
pub enum CredentialChange {
    Unchanged,
    /// A session started or switched user; hydrate with this credential.
    LoggedIn(Credential),
    /// The session ended; the store has already been reset.
    LoggedOut,
}

pub struct FavoritesBinding<C> {
    store: FavoritesStore<C>,
    credential: Option<Credential>,
    subscription: Option<Subscription>,
}

impl<C: FavoritesClient> FavoritesBinding<C> {
    /// Subscribe `on_change` to the store. The binding starts without a
    /// credential; call [`set_credential`](Self::set_credential) next.
    pub fn bind(store: FavoritesStore<C>, on_change: impl Fn() + Send + Sync + 'static) -> Self {
        let subscription = store.subscribe(on_change);
        Self {
            store,
            credential: None,
            subscription: Some(subscription),
        }
    }

    pub fn store(&self) -> &FavoritesStore<C> {
        &self.store
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    /// Record the session credential without doing any I/O.
    ///
    /// Resets the store on logout. On login the caller is expected to run
    /// [`FavoritesStore::hydrate`] with the returned credential.
    pub fn update_credential(&mut self, credential: Option<Credential>) -> CredentialChange {
        if credential == self.credential {
            return CredentialChange::Unchanged;
        }
        self.credential = credential;
        match &self.credential {
            Some(credential) => CredentialChange::LoggedIn(credential.clone()),
            None => {
                self.store.reset();
                CredentialChange::LoggedOut
            }
        }
    }

    /// Follow a credential change, hydrating when a session starts or
    /// switches. Returns whether a fetched set was applied.
    pub async fn set_credential(&mut self, credential: Option<Credential>) -> bool {
        match self.update_credential(credential) {
            CredentialChange::LoggedIn(credential) => self.store.hydrate(Some(&credential)).await,
            CredentialChange::Unchanged | CredentialChange::LoggedOut => false,
        }
    }

    pub fn read(&self) -> FavoritesSnapshot {
        self.store.snapshot()
    }

    pub fn is_favorite(&self, id: impl AsRecipeId) -> bool {
        self.store.is_favorite(id)
    }

    /// Toggle with the binding's current credential.
    pub async fn toggle(&self, id: impl AsRecipeId + fmt::Debug) -> Result<bool, FavoritesError> {
        self.store.toggle(id, self.credential.as_ref()).await
    }

    /// Stop receiving change notifications. Also happens on drop.
    pub fn unbind(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
