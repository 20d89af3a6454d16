//! # FavoritesStore: optimistic favorite-set synchronisation
//!
//! The store owns the local set of favorited recipe ids for the active
//! session and keeps it consistent with the backend reached through a
//! [`FavoritesClient`].
//!
//! ## Operations
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`snapshot`](FavoritesStore::snapshot) / [`ids`](FavoritesStore::ids) | Immutable view of the current set. |
//! | [`is_favorite`](FavoritesStore::is_favorite) | Membership test after coercing the id. |
//! | [`hydrate`](FavoritesStore::hydrate) | Replace the set with the backend's. Guarded so only one fetch runs at a time; failures keep the previous set. |
//! | [`toggle`](FavoritesStore::toggle) | Flip membership locally, broadcast, call the backend, and roll back plus re-raise on failure. |
//! | [`reset`](FavoritesStore::reset) | Logout: clear the set and the hydration state. |
//! | [`subscribe`](FavoritesStore::subscribe) | Register a change callback; the returned [`Subscription`] unsubscribes on drop. |
//!
//! ## Sessions
//!
//! Every [`reset`](FavoritesStore::reset) starts a new session epoch. Work
//! started in an earlier epoch (a slow hydration, a failing toggle) is not
//! allowed to write into the new one: its fetched set or its compensation is
//! dropped.
//!
//! ## Concurrency
//!
//! Toggles on different ids run independently. Two toggles on the same id
//! are not serialized and race; callers should disable the control while
//! [`is_pending`](FavoritesStore::is_pending) is true.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::client::FavoritesClient;
use crate::error::FavoritesError;
use crate::listeners::{Listener, Listeners, Subscription};
use crate::lock;
use crate::models::{AsRecipeId, Credential, FavoritesSnapshot, RecipeId};

#[derive(Default)]
struct State {
    ids: Arc<BTreeSet<RecipeId>>,
    hydrated: bool,
    version: u64,
    epoch: u64,
    /// Epoch of the hydration currently in flight.
    hydrating: Option<u64>,
    /// In-flight toggle count per id.
    pending: HashMap<RecipeId, usize>,
}

impl State {
    fn snapshot(&self) -> FavoritesSnapshot {
        FavoritesSnapshot {
            ids: Arc::clone(&self.ids),
            hydrated: self.hydrated,
            version: self.version,
        }
    }

    fn flip(&mut self, id: RecipeId, add: bool) {
        let ids = Arc::make_mut(&mut self.ids);
        if add {
            ids.insert(id);
        } else {
            ids.remove(&id);
        }
        self.version += 1;
    }
}

/// Shared favorites state for one application.
///
/// Cheap to clone; clones share state. Build one per app (or per test).
pub struct FavoritesStore<C> {
    client: Arc<C>,
    state: Arc<Mutex<State>>,
    listeners: Listeners,
}

impl<C> Clone for FavoritesStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            state: Arc::clone(&self.state),
            listeners: self.listeners.clone(),
        }
    }
}

impl<C> fmt::Debug for FavoritesStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("FavoritesStore")
            .field("ids", &state.ids)
            .field("hydrated", &state.hydrated)
            .field("version", &state.version)
            .finish()
    }
}

impl<C> PartialEq for FavoritesStore<C> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<C: FavoritesClient> FavoritesStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
            state: Arc::default(),
            listeners: Listeners::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        lock(&self.state).snapshot()
    }

    /// The current id set. Never changes after it is returned.
    pub fn ids(&self) -> Arc<BTreeSet<RecipeId>> {
        Arc::clone(&lock(&self.state).ids)
    }

    pub fn is_favorite(&self, id: impl AsRecipeId) -> bool {
        match id.as_recipe_id() {
            Some(id) => lock(&self.state).ids.contains(&id),
            None => false,
        }
    }

    pub fn hydrated(&self) -> bool {
        lock(&self.state).hydrated
    }

    pub fn is_hydrating(&self) -> bool {
        lock(&self.state).hydrating.is_some()
    }

    /// Whether a toggle for `id` is waiting on the backend.
    pub fn is_pending(&self, id: impl AsRecipeId) -> bool {
        match id.as_recipe_id() {
            Some(id) => lock(&self.state).pending.contains_key(&id),
            None => false,
        }
    }

    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(Arc::new(listener))
    }

    /// Like [`subscribe`](Self::subscribe), but keeps set semantics for a
    /// listener that is already registered.
    pub fn subscribe_listener(&self, listener: Listener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Fetch the authoritative set and replace the local one with it.
    ///
    /// Returns `true` when a fetched set was applied. No credential, a
    /// hydration already in flight, a failed fetch and a session reset
    /// during the fetch all return `false` and leave the set untouched.
    pub async fn hydrate(&self, credential: Option<&Credential>) -> bool {
        let Some(credential) = credential else {
            return false;
        };

        let epoch = {
            let mut state = lock(&self.state);
            if state.hydrating.is_some() {
                tracing::debug!("favorites hydration already in flight");
                return false;
            }
            state.hydrating = Some(state.epoch);
            state.epoch
        };
        let _gate = HydrationGate {
            state: &self.state,
            epoch,
        };

        let ids = match self.client.favorite_ids(credential).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Failed to hydrate favorites: {}", e);
                return false;
            }
        };

        let count = {
            let mut state = lock(&self.state);
            if state.epoch != epoch {
                tracing::debug!("discarding favorites fetched for an ended session");
                return false;
            }
            state.ids = Arc::new(ids.into_iter().collect());
            state.hydrated = true;
            state.version += 1;
            state.ids.len()
        };
        self.listeners.notify();
        tracing::info!(count, "favorites hydrated");
        true
    }

    /// Flip the favorite state of `id`, optimistically.
    ///
    /// The local set changes and subscribers are notified before the backend
    /// is called. Subscribers are notified a second time when the call ends:
    /// on success with the set unchanged and [`is_pending`](Self::is_pending)
    /// cleared, on failure with the change reversed. Failures are returned.
    /// Returns the new favorite state.
    ///
    /// Without a credential, or with an id that has no integer form, nothing
    /// changes and no request is made.
    ///
    /// Dropping the returned future while the request is in flight keeps the
    /// optimistic state until the next hydration.
    pub async fn toggle(
        &self,
        id: impl AsRecipeId + fmt::Debug,
        credential: Option<&Credential>,
    ) -> Result<bool, FavoritesError> {
        let Some(credential) = credential else {
            return Err(FavoritesError::NotLoggedIn);
        };
        let Some(recipe_id) = id.as_recipe_id() else {
            return Err(FavoritesError::InvalidRecipeId(format!("{id:?}")));
        };

        let (should_add, epoch) = {
            let mut state = lock(&self.state);
            let should_add = !state.ids.contains(&recipe_id);
            state.flip(recipe_id, should_add);
            *state.pending.entry(recipe_id).or_insert(0) += 1;
            (should_add, state.epoch)
        };
        let pending = PendingToggle {
            state: &self.state,
            id: recipe_id,
            epoch,
        };
        self.listeners.notify();

        let result = if should_add {
            self.client.add_favorite(recipe_id, credential).await
        } else {
            self.client.remove_favorite(recipe_id, credential).await
        };
        drop(pending);

        match result {
            Ok(favorite) => {
                if favorite != should_add {
                    tracing::debug!(
                        id = %recipe_id,
                        favorite,
                        "backend favorite flag differs from requested state"
                    );
                }
                // Pending cleared; a reset in between has already notified.
                if lock(&self.state).epoch == epoch {
                    self.listeners.notify();
                }
                Ok(should_add)
            }
            Err(e) => {
                let compensated = {
                    let mut state = lock(&self.state);
                    if state.epoch == epoch {
                        state.flip(recipe_id, !should_add);
                        true
                    } else {
                        false
                    }
                };
                if compensated {
                    self.listeners.notify();
                }
                tracing::warn!(id = %recipe_id, "Failed to change favorite status: {}", e);
                Err(FavoritesError::Request(e))
            }
        }
    }

    /// End the current session: clear the set and hydration state.
    pub fn reset(&self) {
        {
            let mut state = lock(&self.state);
            state.epoch += 1;
            state.ids = Arc::default();
            state.hydrated = false;
            state.hydrating = None;
            state.pending.clear();
            state.version += 1;
        }
        self.listeners.notify();
        tracing::debug!("favorites cleared");
    }
}

/// Releases the hydration flag when the fetch ends, including when the
/// hydrating future is dropped.
struct HydrationGate<'a> {
    state: &'a Mutex<State>,
    epoch: u64,
}

impl Drop for HydrationGate<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.hydrating == Some(self.epoch) {
            state.hydrating = None;
        }
    }
}

struct PendingToggle<'a> {
    state: &'a Mutex<State>,
    id: RecipeId,
    epoch: u64,
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.epoch != self.epoch {
            return;
        }
        if let Some(count) = state.pending.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                state.pending.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::yield_now;

    fn credential() -> Credential {
        Credential::new("token-a").unwrap()
    }

    fn ids(list: &[i64]) -> BTreeSet<RecipeId> {
        list.iter().copied().map(RecipeId).collect()
    }

    fn counting(store: &FavoritesStore<FakeBackend>) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = store.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, sub)
    }

    async fn hydrated_store(server: &[i64]) -> (FavoritesStore<FakeBackend>, FakeBackend) {
        let backend = FakeBackend::with_ids(server);
        let store = FavoritesStore::new(backend.clone());
        assert!(store.hydrate(Some(&credential())).await);
        (store, backend)
    }

    #[tokio::test]
    async fn test_hydrate_then_read() {
        let (store, _) = hydrated_store(&[3, 7, 9]).await;

        assert_eq!(*store.ids(), ids(&[3, 7, 9]));
        assert!(store.is_favorite(7));
        assert!(!store.is_favorite(2));
        assert!(store.hydrated());

        // Reads are stable without intervening mutation.
        assert_eq!(store.is_favorite(7), store.is_favorite(7));
        assert_eq!(store.is_favorite("7"), store.is_favorite(7u16));
    }

    #[tokio::test]
    async fn test_hydrate_replaces_instead_of_merging() {
        let backend = FakeBackend::with_ids(&[4]);
        let store = FavoritesStore::new(backend.clone());
        store.hydrate(Some(&credential())).await;
        assert_eq!(*store.ids(), ids(&[4]));

        backend.set_server_ids(&[1, 2, 3]);
        assert!(store.hydrate(Some(&credential())).await);
        assert_eq!(*store.ids(), ids(&[1, 2, 3]));
    }

    #[tokio::test]
    async fn test_hydrate_without_credential_is_noop() {
        let backend = FakeBackend::with_ids(&[1]);
        let store = FavoritesStore::new(backend.clone());
        let (notified, _sub) = counting(&store);

        assert!(!store.hydrate(None).await);

        assert_eq!(backend.fetch_calls(), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert!(!store.hydrated());
    }

    #[tokio::test]
    async fn test_concurrent_hydrations_fetch_once() {
        let backend = FakeBackend::with_ids(&[3, 7, 9]);
        let store = FavoritesStore::new(backend.clone());
        let cred = credential();
        backend.hold();

        let (first, second) = tokio::join!(store.hydrate(Some(&cred)), async {
            yield_now().await;
            assert!(store.is_hydrating());
            let second = store.hydrate(Some(&cred)).await;
            backend.release();
            second
        });

        assert!(first);
        assert!(!second);
        assert_eq!(backend.fetch_calls(), 1);
        assert_eq!(*store.ids(), ids(&[3, 7, 9]));
        assert!(!store.is_hydrating());
    }

    #[tokio::test]
    async fn test_failed_hydration_keeps_previous_set_and_releases_gate() {
        let (store, backend) = hydrated_store(&[1, 2]).await;
        let (notified, _sub) = counting(&store);

        backend.set_server_ids(&[5]);
        backend.fail_requests(true);
        assert!(!store.hydrate(Some(&credential())).await);
        assert_eq!(*store.ids(), ids(&[1, 2]));
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert!(!store.is_hydrating());

        backend.fail_requests(false);
        assert!(store.hydrate(Some(&credential())).await);
        assert_eq!(*store.ids(), ids(&[5]));
    }

    #[tokio::test]
    async fn test_toggle_is_optimistic_and_confirmed() {
        let backend = FakeBackend::with_ids(&[]);
        let store = FavoritesStore::new(backend.clone());
        let cred = credential();
        backend.hold();

        let (result, _) = tokio::join!(store.toggle(5, Some(&cred)), async {
            yield_now().await;
            assert!(store.is_favorite(5));
            assert!(store.is_pending(5));
            backend.release();
        });

        assert!(result.unwrap());
        assert!(store.is_favorite(5));
        assert!(!store.is_pending(5));
        assert_eq!(backend.add_calls(), 1);
        assert_eq!(backend.server_ids(), ids(&[5]));
    }

    #[tokio::test]
    async fn test_failed_toggle_is_compensated_and_raised() {
        let backend = FakeBackend::with_ids(&[]);
        let store = FavoritesStore::new(backend.clone());
        let cred = credential();
        backend.hold();
        backend.fail_requests(true);

        let (result, _) = tokio::join!(store.toggle(5, Some(&cred)), async {
            yield_now().await;
            assert!(store.is_favorite(5));
            backend.release();
        });

        assert!(matches!(result, Err(FavoritesError::Request(_))));
        assert!(!store.is_favorite(5));
        assert!(!store.is_pending(5));
    }

    #[tokio::test]
    async fn test_remove_favorite_success() {
        let (store, backend) = hydrated_store(&[3, 7, 9]).await;

        let favorite = store.toggle(7, Some(&credential())).await.unwrap();

        assert!(!favorite);
        assert!(!store.is_favorite(7));
        assert_eq!(backend.remove_calls(), 1);
        assert_eq!(backend.server_ids(), ids(&[3, 9]));
    }

    #[tokio::test]
    async fn test_failed_add_rolls_back_to_hydrated_state() {
        let (store, backend) = hydrated_store(&[3, 7, 9]).await;
        backend.fail_requests(true);

        let err = store.toggle(2, Some(&credential())).await.unwrap_err();

        assert!(!err.is_not_logged_in());
        assert!(!store.is_favorite(2));
        assert_eq!(*store.ids(), ids(&[3, 7, 9]));
    }

    #[tokio::test]
    async fn test_failed_remove_restores_id() {
        let (store, backend) = hydrated_store(&[3]).await;
        backend.fail_requests(true);

        assert!(store.toggle(3, Some(&credential())).await.is_err());
        assert!(store.is_favorite(3));
    }

    #[tokio::test]
    async fn test_notifications_fan_out() {
        let (store, backend) = hydrated_store(&[]).await;
        let (first, _a) = counting(&store);
        let (second, _b) = counting(&store);

        store.toggle(1, Some(&credential())).await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);

        backend.fail_requests(true);
        store.toggle(2, Some(&credential())).await.unwrap_err();
        assert_eq!(first.load(Ordering::SeqCst), 4);
        assert_eq!(second.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_listeners_see_pending_clear_after_success() {
        let (store, backend) = hydrated_store(&[]).await;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (s, reader) = (seen.clone(), store.clone());
        let _sub = store.subscribe(move || {
            s.lock().unwrap().push(reader.is_pending(5));
        });
        let cred = credential();
        backend.hold();

        let (result, _) = tokio::join!(store.toggle(5, Some(&cred)), async {
            yield_now().await;
            assert!(store.is_pending(5));
            backend.release();
        });

        assert!(result.unwrap());
        assert!(!store.is_pending(5));
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_is_not_called() {
        let (store, _) = hydrated_store(&[]).await;
        let (count, sub) = counting(&store);

        sub.unsubscribe();
        store.toggle(1, Some(&credential())).await.unwrap();
        store.reset();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_string_and_numeric_ids_are_the_same_favorite() {
        let (store, backend) = hydrated_store(&[]).await;

        store.toggle("5", Some(&credential())).await.unwrap();
        assert!(store.is_favorite(5));
        assert!(store.snapshot().contains(5i32));

        store.toggle(5u64, Some(&credential())).await.unwrap();
        assert!(!store.is_favorite("5"));
        assert_eq!(backend.add_calls(), 1);
        assert_eq!(backend.remove_calls(), 1);
    }

    #[tokio::test]
    async fn test_toggle_without_credential_short_circuits() {
        let (store, backend) = hydrated_store(&[1]).await;
        let before = store.snapshot();
        let (notified, _sub) = counting(&store);

        let err = store.toggle(2, None).await.unwrap_err();

        assert!(err.is_not_logged_in());
        assert_eq!(store.snapshot(), before);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert_eq!(backend.add_calls() + backend.remove_calls(), 0);
    }

    #[tokio::test]
    async fn test_toggle_rejects_non_integer_id() {
        let (store, backend) = hydrated_store(&[]).await;

        let err = store.toggle("abc", Some(&credential())).await.unwrap_err();

        assert!(matches!(err, FavoritesError::InvalidRecipeId(_)));
        assert!(store.ids().is_empty());
        assert_eq!(backend.add_calls(), 0);
    }

    #[tokio::test]
    async fn test_different_ids_toggle_concurrently() {
        let (store, backend) = hydrated_store(&[]).await;
        let cred = credential();

        let (a, b) = tokio::join!(store.toggle(1, Some(&cred)), store.toggle(2, Some(&cred)));

        assert!(a.unwrap() && b.unwrap());
        assert_eq!(*store.ids(), ids(&[1, 2]));
        assert_eq!(backend.add_calls(), 2);
    }

    #[tokio::test]
    async fn test_snapshots_are_immutable() {
        let (store, _) = hydrated_store(&[1]).await;
        let before = store.snapshot();

        store.toggle(2, Some(&credential())).await.unwrap();

        assert_eq!(*before.ids, ids(&[1]));
        assert_eq!(*store.ids(), ids(&[1, 2]));
        assert!(store.snapshot().version > before.version);
    }

    #[tokio::test]
    async fn test_reset_clears_session_state() {
        let (store, _) = hydrated_store(&[1, 2]).await;
        let (notified, _sub) = counting(&store);

        store.reset();

        assert!(store.ids().is_empty());
        assert!(!store.hydrated());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_hydration() {
        let backend = FakeBackend::with_ids(&[8, 9]);
        let store = FavoritesStore::new(backend.clone());
        let cred = credential();
        backend.hold();

        let (applied, _) = tokio::join!(store.hydrate(Some(&cred)), async {
            yield_now().await;
            store.reset();
            assert!(!store.is_hydrating());
            backend.release();
        });

        assert!(!applied);
        assert!(store.ids().is_empty());
        assert!(!store.hydrated());
    }

    #[tokio::test]
    async fn test_reset_skips_compensation_from_previous_session() {
        let (store, backend) = hydrated_store(&[]).await;
        let cred = credential();
        backend.hold();
        backend.fail_requests(true);

        let (result, _) = tokio::join!(store.toggle(4, Some(&cred)), async {
            yield_now().await;
            store.reset();
            backend.release();
        });

        assert!(result.is_err());
        assert!(!store.is_favorite(4));
        assert!(!store.is_pending(4));
    }

    #[tokio::test]
    async fn test_clones_share_state_and_new_stores_are_isolated() {
        let (store, _) = hydrated_store(&[1]).await;
        let clone = store.clone();
        let other = FavoritesStore::new(FakeBackend::with_ids(&[]));

        clone.toggle(2, Some(&credential())).await.unwrap();

        assert!(store.is_favorite(2));
        assert_eq!(store, clone);
        assert!(other.ids().is_empty());
        assert_ne!(store, other);
    }
}
