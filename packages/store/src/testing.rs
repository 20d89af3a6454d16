//! In-process favorites backend for unit tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::client::FavoritesClient;
use crate::error::ClientError;
use crate::models::{Credential, RecipeId};

struct Inner {
    server_ids: Mutex<BTreeSet<RecipeId>>,
    fetch_calls: AtomicUsize,
    add_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    fail: AtomicBool,
    /// `false` while requests are held back.
    open: watch::Sender<bool>,
}

/// Fake backend that can hold requests in flight and fail on demand.
#[derive(Clone)]
pub(crate) struct FakeBackend {
    inner: Arc<Inner>,
}

impl FakeBackend {
    pub fn with_ids(ids: &[i64]) -> Self {
        let (open, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                server_ids: Mutex::new(ids.iter().copied().map(RecipeId).collect()),
                fetch_calls: AtomicUsize::new(0),
                add_calls: AtomicUsize::new(0),
                remove_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                open,
            }),
        }
    }

    pub fn set_server_ids(&self, ids: &[i64]) {
        *self.inner.server_ids.lock().unwrap() = ids.iter().copied().map(RecipeId).collect();
    }

    pub fn server_ids(&self) -> BTreeSet<RecipeId> {
        self.inner.server_ids.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.inner.add_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.inner.remove_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent requests fail with a transport-style error.
    pub fn fail_requests(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    /// Keep requests pending until [`release`](Self::release).
    pub fn hold(&self) {
        self.inner.open.send_replace(false);
    }

    pub fn release(&self) {
        self.inner.open.send_replace(true);
    }

    async fn respond(&self) -> Result<(), ClientError> {
        let mut open = self.inner.open.subscribe();
        open.wait_for(|open| *open)
            .await
            .map_err(|e| -> ClientError { Box::new(e) })?;
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err("backend unavailable".into());
        }
        Ok(())
    }
}

impl FavoritesClient for FakeBackend {
    async fn favorite_ids(&self, _credential: &Credential) -> Result<Vec<RecipeId>, ClientError> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        Ok(self.server_ids().into_iter().collect())
    }

    async fn add_favorite(&self, id: RecipeId, _credential: &Credential) -> Result<bool, ClientError> {
        self.inner.add_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        self.inner.server_ids.lock().unwrap().insert(id);
        Ok(true)
    }

    async fn remove_favorite(
        &self,
        id: RecipeId,
        _credential: &Credential,
    ) -> Result<bool, ClientError> {
        self.inner.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        self.inner.server_ids.lock().unwrap().remove(&id);
        Ok(false)
    }
}
