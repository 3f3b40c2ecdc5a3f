//! One-shot payload loading with a liveness check on delivery.
//!
//! The consumer keeps the [`StoreSubscriber`]; the loader gets the
//! [`StoreDelivery`]. A result delivered after the subscriber is dropped is
//! discarded rather than written into state nobody observes.

use super::TrajectoryStore;
use crate::config::PlaybackConfig;
use crate::error::PayloadError;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};
use std::thread::JoinHandle;

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Arc<TrajectoryStore>),
    Failed(PayloadError),
}

#[derive(Debug)]
pub struct StoreSubscriber {
    slot: Arc<Mutex<LoadState>>,
}

#[derive(Debug)]
pub struct StoreDelivery {
    slot: Weak<Mutex<LoadState>>,
    delivered: bool,
}

pub fn subscribe() -> (StoreSubscriber, StoreDelivery) {
    let slot = Arc::new(Mutex::new(LoadState::Loading));
    let delivery = StoreDelivery {
        slot: Arc::downgrade(&slot),
        delivered: false,
    };
    (StoreSubscriber { slot }, delivery)
}

impl StoreSubscriber {
    pub fn is_loading(&self) -> bool {
        matches!(*self.lock(), LoadState::Loading)
    }

    /// The loaded store, if the load has finished successfully.
    pub fn store(&self) -> Option<Arc<TrajectoryStore>> {
        match &*self.lock() {
            LoadState::Ready(store) => Some(Arc::clone(store)),
            _ => None,
        }
    }

    /// Takes the terminal state out, leaving `Loading` while still pending.
    pub fn try_take(&self) -> Option<Result<Arc<TrajectoryStore>, PayloadError>> {
        let mut state = self.lock();
        match std::mem::replace(&mut *state, LoadState::Loading) {
            LoadState::Loading => None,
            LoadState::Ready(store) => {
                *state = LoadState::Ready(Arc::clone(&store));
                Some(Ok(store))
            }
            LoadState::Failed(error) => Some(Err(error)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoadState> {
        // A poisoned slot still holds a complete LoadState value.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StoreDelivery {
    /// Whether anyone is still waiting for this load.
    pub fn is_live(&self) -> bool {
        self.slot.strong_count() > 0
    }

    /// Stores `result` for the subscriber. Returns `false` when the
    /// subscriber is gone and the result was dropped.
    pub fn deliver(mut self, result: Result<TrajectoryStore, PayloadError>) -> bool {
        self.delivered = true;
        self.write(match result {
            Ok(store) => LoadState::Ready(Arc::new(store)),
            Err(error) => LoadState::Failed(error),
        })
    }

    fn write(&self, state: LoadState) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            log::debug!("Payload arrived after its consumer went away; discarding");
            return false;
        };
        let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = state;
        true
    }
}

impl Drop for StoreDelivery {
    fn drop(&mut self) {
        if !self.delivered {
            self.write(LoadState::Failed(PayloadError::Abandoned));
        }
    }
}

/// Reads and parses `path` on a worker thread.
pub fn load_in_background(
    path: impl Into<PathBuf>,
    config: PlaybackConfig,
    delivery: StoreDelivery,
) -> JoinHandle<bool> {
    let path = path.into();
    std::thread::spawn(move || {
        if !delivery.is_live() {
            return false;
        }
        let result = TrajectoryStore::load_from_file(&path, &config);
        if let Err(e) = &result {
            log::error!("Error loading simulation data from {}: {}", path.display(), e);
        }
        delivery.deliver(result)
    })
}

#[cfg(feature = "async")]
pub async fn load_async(
    path: impl AsRef<std::path::Path>,
    config: &PlaybackConfig,
) -> Result<TrajectoryStore, PayloadError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    TrajectoryStore::from_json_str(&content, &config.signals, &config.directions)
}
