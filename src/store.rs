//! The pending image store.
//!
//! Bridges a synchronous render call to a later fetch by the browser: the
//! submit handler stages the returned bytes under a fresh identifier, and the
//! image handler serves them back by that identifier. The store is
//! process-local and non-durable; entries are lost on restart and are not
//! shared across instances.
//!
//! Memory is bounded by a capacity cap: when full, the oldest staged entry is
//! evicted to make room. Reads do not evict, so a browser refresh can
//! re-fetch a recently rendered image.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

/// Default number of staged images retained before eviction kicks in
pub const DEFAULT_CAPACITY: usize = 128;

/// An image staged for retrieval, with the content type the backend declared
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Synchronized identifier-to-image map shared between handlers.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct ImageStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    images: HashMap<String, StagedImage>,
    // Insertion order, oldest first; drives eviction when at capacity
    order: VecDeque<String>,
    capacity: usize,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                images: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            })),
        }
    }

    /// Stage an image and return the identifier it can be fetched under.
    ///
    /// Identifiers are random 128-bit UUIDs, so they are unguessable and
    /// never reused. When the store is at capacity the oldest entry is
    /// dropped first.
    pub fn stage(&self, image: StagedImage) -> String {
        let mut inner = self.lock();
        while inner.order.len() >= inner.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                log::debug!("evicting staged image {oldest}");
                inner.images.remove(&oldest);
            }
        }
        let id = Uuid::new_v4().to_string();
        inner.order.push_back(id.clone());
        inner.images.insert(id.clone(), image);
        id
    }

    /// Fetch a staged image by identifier. `None` if it was never staged,
    /// has been evicted, or the process restarted since.
    pub fn get(&self, id: &str) -> Option<StagedImage> {
        self.lock().images.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().images.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-insert; nothing to salvage.
        self.inner.lock().expect("pending image store lock poisoned")
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}
