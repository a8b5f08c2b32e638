//! Lazily loaded embedding model slot
//!
//! The slot moves through `Unloaded -> Loading -> Loaded -> Evicting ->
//! Unloaded`. Only one caller performs a load; others wait on the condvar
//! and share the result. Eviction takes the model out of the slot but
//! in-flight callers keep their own `Arc`, so memory is reclaimed only when
//! the last inference finishes.
//!
//! Nothing here is allowed to fail a scan: every error degrades to `None`.

use crate::config::ModelConfig;
use crate::error::ModelError;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

/// A loaded model that turns code into a dense vector
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, code: &str) -> Result<Vec<f32>, ModelError>;
}

/// Something that can load an [`EmbeddingModel`]
pub trait EmbeddingBackend: Send + Sync {
    fn name(&self) -> &str;
    fn load(&self) -> Result<Arc<dyn EmbeddingModel>, ModelError>;
}

/// Feature-hashed bag of identifier tokens, L2-normalised
#[derive(Debug, Clone)]
pub struct HashedTokenBackend {
    dimensions: usize,
    max_tokens: usize,
}

impl HashedTokenBackend {
    pub fn new(dimensions: usize, max_tokens: usize) -> Self {
        Self {
            dimensions,
            max_tokens,
        }
    }
}

impl EmbeddingBackend for HashedTokenBackend {
    fn name(&self) -> &str {
        "hashed-token-bag"
    }

    fn load(&self) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        if self.dimensions == 0 {
            return Err(ModelError::LoadFailed("dimensions must be positive".into()));
        }
        Ok(Arc::new(HashedTokenModel {
            dimensions: self.dimensions,
            max_tokens: self.max_tokens,
        }))
    }
}

struct HashedTokenModel {
    dimensions: usize,
    max_tokens: usize,
}

impl EmbeddingModel for HashedTokenModel {
    fn embed(&self, code: &str) -> Result<Vec<f32>, ModelError> {
        let mut vector = vec![0f32; self.dimensions];
        let tokens = code
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| !t.is_empty())
            .take(self.max_tokens);

        for token in tokens {
            let hash = xxh3_64(token.as_bytes());
            let index = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }
}

/// Externally visible lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Unloaded,
    Loading,
    Loaded,
    Evicting,
}

enum ModelState {
    Unloaded,
    Loading,
    Loaded {
        model: Arc<dyn EmbeddingModel>,
        last_used: Instant,
    },
    Evicting,
}

impl ModelState {
    fn status(&self) -> ModelStatus {
        match self {
            ModelState::Unloaded => ModelStatus::Unloaded,
            ModelState::Loading => ModelStatus::Loading,
            ModelState::Loaded { .. } => ModelStatus::Loaded,
            ModelState::Evicting => ModelStatus::Evicting,
        }
    }
}

/// Shared, idle-evictable slot holding at most one loaded model
pub struct ModelSlot {
    backend: Arc<dyn EmbeddingBackend>,
    enabled: bool,
    idle_timeout: Duration,
    state: Mutex<ModelState>,
    changed: Condvar,
}

impl ModelSlot {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, config: &ModelConfig) -> Self {
        Self {
            backend,
            enabled: config.enabled,
            idle_timeout: config.idle_timeout(),
            state: Mutex::new(ModelState::Unloaded),
            changed: Condvar::new(),
        }
    }

    /// Slot backed by the built-in hashed-token embedder
    pub fn with_default_backend(config: &ModelConfig) -> Self {
        let backend = HashedTokenBackend::new(config.dimensions, config.max_code_length);
        Self::new(Arc::new(backend), config)
    }

    pub fn status(&self) -> ModelStatus {
        self.lock().status()
    }

    fn lock(&self) -> MutexGuard<'_, ModelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the loaded model, loading it first if needed
    fn acquire(&self) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        if !self.enabled {
            return Err(ModelError::Disabled);
        }

        let mut state = self.lock();
        loop {
            if let ModelState::Loaded { model, last_used } = &mut *state {
                *last_used = Instant::now();
                return Ok(Arc::clone(model));
            }
            if matches!(*state, ModelState::Unloaded) {
                break;
            }
            // Loading or Evicting: wait for the other caller to finish
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *state = ModelState::Loading;
        drop(state);

        info!("Loading embedding model: {}", self.backend.name());
        let start = Instant::now();
        let guard = LoadGuard { slot: self };
        let loaded = self.backend.load();
        std::mem::forget(guard);

        let mut state = self.lock();
        let outcome = match loaded {
            Ok(model) => {
                info!("Embedding model loaded in {:.2?}", start.elapsed());
                *state = ModelState::Loaded {
                    model: Arc::clone(&model),
                    last_used: Instant::now(),
                };
                Ok(model)
            }
            Err(e) => {
                *state = ModelState::Unloaded;
                Err(e)
            }
        };
        self.changed.notify_all();
        outcome
    }

    /// Embed `code`, or `None` when the model is disabled or fails
    pub fn embed(&self, code: &str) -> Option<Vec<f32>> {
        let model = match self.acquire() {
            Ok(model) => model,
            Err(ModelError::Disabled) => {
                debug!("Embedding skipped: model disabled");
                return None;
            }
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };
        match model.embed(code) {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Unload the model if it has been idle longer than the timeout
    pub fn cleanup(&self) -> bool {
        let idle_for = match &*self.lock() {
            ModelState::Loaded { last_used, .. } => last_used.elapsed(),
            _ => return false,
        };
        if idle_for > self.idle_timeout {
            info!("Embedding model inactive for {:.0?}, unloading", idle_for);
            return self.unload();
        }
        false
    }

    /// Unload unconditionally. Returns whether a model was loaded.
    pub fn unload(&self) -> bool {
        let mut state = self.lock();
        if !matches!(*state, ModelState::Loaded { .. }) {
            return false;
        }
        let previous = std::mem::replace(&mut *state, ModelState::Evicting);
        drop(state);

        // Drops our reference; in-flight callers still hold theirs
        drop(previous);

        *self.lock() = ModelState::Unloaded;
        self.changed.notify_all();
        debug!("Embedding model unloaded");
        true
    }
}

/// Puts the slot back to `Unloaded` if the backend panics mid-load, so
/// waiters are woken instead of blocking on `Loading` forever
struct LoadGuard<'a> {
    slot: &'a ModelSlot,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        warn!("Embedding model load aborted");
        *self.slot.lock() = ModelState::Unloaded;
        self.slot.changed.notify_all();
    }
}

/// Cosine similarity of two vectors; 0.0 for mismatched or zero vectors
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
