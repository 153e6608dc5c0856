//! Thread-safe cached method.
//!
//! Same state machine as [`CachedMethod`](crate::CachedMethod), with storage
//! that can be shared across threads. The stored value sits behind a mutex
//! that is only held to read or write the slot, never while the method runs.
//!
//! ## Races
//!
//! Concurrent calls that all find the slot empty will all invoke the method.
//! Each one stores its own result when it finishes (if caching is still
//! enabled), so the last to finish wins. Callers that need exactly-once
//! invocation must serialize calls themselves.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::error::Result;
use crate::options::{CachedMethodOptions, Global, Resolved};
use crate::state::CacheControl;

/// A cached method usable from several threads at once.
pub struct SharedCachedMethod<F, A, R, C = Global> {
    method: F,
    context: C,
    label: String,
    cache: Mutex<Option<R>>,
    enabled: AtomicBool,
    invocations: AtomicU64,
    hits: AtomicU64,
    _args: PhantomData<fn(A)>,
}

impl<F, A, R, C> SharedCachedMethod<F, A, R, C>
where
    F: Fn(&C, A) -> R,
    C: Default,
{
    /// Build from a positional method and options. See
    /// [`CachedMethod::create`](crate::CachedMethod::create).
    pub fn create(method: Option<F>, options: CachedMethodOptions<F, C>) -> Result<Self> {
        Ok(Self::from_resolved(options.resolve(method)?))
    }

    pub fn from_options(options: CachedMethodOptions<F, C>) -> Result<Self> {
        Self::create(None, options)
    }

    pub fn new(method: F) -> Self {
        Self::with_context(method, C::default())
    }
}

impl<F, A, R, C> SharedCachedMethod<F, A, R, C>
where
    F: Fn(&C, A) -> R,
{
    pub fn with_context(method: F, context: C) -> Self {
        Self::from_resolved(Resolved {
            method,
            context,
            config: Default::default(),
        })
    }

    fn from_resolved(resolved: Resolved<F, C>) -> Self {
        let label = resolved.config.label().to_string();
        debug!(wrapper = %label, enabled = resolved.config.enabled, "shared cached method created");
        Self {
            method: resolved.method,
            context: resolved.context,
            label,
            cache: Mutex::new(None),
            enabled: AtomicBool::new(resolved.config.enabled),
            invocations: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            _args: PhantomData,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Invoke the method, or return the stored result.
    pub fn call(&self, args: A) -> R
    where
        R: Clone,
    {
        if self.enabled.load(Ordering::SeqCst) {
            if let Some(value) = self.slot().as_ref() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(wrapper = %self.label, "cache hit");
                return value.clone();
            }
        }

        debug!(wrapper = %self.label, "invoking method");
        let result = (self.method)(&self.context, args);
        self.invocations.fetch_add(1, Ordering::Relaxed);

        if self.enabled.load(Ordering::SeqCst) {
            *self.slot() = Some(result.clone());
            trace!(wrapper = %self.label, "result stored");
        } else {
            trace!(wrapper = %self.label, "caching disabled, result not stored");
        }
        result
    }

    // The slot is only poisoned if `R::clone` panicked; the Option itself is
    // always in a valid state.
    fn slot(&self) -> MutexGuard<'_, Option<R>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F, A, R, C> CacheControl for SharedCachedMethod<F, A, R, C> {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn has_cache(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(wrapper = %self.label, "cache cleared");
    }

    fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        debug!(wrapper = %self.label, "caching disabled");
    }

    fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        debug!(wrapper = %self.label, "caching enabled");
    }

    fn counters(&self) -> (u64, u64) {
        (
            self.invocations.load(Ordering::Relaxed),
            self.hits.load(Ordering::Relaxed),
        )
    }
}

impl<F, A, R, C: fmt::Debug> fmt::Debug for SharedCachedMethod<F, A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCachedMethod")
            .field("label", &self.label)
            .field("context", &self.context)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
