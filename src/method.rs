//! Single-threaded cached method.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::Result;
use crate::options::{CachedMethodOptions, Global, Resolved};
use crate::state::CacheControl;

/// Wraps a method and remembers its first result.
///
/// `F` is invoked as `method(&context, args)`. `A` is the argument value
/// (use a tuple for several arguments, `()` for none) and `R` the result.
///
/// Controls take `&self`, so the wrapped method may itself hold a handle to
/// the wrapper (e.g. through an `Rc`) and toggle it mid-call. No borrow of
/// the stored value is held while the method runs.
pub struct CachedMethod<F, A, R, C = Global> {
    method: F,
    context: C,
    label: String,
    cache: RefCell<Option<R>>,
    enabled: Cell<bool>,
    invocations: Cell<u64>,
    hits: Cell<u64>,
    _args: PhantomData<fn(A)>,
}

impl<F, A, R, C> CachedMethod<F, A, R, C>
where
    F: Fn(&C, A) -> R,
    C: Default,
{
    /// Build from a positional method and options.
    ///
    /// `options.method` wins over `method`. Fails with `InvalidArgument`
    /// when neither is set.
    pub fn create(method: Option<F>, options: CachedMethodOptions<F, C>) -> Result<Self> {
        Ok(Self::from_resolved(options.resolve(method)?))
    }

    /// Build from options alone.
    pub fn from_options(options: CachedMethodOptions<F, C>) -> Result<Self> {
        Self::create(None, options)
    }

    /// Wrap `method` with the default receiver.
    pub fn new(method: F) -> Self {
        Self::with_context(method, C::default())
    }
}

impl<F, A, R, C> CachedMethod<F, A, R, C>
where
    F: Fn(&C, A) -> R,
{
    /// Wrap `method`, invoking it against `context`.
    pub fn with_context(method: F, context: C) -> Self {
        Self::from_resolved(Resolved {
            method,
            context,
            config: Default::default(),
        })
    }

    pub(crate) fn from_resolved(resolved: Resolved<F, C>) -> Self {
        let label = resolved.config.label().to_string();
        debug!(wrapper = %label, enabled = resolved.config.enabled, "cached method created");
        Self {
            method: resolved.method,
            context: resolved.context,
            label,
            cache: RefCell::new(None),
            enabled: Cell::new(resolved.config.enabled),
            invocations: Cell::new(0),
            hits: Cell::new(0),
            _args: PhantomData,
        }
    }

    /// The receiver every invocation runs against.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Invoke the method, or return the stored result.
    ///
    /// The enabled flag is read again after the method returns; a result is
    /// stored only if caching is still enabled at that point.
    pub fn call(&self, args: A) -> R
    where
        R: Clone,
    {
        if self.enabled.get() {
            if let Some(value) = self.cache.borrow().as_ref() {
                self.record_hit();
                return value.clone();
            }
        }

        let result = self.invoke(args);
        if self.enabled.get() {
            *self.cache.borrow_mut() = Some(result.clone());
            trace!(wrapper = %self.label, "result stored");
        } else {
            trace!(wrapper = %self.label, "caching disabled, result not stored");
        }
        result
    }

    /// Borrow the wrapper as a plain closure.
    pub fn as_fn(&self) -> impl Fn(A) -> R + '_
    where
        R: Clone,
    {
        move |args| self.call(args)
    }

    fn invoke(&self, args: A) -> R {
        debug!(wrapper = %self.label, enabled = self.enabled.get(), "invoking method");
        let result = (self.method)(&self.context, args);
        self.invocations.set(self.invocations.get() + 1);
        result
    }

    fn record_hit(&self) {
        self.hits.set(self.hits.get() + 1);
        trace!(wrapper = %self.label, "cache hit");
    }
}

impl<F, A, T, E, C> CachedMethod<F, A, std::result::Result<T, E>, C>
where
    F: Fn(&C, A) -> std::result::Result<T, E>,
    T: Clone,
    E: Clone,
{
    /// Like [`call`](Self::call) for fallible methods.
    ///
    /// Only `Ok` values are stored by this entry point. An `Err` is handed
    /// back untouched and leaves the stored value as it was. Whatever is
    /// stored is returned as-is while enabled, including an `Err` that
    /// [`call`](Self::call) put there, so a populated wrapper never recomputes.
    pub fn try_call(&self, args: A) -> std::result::Result<T, E> {
        if self.enabled.get() {
            if let Some(entry) = self.cache.borrow().as_ref() {
                self.record_hit();
                return entry.clone();
            }
        }

        let result = self.invoke(args);
        match &result {
            Ok(value) if self.enabled.get() => {
                *self.cache.borrow_mut() = Some(Ok(value.clone()));
                trace!(wrapper = %self.label, "result stored");
            }
            Ok(_) => {
                trace!(wrapper = %self.label, "caching disabled, result not stored");
            }
            Err(_) => {}
        }
        result
    }
}

impl<F, A, R, C> CacheControl for CachedMethod<F, A, R, C> {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn has_cache(&self) -> bool {
        self.cache.borrow().is_some()
    }

    fn clear_cache(&self) {
        self.cache.replace(None);
        debug!(wrapper = %self.label, "cache cleared");
    }

    fn disable(&self) {
        self.enabled.set(false);
        debug!(wrapper = %self.label, "caching disabled");
    }

    fn enable(&self) {
        self.enabled.set(true);
        debug!(wrapper = %self.label, "caching enabled");
    }

    fn counters(&self) -> (u64, u64) {
        (self.invocations.get(), self.hits.get())
    }
}

impl<F, A, R, C: fmt::Debug> fmt::Debug for CachedMethod<F, A, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMethod")
            .field("label", &self.label)
            .field("context", &self.context)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Wrap a zero-argument closure. Call it with `()`.
pub fn cached<R, G>(method: G) -> CachedMethod<impl Fn(&Global, ()) -> R, (), R>
where
    G: Fn() -> R,
{
    CachedMethod::with_context(move |_: &Global, (): ()| method(), Global)
}
