//! Construction options and argument resolution.

use crate::config::CacheConfig;
use crate::error::{CachedMethodError, Result};

/// Default invocation receiver.
///
/// Used whenever no context is supplied, or the supplied context is `None`.
/// Any `Default` type can stand in for it; this one carries no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Global;

/// Options accepted by the cached method constructors.
#[derive(Debug, Clone)]
pub struct CachedMethodOptions<F, C = Global> {
    /// Method to wrap. Overrides the positional method when set.
    pub method: Option<F>,

    /// Receiver passed to every invocation. `None` means `C::default()`.
    pub context: Option<C>,

    /// Log label and starting enabled state.
    pub config: CacheConfig,
}

impl<F, C> Default for CachedMethodOptions<F, C> {
    fn default() -> Self {
        Self {
            method: None,
            context: None,
            config: CacheConfig::default(),
        }
    }
}

impl<F, C> CachedMethodOptions<F, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: F) -> Self {
        self.method = Some(method);
        self
    }

    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Pick the method and receiver a wrapper will be built from.
    pub(crate) fn resolve(self, positional: Option<F>) -> Result<Resolved<F, C>>
    where
        C: Default,
    {
        let method = self
            .method
            .or(positional)
            .ok_or_else(CachedMethodError::missing_method)?;

        Ok(Resolved {
            method,
            context: self.context.unwrap_or_default(),
            config: self.config,
        })
    }
}

/// Fully resolved construction arguments.
#[derive(Debug)]
pub(crate) struct Resolved<F, C> {
    pub method: F,
    pub context: C,
    pub config: CacheConfig,
}
