//! Cached Method - first-result memoization for callables
//!
//! Wraps a method so that its first result is stored and handed back on
//! every later call, with controls to inspect, clear, disable and re-enable
//! the stored value. Exactly one result is kept per wrapper; arguments are
//! forwarded but never used as a key.
//!
//! ```
//! use cached_method::{cached, CacheControl};
//!
//! let wrapper = cached(rand::random::<f64>);
//! let first = wrapper.call(());
//! assert_eq!(wrapper.call(()), first);
//!
//! wrapper.disable();
//! assert!(wrapper.has_cache());
//! wrapper.enable();
//! assert_eq!(wrapper.call(()), first);
//! ```

pub mod config;
pub mod error;
pub mod method;
pub mod options;
pub mod shared;
pub mod state;

pub use config::CacheConfig;
pub use error::{CachedMethodError, ErrorCode, Result};
pub use method::{cached, CachedMethod};
pub use options::{CachedMethodOptions, Global};
pub use shared::SharedCachedMethod;
pub use state::{CacheControl, CacheState, CacheStatus};
