//! Cache state machine types and the control surface shared by all wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four states a wrapper can be in.
///
/// Invocation never leaves a `Disabled*` state and never overwrites the
/// stale value held in `DisabledPopulated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheState {
    EnabledEmpty,
    EnabledPopulated,
    DisabledEmpty,
    DisabledPopulated,
}

impl CacheState {
    pub fn from_flags(enabled: bool, has_cache: bool) -> Self {
        match (enabled, has_cache) {
            (true, false) => Self::EnabledEmpty,
            (true, true) => Self::EnabledPopulated,
            (false, false) => Self::DisabledEmpty,
            (false, true) => Self::DisabledPopulated,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::EnabledEmpty | Self::EnabledPopulated)
    }

    pub fn has_cache(&self) -> bool {
        matches!(self, Self::EnabledPopulated | Self::DisabledPopulated)
    }

    /// True when the next invocation will return the stored value.
    pub fn will_hit(&self) -> bool {
        matches!(self, Self::EnabledPopulated)
    }
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnabledEmpty => write!(f, "ENABLED_EMPTY"),
            Self::EnabledPopulated => write!(f, "ENABLED_POPULATED"),
            Self::DisabledEmpty => write!(f, "DISABLED_EMPTY"),
            Self::DisabledPopulated => write!(f, "DISABLED_POPULATED"),
        }
    }
}

/// Point-in-time snapshot of a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    pub state: CacheState,
    pub enabled: bool,
    pub has_cache: bool,
    /// Completed invocations of the wrapped method.
    pub invocations: u64,
    /// Calls answered from the stored value.
    pub hits: u64,
}

impl CacheStatus {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Runtime controls exposed by every cached method.
pub trait CacheControl {
    /// Whether invocation may return the stored value.
    fn is_enabled(&self) -> bool;

    /// Whether a value is currently stored.
    fn has_cache(&self) -> bool;

    /// Drop the stored value. Does not touch the enabled flag.
    fn clear_cache(&self);

    /// Stop short-circuiting. The stored value is kept.
    fn disable(&self);

    /// Resume short-circuiting. Does not populate the cache.
    fn enable(&self);

    /// Completed invocations and hits, in that order.
    fn counters(&self) -> (u64, u64);

    fn state(&self) -> CacheState {
        CacheState::from_flags(self.is_enabled(), self.has_cache())
    }

    fn status(&self) -> CacheStatus {
        let state = self.state();
        let (invocations, hits) = self.counters();
        CacheStatus {
            state,
            enabled: state.is_enabled(),
            has_cache: state.has_cache(),
            invocations,
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_round_trips_flags() {
        for enabled in [true, false] {
            for has_cache in [true, false] {
                let state = CacheState::from_flags(enabled, has_cache);
                assert_eq!(state.is_enabled(), enabled);
                assert_eq!(state.has_cache(), has_cache);
            }
        }
    }

    #[test]
    fn test_only_enabled_populated_hits() {
        assert!(CacheState::EnabledPopulated.will_hit());
        assert!(!CacheState::EnabledEmpty.will_hit());
        assert!(!CacheState::DisabledPopulated.will_hit());
        assert!(!CacheState::DisabledEmpty.will_hit());
    }

    #[test]
    fn test_state_serialization() {
        let status = CacheStatus {
            state: CacheState::DisabledPopulated,
            enabled: false,
            has_cache: true,
            invocations: 3,
            hits: 1,
        };
        let json = status.to_json().unwrap();
        assert!(json.contains("\"state\":\"DISABLED_POPULATED\""));
        assert!(json.contains("\"invocations\":3"));
        assert_eq!(CacheState::DisabledPopulated.to_string(), "DISABLED_POPULATED");
    }
}
