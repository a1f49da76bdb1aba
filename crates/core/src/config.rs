// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use std::time::Duration;

/// Default quiet period before a burst of toggles is committed.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Default upper bound on how long a continuous burst can defer a commit.
pub const DEFAULT_DEBOUNCE_MAX_WAIT: Duration = Duration::from_secs(1);

/// Default lifetime of a memoized filter result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default number of memoized filter results kept per pipeline.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Tunables for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Quiet period after the last toggle before the pipeline reruns.
    pub debounce_window: Duration,
    /// Maximum time a burst may defer the rerun. `None` disables the cap.
    pub debounce_max_wait: Option<Duration>,
    /// Lifetime of a memoized result.
    pub cache_ttl: Duration,
    /// Number of memoized results retained.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            debounce_max_wait: Some(DEFAULT_DEBOUNCE_MAX_WAIT),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `cache_capacity` is zero
    /// - `cache_ttl` is zero
    /// - `debounce_max_wait` is shorter than `debounce_window`
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cache_capacity == 0 {
            return Err(CoreError::InvalidConfiguration {
                field: "cache_capacity",
                reason: String::from("must be greater than 0"),
            });
        }

        if self.cache_ttl.is_zero() {
            return Err(CoreError::InvalidConfiguration {
                field: "cache_ttl",
                reason: String::from("must be greater than 0"),
            });
        }

        match self.debounce_max_wait {
            Some(max_wait) if max_wait < self.debounce_window => {
                return Err(CoreError::InvalidConfiguration {
                    field: "debounce_max_wait",
                    reason: format!(
                        "{}ms is shorter than the debounce window of {}ms",
                        max_wait.as_millis(),
                        self.debounce_window.as_millis()
                    ),
                });
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
        assert_eq!(
            EngineConfig::default().debounce_window,
            Duration::from_millis(200)
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config: EngineConfig = EngineConfig {
            cache_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfiguration {
                field: "cache_capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config: EngineConfig = EngineConfig {
            cache_ttl: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfiguration {
                field: "cache_ttl",
                ..
            })
        ));
    }

    #[test]
    fn test_max_wait_shorter_than_window_rejected() {
        let config: EngineConfig = EngineConfig {
            debounce_window: Duration::from_millis(500),
            debounce_max_wait: Some(Duration::from_millis(100)),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
