//! Engine configuration.
//!
//! Hosts configure the engine at startup by providing an `EngineConfig`.
//! Effect content (the definitions themselves) is configured separately
//! through [`EffectConfig`](crate::effects::EffectConfig) records.

use serde::{Deserialize, Serialize};

/// How a ticking effect's countdown is restored after it fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickPolicy {
    /// `remaining = interval` after each tick.
    ///
    /// At most one tick fires per step, however large `dt` is. Leftover
    /// time below zero is discarded, so ticks never drift ahead.
    #[default]
    Reset,

    /// `remaining += interval` after each tick.
    ///
    /// A step larger than the interval fires catch-up ticks until the
    /// countdown is non-negative again, up to
    /// [`EngineConfig::max_ticks_per_step`] per step.
    Accumulate,
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use buff_engine::core::{EngineConfig, TickPolicy};
///
/// let config = EngineConfig::default()
///     .with_tick_policy(TickPolicy::Accumulate)
///     .with_max_cascade_rounds(4);
///
/// assert_eq!(config.tick_policy, TickPolicy::Accumulate);
/// assert_eq!(config.max_cascade_rounds, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tick countdown policy used by the scheduler.
    pub tick_policy: TickPolicy,

    /// Maximum rounds of deferred commands flushed after one top-level call.
    ///
    /// Each round may queue further commands (an effect whose `on_create`
    /// applies another effect, thorns damage answering thorns damage). Once
    /// this many rounds have run, whatever is still queued is dropped.
    pub max_cascade_rounds: usize,

    /// Maximum `on_tick` calls one instance may fire in a single step.
    ///
    /// Only reachable under [`TickPolicy::Accumulate`] with a step much
    /// larger than the tick interval. Ticks beyond the limit are skipped
    /// with a warning; the countdown still advances past them.
    pub max_ticks_per_step: u32,
}

impl EngineConfig {
    /// Default bound on command cascades.
    pub const DEFAULT_MAX_CASCADE_ROUNDS: usize = 16;

    /// Default bound on catch-up ticks per instance per step.
    pub const DEFAULT_MAX_TICKS_PER_STEP: u32 = 64;

    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick policy.
    #[must_use]
    pub fn with_tick_policy(mut self, policy: TickPolicy) -> Self {
        self.tick_policy = policy;
        self
    }

    /// Set the cascade bound.
    #[must_use]
    pub fn with_max_cascade_rounds(mut self, rounds: usize) -> Self {
        self.max_cascade_rounds = rounds;
        self
    }

    /// Set the per-step tick bound.
    #[must_use]
    pub fn with_max_ticks_per_step(mut self, ticks: u32) -> Self {
        self.max_ticks_per_step = ticks;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_policy: TickPolicy::default(),
            max_cascade_rounds: Self::DEFAULT_MAX_CASCADE_ROUNDS,
            max_ticks_per_step: Self::DEFAULT_MAX_TICKS_PER_STEP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_policy, TickPolicy::Reset);
        assert_eq!(config.max_cascade_rounds, 16);
        assert_eq!(config.max_ticks_per_step, 64);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "tick_policy": "Accumulate" }"#).unwrap();

        assert_eq!(config.tick_policy, TickPolicy::Accumulate);
        assert_eq!(config.max_cascade_rounds, EngineConfig::DEFAULT_MAX_CASCADE_ROUNDS);
        assert_eq!(config.max_ticks_per_step, EngineConfig::DEFAULT_MAX_TICKS_PER_STEP);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::new().with_max_cascade_rounds(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
