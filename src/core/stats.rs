//! Stat records for targets.
//!
//! A target exposes a mutable `Stats` record that effect behaviors adjust.
//! Attack and speed are built in; hosts can hang any other integer stat
//! off a [`StatKey`] (armor, crit chance, ...). Health is not part of the
//! record: it goes through [`Target::set_health`](super::Target::set_health)
//! so the target's clamp always applies.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Key for a host-defined stat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatKey(pub String);

impl StatKey {
    /// Create a new stat key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl From<&str> for StatKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StatKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Mutable stat record of a target.
///
/// ```
/// use buff_engine::core::Stats;
///
/// let mut stats = Stats::new(10, 5);
/// stats.modify("armor", 3);
///
/// assert_eq!(stats.attack, 10);
/// assert_eq!(stats.get("armor"), 3);
/// assert_eq!(stats.get("missing"), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Attack power.
    pub attack: i64,

    /// Movement speed.
    pub speed: i64,

    /// Host-defined stats.
    #[serde(default)]
    pub custom: FxHashMap<StatKey, i64>,
}

impl Stats {
    /// Create a record with the built-in stats set.
    #[must_use]
    pub fn new(attack: i64, speed: i64) -> Self {
        Self {
            attack,
            speed,
            custom: FxHashMap::default(),
        }
    }

    /// Get a custom stat, 0 if never set.
    #[must_use]
    pub fn get(&self, key: &str) -> i64 {
        self.custom.get(&StatKey::new(key)).copied().unwrap_or(0)
    }

    /// Set a custom stat.
    pub fn set(&mut self, key: impl Into<StatKey>, value: i64) {
        self.custom.insert(key.into(), value);
    }

    /// Add `delta` to a custom stat.
    pub fn modify(&mut self, key: impl Into<StatKey>, delta: i64) {
        *self.custom.entry(key.into()).or_insert(0) += delta;
    }
}

/// Fixed stat changes applied by one behavior invocation.
///
/// `health` is applied through the target's health setter; everything
/// else is added to the [`Stats`] record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatDelta {
    /// Health change.
    pub health: i64,
    /// Attack change.
    pub attack: i64,
    /// Speed change.
    pub speed: i64,
    /// Custom stat changes, applied in order.
    pub custom: Vec<(StatKey, i64)>,
}

impl StatDelta {
    /// Create an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health change.
    #[must_use]
    pub fn health(mut self, delta: i64) -> Self {
        self.health = delta;
        self
    }

    /// Set the attack change.
    #[must_use]
    pub fn attack(mut self, delta: i64) -> Self {
        self.attack = delta;
        self
    }

    /// Set the speed change.
    #[must_use]
    pub fn speed(mut self, delta: i64) -> Self {
        self.speed = delta;
        self
    }

    /// Add a custom stat change.
    #[must_use]
    pub fn custom(mut self, key: impl Into<StatKey>, delta: i64) -> Self {
        self.custom.push((key.into(), delta));
        self
    }

    /// The opposite change, for an `on_remove` slot paired with `on_create`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            health: -self.health,
            attack: -self.attack,
            speed: -self.speed,
            custom: self.custom.iter().map(|(k, v)| (k.clone(), -v)).collect(),
        }
    }

    /// Add every non-health component to a stat record.
    pub fn apply_to(&self, stats: &mut Stats) {
        stats.attack += self.attack;
        stats.speed += self.speed;
        for (key, delta) in &self.custom {
            stats.modify(key.clone(), *delta);
        }
    }
}
