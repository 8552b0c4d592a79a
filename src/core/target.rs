//! Target capability.
//!
//! The engine never owns character data. Whatever the host uses for its
//! characters implements [`Target`], and the engine reaches health and stats
//! only through it. [`Character`] is a ready-made implementation.

use super::stats::Stats;

/// Something effects can be applied to and damage can be dealt to.
///
/// ## Invariant
///
/// Health never goes below zero. Implementations clamp in
/// [`set_health`](Target::set_health); the damage pipeline relies on it and
/// does not clamp itself.
pub trait Target {
    /// Current health.
    fn health(&self) -> i64;

    /// Set health, clamping at zero.
    fn set_health(&mut self, health: i64);

    /// Is this target alive? Defaults to `health() > 0`.
    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    /// The stat record behaviors read.
    fn stats(&self) -> &Stats;

    /// The stat record behaviors mutate.
    fn stats_mut(&mut self) -> &mut Stats;
}

/// A named character with health and stats.
///
/// ```
/// use buff_engine::core::{Character, Stats, Target};
///
/// let mut goblin = Character::new("Goblin", 10, Stats::new(3, 5));
/// goblin.set_health(-4);
///
/// assert_eq!(goblin.health(), 0);
/// assert!(!goblin.is_alive());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    /// Display name.
    pub name: String,
    health: i64,
    stats: Stats,
}

impl Character {
    /// Create a character. Negative starting health is clamped to zero.
    pub fn new(name: impl Into<String>, health: i64, stats: Stats) -> Self {
        Self {
            name: name.into(),
            health: health.max(0),
            stats,
        }
    }
}

impl Target for Character {
    fn health(&self) -> i64 {
        self.health
    }

    fn set_health(&mut self, health: i64) {
        self.health = health.max(0);
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }
}
