//! Damage events.
//!
//! A `DamageEvent` is one attack in flight. It is created by the host (or
//! queued by a behavior), passed mutably through the attacker's and
//! defender's effects, and finally applied to the defender's health.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// A damage event travelling through the pipeline.
///
/// ## Event Data
///
/// - `attacker`: who deals the damage. `None` for environmental damage.
/// - `defender`: who takes it.
/// - `amount`: damage to apply. Behaviors may change it; whatever is left
///   after the defender's pass is applied, floored at zero.
/// - `values`: named numbers for host-defined data (crit multiplier, ...).
/// - `tags`: string markers for filtering ("fire", "reflected", ...).
///
/// ```
/// use buff_engine::combat::DamageEvent;
/// use buff_engine::core::EntityId;
///
/// let event = DamageEvent::new(Some(EntityId::new(1)), EntityId::new(2), 12)
///     .with_tag("fire")
///     .with_value("crit", 2);
///
/// assert!(event.has_tag("fire"));
/// assert_eq!(event.value("crit", 1), 2);
/// assert_eq!(event.opponent_of(EntityId::new(2)), Some(EntityId::new(1)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// The entity dealing damage.
    pub attacker: Option<EntityId>,

    /// The entity taking damage.
    pub defender: EntityId,

    /// Damage to apply.
    pub amount: i64,

    /// Named values for host-defined data.
    #[serde(default)]
    pub values: FxHashMap<String, i64>,

    /// String markers for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DamageEvent {
    /// Create a damage event.
    pub fn new(attacker: Option<EntityId>, defender: EntityId, amount: i64) -> Self {
        Self {
            attacker,
            defender,
            amount,
            values: FxHashMap::default(),
            tags: Vec::new(),
        }
    }

    /// Set a named value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: i64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get a named value, or a default.
    #[must_use]
    pub fn value(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    /// Check if the event has a specific tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The other party, seen from `entity`.
    ///
    /// The defender's opponent is the attacker (if any); anyone else's
    /// opponent is the defender.
    #[must_use]
    pub fn opponent_of(&self, entity: EntityId) -> Option<EntityId> {
        if entity == self.defender {
            self.attacker
        } else {
            Some(self.defender)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event() {
        let event = DamageEvent::new(Some(EntityId(1)), EntityId(2), 7);

        assert_eq!(event.attacker, Some(EntityId(1)));
        assert_eq!(event.defender, EntityId(2));
        assert_eq!(event.amount, 7);
        assert!(event.values.is_empty());
        assert!(event.tags.is_empty());
    }

    #[test]
    fn test_values_and_tags() {
        let event = DamageEvent::new(None, EntityId(2), 3)
            .with_value("pierce", 4)
            .with_tag("poison");

        assert_eq!(event.value("pierce", 0), 4);
        assert_eq!(event.value("missing", -1), -1);
        assert!(event.has_tag("poison"));
        assert!(!event.has_tag("fire"));
    }

    #[test]
    fn test_opponent_of() {
        let event = DamageEvent::new(Some(EntityId(1)), EntityId(2), 3);
        assert_eq!(event.opponent_of(EntityId(1)), Some(EntityId(2)));
        assert_eq!(event.opponent_of(EntityId(2)), Some(EntityId(1)));

        let environmental = DamageEvent::new(None, EntityId(2), 3);
        assert_eq!(environmental.opponent_of(EntityId(2)), None);
    }

    #[test]
    fn test_serialization() {
        let event = DamageEvent::new(Some(EntityId(1)), EntityId(2), 9).with_tag("fire");
        let json = serde_json::to_string(&event).unwrap();
        let back: DamageEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
