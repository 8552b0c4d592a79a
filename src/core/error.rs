//! Error types.
//!
//! - [`ConfigError`]: a malformed effect definition, detected at load time.
//!   Fatal to that definition only; the registry skips it and keeps going.
//! - [`EffectError`]: a container or pipeline operation the caller asked for
//!   could not be carried out. No state changes when one is returned.
//! - [`BehaviorError`]: an effect callback failed. Fan-out passes log these
//!   and continue with the next callback; they never reach the caller.

use crate::core::EntityId;
use crate::effects::{EffectId, InstanceId};

/// A malformed effect definition.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `max_stack` must be at least 1.
    #[error("{effect}: max_stack must be >= 1 (got {max_stack})")]
    InvalidMaxStack {
        /// Offending definition.
        effect: EffectId,
        /// Configured value.
        max_stack: u32,
    },

    /// `duration` must be finite and non-negative unless the effect is forever.
    #[error("{effect}: duration must be a finite value >= 0 (got {duration})")]
    InvalidDuration {
        /// Offending definition.
        effect: EffectId,
        /// Configured value.
        duration: f32,
    },

    /// `tick_interval` must be finite and non-negative.
    #[error("{effect}: tick_interval must be a finite value >= 0 (got {tick_interval})")]
    InvalidTickInterval {
        /// Offending definition.
        effect: EffectId,
        /// Configured value.
        tick_interval: f32,
    },

    /// Another definition already uses this ID.
    #[error("{effect} is already registered")]
    DuplicateId {
        /// The contested ID.
        effect: EffectId,
    },

    /// A callback slot names a behavior the catalog does not provide.
    #[error("{effect}: unknown behavior '{behavior}'")]
    UnknownBehavior {
        /// Offending definition.
        effect: EffectId,
        /// The unresolved behavior name.
        behavior: String,
    },
}

/// Errors reported to callers of container and pipeline operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EffectError {
    /// No definition with this ID was loaded.
    #[error("unknown effect definition {0}")]
    UnknownDefinition(EffectId),

    /// The entity does not exist or lacks a capability the operation needs.
    #[error("{entity} is not a valid target: {reason}")]
    InvalidTarget {
        /// The entity the operation named.
        entity: EntityId,
        /// What was missing.
        reason: &'static str,
    },

    /// The instance is not (or no longer) in the entity's container.
    #[error("{instance} is not active on {entity}")]
    UnknownInstance {
        /// Container owner.
        entity: EntityId,
        /// The stale instance handle.
        instance: InstanceId,
    },

    /// The container has handed out every instance handle it can.
    #[error("{entity} has run out of effect instance handles")]
    InstanceIdsExhausted {
        /// Container owner.
        entity: EntityId,
    },

    /// A definition was rejected while registering or applying it.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EffectError {
    pub(crate) const NO_ENTITY: &'static str = "entity does not exist";
    pub(crate) const NO_TARGET: &'static str = "entity has no target capability";
    pub(crate) const NO_CONTAINER: &'static str = "entity has no effect container";

    pub(crate) fn invalid_target(entity: EntityId, reason: &'static str) -> Self {
        Self::InvalidTarget { entity, reason }
    }
}

/// A failed effect callback.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BehaviorError {
    message: String,
}

impl BehaviorError {
    /// Create a behavior error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidMaxStack {
            effect: EffectId::new(4),
            max_stack: 0,
        };
        assert_eq!(err.to_string(), "Effect(4): max_stack must be >= 1 (got 0)");

        let err = ConfigError::UnknownBehavior {
            effect: EffectId::new(1),
            behavior: "heal".into(),
        };
        assert_eq!(err.to_string(), "Effect(1): unknown behavior 'heal'");
    }

    #[test]
    fn test_config_error_converts() {
        let err: EffectError = ConfigError::DuplicateId {
            effect: EffectId::new(2),
        }
        .into();
        assert_eq!(err.to_string(), "Effect(2) is already registered");
    }

    #[test]
    fn test_invalid_target_message() {
        let err = EffectError::invalid_target(EntityId(9), EffectError::NO_TARGET);
        assert_eq!(
            err.to_string(),
            "Entity(9) is not a valid target: entity has no target capability"
        );
    }

    #[test]
    fn test_behavior_error() {
        let err = BehaviorError::new("boom");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");
    }
}
