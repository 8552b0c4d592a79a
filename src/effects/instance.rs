//! Effect instances - runtime effect state.
//!
//! `EffectInstance` is one active effect on one target. It tracks the
//! countdowns and stack count; everything static is read through the
//! shared definition.
//!
//! Instances are created and mutated only by their
//! [`EffectContainer`](crate::container::EffectContainer). Outside the
//! crate they are read-only.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::definition::{EffectDefinition, EffectId, RefreshPolicy};
use crate::core::EntityId;

/// Handle to an instance inside its container.
///
/// Handles are unique per container and never reused, so a handle kept
/// after its instance is gone is detected as stale rather than aliasing a
/// newer instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// An active effect on a target.
///
/// ## Invariant
///
/// `1 <= stack <= definition.max_stack` for every instance held by a
/// container. An instance whose last stack is removed is detached from its
/// container before anything observes it.
#[derive(Clone, Debug)]
pub struct EffectInstance {
    pub(crate) id: InstanceId,
    pub(crate) definition: Arc<EffectDefinition>,
    pub(crate) owner: EntityId,
    pub(crate) source: Option<EntityId>,
    pub(crate) remaining_duration: f32,
    pub(crate) remaining_tick_time: f32,
    pub(crate) stack: u32,
}

impl EffectInstance {
    /// A fresh single-stack instance with the full base duration.
    ///
    /// The tick countdown starts at zero, so a ticking effect fires on the
    /// first step after it is applied.
    pub(crate) fn new(
        id: InstanceId,
        definition: Arc<EffectDefinition>,
        owner: EntityId,
        source: Option<EntityId>,
    ) -> Self {
        Self {
            id,
            remaining_duration: definition.duration,
            definition,
            owner,
            source,
            remaining_tick_time: 0.0,
            stack: 1,
        }
    }

    /// Container handle.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// ID of the definition.
    #[must_use]
    pub fn effect_id(&self) -> EffectId {
        self.definition.id
    }

    /// The shared definition.
    #[must_use]
    pub fn definition(&self) -> &Arc<EffectDefinition> {
        &self.definition
    }

    /// The entity carrying this effect.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// The entity that applied this effect, if any.
    #[must_use]
    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    /// Seconds until expiry. Meaningless for forever effects.
    #[must_use]
    pub fn remaining_duration(&self) -> f32 {
        self.remaining_duration
    }

    /// Seconds until the next tick.
    #[must_use]
    pub fn remaining_tick_time(&self) -> f32 {
        self.remaining_tick_time
    }

    /// Current stack count.
    #[must_use]
    pub fn stack(&self) -> u32 {
        self.stack
    }

    /// Ordering key, from the definition.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.definition.priority
    }

    /// Is another stack allowed?
    #[must_use]
    pub fn can_stack(&self) -> bool {
        self.stack < self.definition.max_stack
    }

    /// Add a stack and apply the refresh policy.
    ///
    /// Callers check [`can_stack`](Self::can_stack) first.
    pub(crate) fn stack_up(&mut self) {
        debug_assert!(self.can_stack());
        self.stack += 1;
        match self.definition.refresh {
            RefreshPolicy::Keep => {}
            RefreshPolicy::Add => self.remaining_duration += self.definition.duration,
            RefreshPolicy::Replace => self.remaining_duration = self.definition.duration,
        }
    }

    /// Restart the duration countdown.
    pub(crate) fn reset_duration(&mut self) {
        self.remaining_duration = self.definition.duration;
    }
}

impl fmt::Display for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' on {}",
            self.definition.id, self.definition.name, self.owner
        )?;
        if let Some(source) = self.source {
            write!(f, " from {}", source)?;
        }
        write!(f, ": stack {}/{}", self.stack, self.definition.max_stack)?;
        if self.definition.forever {
            write!(f, ", forever")
        } else {
            write!(
                f,
                ", {:.2}s of {:.2}s left",
                self.remaining_duration, self.definition.duration
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(refresh: RefreshPolicy) -> Arc<EffectDefinition> {
        Arc::new(
            EffectDefinition::new(EffectId::new(1), "Haste")
                .with_max_stack(3)
                .with_refresh(refresh)
                .with_duration(5.0),
        )
    }

    fn fresh(refresh: RefreshPolicy) -> EffectInstance {
        EffectInstance::new(InstanceId::new(0), definition(refresh), EntityId(1), None)
    }

    #[test]
    fn test_new_instance() {
        let instance = EffectInstance::new(
            InstanceId::new(4),
            definition(RefreshPolicy::Keep),
            EntityId(1),
            Some(EntityId(2)),
        );

        assert_eq!(instance.id(), InstanceId::new(4));
        assert_eq!(instance.effect_id(), EffectId::new(1));
        assert_eq!(instance.owner(), EntityId(1));
        assert_eq!(instance.source(), Some(EntityId(2)));
        assert_eq!(instance.stack(), 1);
        assert_eq!(instance.remaining_duration(), 5.0);
        assert_eq!(instance.remaining_tick_time(), 0.0);
    }

    #[test]
    fn test_stack_up_refresh_policies() {
        let mut keep = fresh(RefreshPolicy::Keep);
        keep.remaining_duration = 2.0;
        keep.stack_up();
        assert_eq!(keep.stack(), 2);
        assert_eq!(keep.remaining_duration(), 2.0);

        let mut add = fresh(RefreshPolicy::Add);
        add.remaining_duration = 2.0;
        add.stack_up();
        assert_eq!(add.remaining_duration(), 7.0);

        let mut replace = fresh(RefreshPolicy::Replace);
        replace.remaining_duration = 2.0;
        replace.stack_up();
        assert_eq!(replace.remaining_duration(), 5.0);
    }

    #[test]
    fn test_can_stack_respects_max() {
        let mut instance = fresh(RefreshPolicy::Keep);
        instance.stack_up();
        assert!(instance.can_stack());
        instance.stack_up();
        assert!(!instance.can_stack());
    }

    #[test]
    fn test_display() {
        let instance = EffectInstance::new(
            InstanceId::new(0),
            definition(RefreshPolicy::Keep),
            EntityId(1),
            Some(EntityId(2)),
        );
        assert_eq!(
            instance.to_string(),
            "Effect(1) 'Haste' on Entity(1) from Entity(2): stack 1/3, 5.00s of 5.00s left"
        );
    }
}
