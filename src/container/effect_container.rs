//! The per-target effect container.

use std::sync::Arc;

use crate::combat::DamageEvent;
use crate::core::{EffectError, EntityId, Target};
use crate::effects::{
    invoke, EffectCommands, EffectDefinition, EffectId, EffectInstance, Hook, IconRef, InstanceId,
    RemovalPolicy,
};

/// Result of [`EffectContainer::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new instance was inserted.
    Created(InstanceId),
    /// An existing instance gained a stack.
    Stacked {
        /// The instance that grew.
        instance: InstanceId,
        /// Its new stack count.
        stack: u32,
    },
    /// The instance was already at `max_stack`; nothing changed.
    AtMaxStack(InstanceId),
}

impl AddOutcome {
    /// The instance the add resolved to.
    #[must_use]
    pub fn instance(self) -> InstanceId {
        match self {
            AddOutcome::Created(id) | AddOutcome::AtMaxStack(id) => id,
            AddOutcome::Stacked { instance, .. } => instance,
        }
    }
}

/// Result of [`EffectContainer::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// One stack was removed; the instance remains.
    Reduced {
        /// Stacks left.
        stack: u32,
    },
    /// The instance is gone.
    Removed,
}

/// Ordered collection of the active effects on one target.
///
/// ## Ordering
///
/// Instances are kept sorted by ascending priority. A new instance goes
/// after every instance of equal priority, so ties keep insertion order.
/// All fan-out passes follow this order.
///
/// ## Uniqueness
///
/// At most one instance per effect ID. Re-adding an active effect stacks
/// onto the existing instance.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use buff_engine::container::{AddOutcome, EffectContainer};
/// use buff_engine::core::{Character, EntityId, Stats};
/// use buff_engine::effects::{EffectCommands, EffectDefinition, EffectId};
///
/// let owner = EntityId::new(1);
/// let mut hero = Character::new("Hero", 30, Stats::default());
/// let mut container = EffectContainer::new(owner);
/// let mut commands = EffectCommands::new();
///
/// let slow = Arc::new(EffectDefinition::new(EffectId::new(2), "Slow").with_priority(2));
/// let stun = Arc::new(EffectDefinition::new(EffectId::new(1), "Stun").with_priority(1));
///
/// container.add(&slow, None, &mut hero, &mut commands).unwrap();
/// container.add(&stun, None, &mut hero, &mut commands).unwrap();
///
/// let order: Vec<_> = container.instances().map(|i| i.effect_id()).collect();
/// assert_eq!(order, vec![EffectId::new(1), EffectId::new(2)]);
/// ```
#[derive(Clone, Debug)]
pub struct EffectContainer {
    owner: EntityId,
    instances: im::Vector<EffectInstance>,
    next_instance: u32,
}

impl EffectContainer {
    /// Create an empty container for `owner`.
    #[must_use]
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            instances: im::Vector::new(),
            next_instance: 0,
        }
    }

    /// The entity this container belongs to.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Apply one application of `definition`.
    ///
    /// - Not active: insert a fresh instance in priority order and fire
    ///   `on_create`.
    /// - Active below `max_stack`: add a stack, apply the refresh policy,
    ///   fire `on_create` again.
    /// - Active at `max_stack`: dropped.
    ///
    /// # Errors
    ///
    /// - [`EffectError::Config`] if `definition` fails validation. Registry
    ///   definitions always pass; this guards hand-built ones.
    /// - [`EffectError::InstanceIdsExhausted`] if every handle has been used.
    ///
    /// Nothing changes when an error is returned.
    pub fn add(
        &mut self,
        definition: &Arc<EffectDefinition>,
        source: Option<EntityId>,
        target: &mut dyn Target,
        commands: &mut EffectCommands,
    ) -> Result<AddOutcome, EffectError> {
        definition.validate()?;

        if let Some(index) = self.index_of_effect(definition.id) {
            let instance = &mut self.instances[index];
            if !instance.can_stack() {
                tracing::debug!(
                    effect = %definition.id,
                    entity = %self.owner,
                    stack = instance.stack(),
                    "effect at max stack, add dropped"
                );
                return Ok(AddOutcome::AtMaxStack(instance.id()));
            }

            instance.stack_up();
            let (id, stack) = (instance.id(), instance.stack());
            tracing::debug!(effect = %definition.id, entity = %self.owner, stack, "effect stacked");

            invoke(Hook::Create, &self.instances[index], target, None, commands);
            return Ok(AddOutcome::Stacked { instance: id, stack });
        }

        let Some(next) = self.next_instance.checked_add(1) else {
            tracing::warn!(
                effect = %definition.id,
                entity = %self.owner,
                "instance handles exhausted"
            );
            return Err(EffectError::InstanceIdsExhausted { entity: self.owner });
        };
        let id = InstanceId::new(self.next_instance);
        self.next_instance = next;

        let instance = EffectInstance::new(id, Arc::clone(definition), self.owner, source);
        let index = self.insertion_point(definition.priority);
        self.instances.insert(index, instance);
        tracing::debug!(effect = %definition.id, entity = %self.owner, %id, "effect created");

        invoke(Hook::Create, &self.instances[index], target, None, commands);
        Ok(AddOutcome::Created(id))
    }

    /// Remove one application of an instance, following its removal policy.
    ///
    /// - `Clear`: the instance is removed and `on_remove` fires once.
    /// - `Reduce`: one stack is removed and `on_remove` fires once. At zero
    ///   stacks the instance is removed; otherwise its duration restarts.
    ///
    /// A removed instance is detached before `on_remove` runs; the callback
    /// sees its final state.
    pub fn remove(
        &mut self,
        instance: InstanceId,
        target: &mut dyn Target,
        commands: &mut EffectCommands,
    ) -> Result<RemoveOutcome, EffectError> {
        let index = self.index_of(instance).ok_or(EffectError::UnknownInstance {
            entity: self.owner,
            instance,
        })?;

        let removal = self.instances[index].definition().removal;
        let outcome = match removal {
            RemovalPolicy::Clear => {
                let detached = self.instances.remove(index);
                invoke(Hook::Remove, &detached, target, None, commands);
                RemoveOutcome::Removed
            }
            RemovalPolicy::Reduce => {
                let current = &mut self.instances[index];
                current.stack -= 1;
                if current.stack == 0 {
                    let detached = self.instances.remove(index);
                    invoke(Hook::Remove, &detached, target, None, commands);
                    RemoveOutcome::Removed
                } else {
                    current.reset_duration();
                    let stack = current.stack;
                    invoke(Hook::Remove, &self.instances[index], target, None, commands);
                    RemoveOutcome::Reduced { stack }
                }
            }
        };

        tracing::debug!(entity = %self.owner, %instance, ?outcome, "effect removed");
        Ok(outcome)
    }

    /// Remove one application of the instance of `effect`, if active.
    pub fn remove_effect(
        &mut self,
        effect: EffectId,
        target: &mut dyn Target,
        commands: &mut EffectCommands,
    ) -> Option<RemoveOutcome> {
        let instance = self.find(effect)?.id();
        self.remove(instance, target, commands).ok()
    }

    /// The instance of `effect`, if active.
    #[must_use]
    pub fn find(&self, effect: EffectId) -> Option<&EffectInstance> {
        self.instances.iter().find(|i| i.effect_id() == effect)
    }

    /// The instance behind a handle, if still active.
    #[must_use]
    pub fn get(&self, instance: InstanceId) -> Option<&EffectInstance> {
        self.instances.iter().find(|i| i.id() == instance)
    }

    /// Is `effect` active?
    #[must_use]
    pub fn contains(&self, effect: EffectId) -> bool {
        self.find(effect).is_some()
    }

    /// Active instances in container order.
    pub fn instances(&self) -> impl Iterator<Item = &EffectInstance> {
        self.instances.iter()
    }

    /// A detached copy of the current instances, in container order.
    ///
    /// Cheap to take and unaffected by later changes to the container.
    #[must_use]
    pub fn snapshot(&self) -> im::Vector<EffectInstance> {
        self.instances.clone()
    }

    /// The first instance in container order.
    #[must_use]
    pub fn front(&self) -> Option<&EffectInstance> {
        self.instances.front()
    }

    /// Icon of the first instance, the one a single-icon display shows.
    #[must_use]
    pub fn display_icon(&self) -> Option<&IconRef> {
        self.front()?.definition().icon.as_ref()
    }

    /// Number of active instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Is the container empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Fire `hook` for every instance, in container order.
    ///
    /// The container is borrowed for the whole pass, so behaviors cannot
    /// change its structure; whatever they queue runs afterwards. Failures
    /// are logged per instance and do not stop the pass.
    pub(crate) fn fire(
        &self,
        hook: Hook,
        target: &mut dyn Target,
        mut event: Option<&mut DamageEvent>,
        commands: &mut EffectCommands,
    ) {
        for instance in self.instances.iter() {
            invoke(hook, instance, &mut *target, event.as_deref_mut(), commands);
        }
    }

    pub(crate) fn instance_at(&self, index: usize) -> &EffectInstance {
        &self.instances[index]
    }

    pub(crate) fn instance_at_mut(&mut self, index: usize) -> &mut EffectInstance {
        &mut self.instances[index]
    }

    fn index_of(&self, instance: InstanceId) -> Option<usize> {
        self.instances.iter().position(|i| i.id() == instance)
    }

    fn index_of_effect(&self, effect: EffectId) -> Option<usize> {
        self.instances.iter().position(|i| i.effect_id() == effect)
    }

    /// First index whose priority is strictly greater than `priority`.
    fn insertion_point(&self, priority: i32) -> usize {
        self.instances
            .iter()
            .position(|i| i.priority() > priority)
            .unwrap_or(self.instances.len())
    }
}
