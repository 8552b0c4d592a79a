//! Deferred mutations queued by behaviors.
//!
//! A behavior runs while its container is being iterated, so it cannot
//! add or remove effects directly. It queues an [`EffectCommand`] instead.
//! The [`World`](crate::world::World) applies queued commands once the
//! running pass has finished; an effect added from `on_create` therefore
//! shows up in the next pass, never in the current one.

use smallvec::SmallVec;

use super::definition::EffectId;
use crate::combat::DamageEvent;
use crate::core::EntityId;

/// A mutation to apply after the current pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectCommand {
    /// Apply an effect (same rules as `World::add_effect`).
    Add {
        /// Receiving entity.
        target: EntityId,
        /// Effect to apply.
        effect: EffectId,
        /// Credited source.
        source: Option<EntityId>,
    },

    /// Remove one application of an effect, following its removal policy.
    Remove {
        /// Entity carrying the effect.
        target: EntityId,
        /// Effect to remove.
        effect: EffectId,
    },

    /// Submit damage through the pipeline.
    Damage(DamageEvent),
}

/// Queue of deferred commands.
#[derive(Clone, Debug, Default)]
pub struct EffectCommands {
    queue: SmallVec<[EffectCommand; 4]>,
}

impl EffectCommands {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an effect application.
    pub fn add_effect(&mut self, target: EntityId, effect: EffectId, source: Option<EntityId>) {
        self.queue.push(EffectCommand::Add {
            target,
            effect,
            source,
        });
    }

    /// Queue an effect removal.
    pub fn remove_effect(&mut self, target: EntityId, effect: EffectId) {
        self.queue.push(EffectCommand::Remove { target, effect });
    }

    /// Queue follow-up damage.
    pub fn damage(&mut self, event: DamageEvent) {
        self.queue.push(EffectCommand::Damage(event));
    }

    /// Queue any command.
    pub fn push(&mut self, command: EffectCommand) {
        self.queue.push(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Is the queue empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued commands, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EffectCommand> {
        self.queue.iter()
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = EffectCommand> + '_ {
        self.queue.drain(..)
    }
}
