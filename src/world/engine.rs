use std::sync::Arc;

use crate::combat::{DamageEvent, DamageOutcome, DamagePipeline};
use crate::container::{AddOutcome, EffectContainer, RemoveOutcome};
use crate::core::{EffectError, EngineConfig, EntityId, Target};
use crate::effects::{DefinitionRegistry, EffectCommand, EffectCommands, EffectId, InstanceId};
use crate::scheduler::{AdvanceReport, EffectScheduler};

use super::entities::Entities;

/// The host-facing effect engine.
///
/// A `World` owns the entity table and drives the scheduler and the damage
/// pipeline over it. Every public operation runs to completion: commands
/// queued by behaviors during the operation are applied before it returns,
/// round by round, up to [`EngineConfig::max_cascade_rounds`] rounds.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use buff_engine::core::{Character, StatDelta, Stats, Target};
/// use buff_engine::effects::{DefinitionRegistry, EffectDefinition, EffectId, Hook, ModifyStats};
/// use buff_engine::world::World;
///
/// let mut registry = DefinitionRegistry::new();
/// registry
///     .register(
///         EffectDefinition::new(EffectId::new(1), "Burn")
///             .with_duration(3.0)
///             .with_tick_interval(1.0)
///             .on(Hook::Tick, ModifyStats::new(StatDelta::new().health(-2))),
///     )
///     .unwrap();
///
/// let mut world = World::new(Arc::new(registry));
/// let hero = world.spawn(Character::new("Hero", 20, Stats::new(5, 5)));
/// world.add_effect(hero, EffectId::new(1), None).unwrap();
///
/// world.advance(0.5);
/// assert_eq!(world.target(hero).unwrap().health(), 18);
/// ```
pub struct World {
    entities: Entities,
    registry: Arc<DefinitionRegistry>,
    scheduler: EffectScheduler,
    pipeline: DamagePipeline,
    config: EngineConfig,
}

impl World {
    /// Create a world with the default configuration.
    #[must_use]
    pub fn new(registry: Arc<DefinitionRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Create a world with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: Arc<DefinitionRegistry>, config: EngineConfig) -> Self {
        Self {
            entities: Entities::new(),
            registry,
            scheduler: EffectScheduler::from_config(&config),
            pipeline: DamagePipeline::new(),
            config,
        }
    }

    // === Entities ===

    /// Spawn an entity that can carry effects.
    ///
    /// # Panics
    ///
    /// Panics if the world has already handed out `u32::MAX` entity IDs.
    /// IDs are never reused, despawned ones included. The same holds for
    /// [`spawn_passive`](Self::spawn_passive) and
    /// [`spawn_prop`](Self::spawn_prop).
    pub fn spawn(&mut self, target: impl Target + 'static) -> EntityId {
        self.entities.insert(Some(Box::new(target)), true)
    }

    /// Spawn an entity that takes and deals damage but carries no effects.
    pub fn spawn_passive(&mut self, target: impl Target + 'static) -> EntityId {
        self.entities.insert(Some(Box::new(target)), false)
    }

    /// Spawn an entity with no health, usable as an attacker or source.
    pub fn spawn_prop(&mut self) -> EntityId {
        self.entities.insert(None, false)
    }

    /// Remove an entity. Its effects are dropped without `on_remove`.
    ///
    /// Returns `false` if the entity did not exist.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let removed = self.entities.remove(entity).is_some();
        if removed {
            tracing::debug!(%entity, "entity despawned");
        }
        removed
    }

    /// The entity table.
    #[must_use]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// An entity's effect container.
    #[must_use]
    pub fn container(&self, entity: EntityId) -> Option<&EffectContainer> {
        self.entities.container(entity)
    }

    /// An entity's target.
    #[must_use]
    pub fn target(&self, entity: EntityId) -> Option<&dyn Target> {
        self.entities.target(entity)
    }

    /// Mutable access to an entity's target.
    pub fn target_mut(&mut self, entity: EntityId) -> Option<&mut dyn Target> {
        self.entities.target_mut(entity)
    }

    /// The definition registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<DefinitionRegistry> {
        &self.registry
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Effects ===

    /// Apply one application of `effect` to `target`.
    ///
    /// # Errors
    ///
    /// - [`EffectError::UnknownDefinition`] if `effect` is not registered.
    /// - [`EffectError::InvalidTarget`] if `target` cannot carry effects.
    ///
    /// Nothing changes when an error is returned.
    pub fn add_effect(
        &mut self,
        target: EntityId,
        effect: EffectId,
        source: Option<EntityId>,
    ) -> Result<AddOutcome, EffectError> {
        let mut commands = EffectCommands::new();
        let outcome = self.apply_add(target, effect, source, &mut commands)?;
        self.flush(commands);
        Ok(outcome)
    }

    /// Remove one application of an instance.
    ///
    /// # Errors
    ///
    /// - [`EffectError::InvalidTarget`] if `target` cannot carry effects.
    /// - [`EffectError::UnknownInstance`] if the instance is not active.
    pub fn remove_effect(
        &mut self,
        target: EntityId,
        instance: InstanceId,
    ) -> Result<RemoveOutcome, EffectError> {
        let mut commands = EffectCommands::new();
        let (host, container) = self.entities.parts_mut(target)?;
        let outcome = container.remove(instance, host, &mut commands)?;
        self.flush(commands);
        Ok(outcome)
    }

    /// Remove one application of `effect`, if active.
    ///
    /// Returns `Ok(None)` when the effect is not active on `target`.
    pub fn remove_effect_by_id(
        &mut self,
        target: EntityId,
        effect: EffectId,
    ) -> Result<Option<RemoveOutcome>, EffectError> {
        let mut commands = EffectCommands::new();
        let outcome = self.apply_remove(target, effect, &mut commands)?;
        self.flush(commands);
        Ok(outcome)
    }

    // === Time ===

    /// Advance every effect container by `dt` seconds, in ascending
    /// entity order.
    pub fn advance(&mut self, dt: f32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let mut commands = EffectCommands::new();
        for id in self.entities.ids() {
            let Some((target, container)) =
                self.entities.get_mut(id).and_then(|e| e.split_mut())
            else {
                continue;
            };
            report.merge(self.scheduler.advance(container, target, dt, &mut commands));
        }
        self.flush(commands);
        report
    }

    // === Combat ===

    /// Deal `amount` damage from `attacker` to `defender`.
    pub fn submit_damage(
        &mut self,
        attacker: Option<EntityId>,
        defender: EntityId,
        amount: i64,
    ) -> Result<DamageOutcome, EffectError> {
        self.submit_event(DamageEvent::new(attacker, defender, amount))
    }

    /// Resolve a prepared damage event.
    ///
    /// # Errors
    ///
    /// [`EffectError::InvalidTarget`] if the defender is missing or has no
    /// target, or the attacker is missing.
    pub fn submit_event(&mut self, event: DamageEvent) -> Result<DamageOutcome, EffectError> {
        let mut commands = EffectCommands::new();
        let outcome = self.pipeline.submit(&mut self.entities, event, &mut commands)?;
        self.flush(commands);
        Ok(outcome)
    }

    // === Internals ===

    fn apply_add(
        &mut self,
        target: EntityId,
        effect: EffectId,
        source: Option<EntityId>,
        commands: &mut EffectCommands,
    ) -> Result<AddOutcome, EffectError> {
        let definition = self
            .registry
            .get(effect)
            .cloned()
            .ok_or(EffectError::UnknownDefinition(effect))?;
        let (host, container) = self.entities.parts_mut(target)?;
        container.add(&definition, source, host, commands)
    }

    fn apply_remove(
        &mut self,
        target: EntityId,
        effect: EffectId,
        commands: &mut EffectCommands,
    ) -> Result<Option<RemoveOutcome>, EffectError> {
        let (host, container) = self.entities.parts_mut(target)?;
        Ok(container.remove_effect(effect, host, commands))
    }

    fn apply(
        &mut self,
        command: &EffectCommand,
        next: &mut EffectCommands,
    ) -> Result<(), EffectError> {
        match command {
            EffectCommand::Add {
                target,
                effect,
                source,
            } => self.apply_add(*target, *effect, *source, next).map(|_| ()),
            EffectCommand::Remove { target, effect } => {
                self.apply_remove(*target, *effect, next).map(|_| ())
            }
            EffectCommand::Damage(event) => self
                .pipeline
                .submit(&mut self.entities, event.clone(), next)
                .map(|_| ()),
        }
    }

    /// Apply queued commands until none are left or the round limit is hit.
    fn flush(&mut self, mut commands: EffectCommands) {
        let mut rounds = 0;
        while !commands.is_empty() {
            if rounds == self.config.max_cascade_rounds {
                tracing::warn!(
                    rounds,
                    dropped = commands.len(),
                    "effect command cascade limit reached"
                );
                return;
            }
            rounds += 1;

            let mut next = EffectCommands::new();
            for command in commands.drain() {
                if let Err(error) = self.apply(&command, &mut next) {
                    tracing::warn!(?command, %error, "deferred effect command failed");
                }
            }
            commands = next;
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities)
            .field("definitions", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Character, StatDelta, Stats, TickPolicy};
    use crate::effects::{
        ApplyEffect, EffectDefinition, FnBehavior, Hook, ModifyStats, Recipient, RefreshPolicy,
        RemovalPolicy,
    };

    const HASTE: EffectId = EffectId(1);
    const POISON: EffectId = EffectId(2);
    const VENOM_BLADE: EffectId = EffectId(3);
    const ECHO: EffectId = EffectId(4);
    const THORNS: EffectId = EffectId(5);

    fn registry() -> Arc<DefinitionRegistry> {
        let (registry, errors) = DefinitionRegistry::load([
            EffectDefinition::new(HASTE, "Haste")
                .with_duration(5.0)
                .with_max_stack(3)
                .with_refresh(RefreshPolicy::Add)
                .with_removal(RemovalPolicy::Reduce)
                .on(Hook::Create, ModifyStats::new(StatDelta::new().speed(2)))
                .on(Hook::Remove, ModifyStats::new(StatDelta::new().speed(-2))),
            EffectDefinition::new(POISON, "Poison")
                .with_duration(3.0)
                .with_tick_interval(1.0)
                .on(Hook::Tick, ModifyStats::new(StatDelta::new().health(-1))),
            EffectDefinition::new(VENOM_BLADE, "Venom Blade")
                .forever()
                .on(Hook::Hit, ApplyEffect::new(POISON, Recipient::Opponent)),
            EffectDefinition::new(ECHO, "Echo")
                .with_max_stack(100)
                .on(Hook::Create, ApplyEffect::new(ECHO, Recipient::Owner)),
            EffectDefinition::new(THORNS, "Thorns").forever().on(
                Hook::BeHurt,
                FnBehavior::new("reflect", |ctx| {
                    let event = ctx.event.as_deref().ok_or_else(|| {
                        crate::core::BehaviorError::new("thorns outside combat")
                    })?;
                    if let Some(attacker) = event.attacker {
                        let reflected = DamageEvent::new(Some(ctx.owner()), attacker, 1);
                        ctx.commands.damage(reflected);
                    }
                    Ok(())
                }),
            ),
        ]);
        assert!(errors.is_empty());
        Arc::new(registry)
    }

    fn character(health: i64) -> Character {
        Character::new("C", health, Stats::new(10, 10))
    }

    #[test]
    fn test_add_and_remove_by_id() {
        let mut world = World::new(registry());
        let hero = world.spawn(character(10));

        for _ in 0..3 {
            world.add_effect(hero, HASTE, None).unwrap();
        }
        assert_eq!(world.target(hero).unwrap().stats().speed, 16);
        assert_eq!(world.container(hero).unwrap().find(HASTE).unwrap().remaining_duration(), 15.0);

        let outcome = world.remove_effect_by_id(hero, HASTE).unwrap();
        assert_eq!(outcome, Some(RemoveOutcome::Reduced { stack: 2 }));
        assert_eq!(world.target(hero).unwrap().stats().speed, 14);

        assert_eq!(world.remove_effect_by_id(hero, POISON).unwrap(), None);
    }

    #[test]
    fn test_add_errors() {
        let mut world = World::new(registry());
        let passive = world.spawn_passive(character(10));
        let prop = world.spawn_prop();
        let hero = world.spawn(character(10));

        assert_eq!(
            world.add_effect(hero, EffectId(77), None),
            Err(EffectError::UnknownDefinition(EffectId(77)))
        );
        assert!(matches!(
            world.add_effect(passive, HASTE, None),
            Err(EffectError::InvalidTarget { .. })
        ));
        assert!(matches!(
            world.add_effect(prop, HASTE, None),
            Err(EffectError::InvalidTarget { .. })
        ));
        assert!(world.container(hero).unwrap().is_empty());
    }

    #[test]
    fn test_remove_by_handle() {
        let mut world = World::new(registry());
        let hero = world.spawn(character(10));
        let id = world.add_effect(hero, POISON, None).unwrap().instance();

        assert_eq!(world.remove_effect(hero, id).unwrap(), RemoveOutcome::Removed);
        assert!(matches!(
            world.remove_effect(hero, id),
            Err(EffectError::UnknownInstance { .. })
        ));
    }

    #[test]
    fn test_on_hit_applies_poison_after_pass() {
        let mut world = World::new(registry());
        let rogue = world.spawn(character(10));
        let dummy = world.spawn(character(10));
        world.add_effect(rogue, VENOM_BLADE, None).unwrap();

        world.submit_damage(Some(rogue), dummy, 2).unwrap();

        let poison = world.container(dummy).unwrap().find(POISON).unwrap();
        assert_eq!(poison.source(), Some(rogue));

        world.advance(0.5);
        assert_eq!(world.target(dummy).unwrap().health(), 7);
    }

    #[test]
    fn test_thorns_reflects_through_commands() {
        let mut world = World::new(registry());
        let attacker = world.spawn(character(10));
        let defender = world.spawn(character(10));
        world.add_effect(defender, THORNS, None).unwrap();

        world.submit_damage(Some(attacker), defender, 3).unwrap();

        assert_eq!(world.target(defender).unwrap().health(), 7);
        assert_eq!(world.target(attacker).unwrap().health(), 9);
    }

    #[test]
    fn test_self_feeding_cascade_is_bounded() {
        let config = EngineConfig::default().with_max_cascade_rounds(5);
        let mut world = World::with_config(registry(), config);
        let hero = world.spawn(character(10));

        world.add_effect(hero, ECHO, None).unwrap();

        // The direct add plus one stack per cascade round.
        assert_eq!(world.container(hero).unwrap().find(ECHO).unwrap().stack(), 6);
    }

    #[test]
    fn test_advance_skips_entities_without_containers() {
        let mut world = World::with_config(
            registry(),
            EngineConfig::default().with_tick_policy(TickPolicy::Accumulate),
        );
        world.spawn_prop();
        world.spawn_passive(character(5));
        let hero = world.spawn(character(10));
        world.add_effect(hero, POISON, None).unwrap();

        let report = world.advance(2.5);

        assert_eq!(report.ticks, 3);
        assert_eq!(world.target(hero).unwrap().health(), 7);
    }

    #[test]
    fn test_despawn() {
        let mut world = World::new(registry());
        let hero = world.spawn(character(10));
        world.add_effect(hero, POISON, None).unwrap();

        assert!(world.despawn(hero));
        assert!(!world.despawn(hero));
        assert!(world.container(hero).is_none());
        assert_eq!(world.advance(1.0), AdvanceReport::default());
    }

    #[test]
    fn test_failed_command_is_dropped() {
        let mut world = World::new(registry());
        let attacker = world.spawn_prop();
        let defender = world.spawn(character(10));
        world.add_effect(defender, THORNS, None).unwrap();

        // The reflected damage targets a prop with no health; it fails and is logged.
        let outcome = world.submit_damage(Some(attacker), defender, 1).unwrap();

        assert_eq!(outcome.dealt, 1);
        assert_eq!(world.target(defender).unwrap().health(), 9);
    }
}
