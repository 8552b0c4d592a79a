use crate::core::{EffectError, EntityId};
use crate::effects::{EffectCommands, Hook};
use crate::world::Entities;

use super::event::DamageEvent;

/// What happened to the defender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Health actually lost.
    pub dealt: i64,
    /// The defender died and stayed dead.
    pub killed: bool,
    /// The defender dropped to zero health but an `on_be_killed` behavior
    /// revived it.
    pub saved: bool,
}

/// Runs a damage event through both sides' effects.
///
/// ## Sequence
///
/// 1. `on_hit` for every instance on the attacker.
/// 2. `on_be_hurt` for every instance on the defender.
/// 3. The defender loses `max(amount, 0)` health.
/// 4. If the defender is no longer alive:
///    - `on_be_killed` for every instance on the defender;
///    - liveness is checked again, and only if the defender is still dead,
///      `on_kill` for every instance on the attacker.
///
/// Behaviors see and may change the event in steps 1 and 2; the amount
/// left after step 2 is what gets applied. Sides without an effect
/// container simply skip their passes.
///
/// Commands queued by any hook run after the whole sequence. The check in
/// step 4 sees only health restored directly on the target; a healing
/// effect queued from `on_be_killed` is applied after `on_kill` has fired
/// and the outcome reports a kill.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamagePipeline;

impl DamagePipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve one damage event.
    ///
    /// The defender must exist and have a target; a named attacker must
    /// exist. Otherwise nothing runs and [`EffectError::InvalidTarget`] is
    /// returned.
    pub fn submit(
        &self,
        entities: &mut Entities,
        mut event: DamageEvent,
        commands: &mut EffectCommands,
    ) -> Result<DamageOutcome, EffectError> {
        let defender = event.defender;
        if !entities.contains(defender) {
            return Err(EffectError::invalid_target(defender, EffectError::NO_ENTITY));
        }
        if entities.target(defender).is_none() {
            return Err(EffectError::invalid_target(defender, EffectError::NO_TARGET));
        }
        if let Some(attacker) = event.attacker {
            if !entities.contains(attacker) {
                return Err(EffectError::invalid_target(attacker, EffectError::NO_ENTITY));
            }
        }

        if let Some(attacker) = event.attacker {
            fan_out(entities, attacker, Hook::Hit, &mut event, commands);
        }
        fan_out(entities, defender, Hook::BeHurt, &mut event, commands);

        let target = entities
            .target_mut(defender)
            .ok_or_else(|| EffectError::invalid_target(defender, EffectError::NO_TARGET))?;
        let before = target.health();
        target.set_health(before.saturating_sub(event.amount.max(0)));
        let mut outcome = DamageOutcome {
            dealt: before - target.health(),
            ..DamageOutcome::default()
        };
        if target.is_alive() {
            return Ok(outcome);
        }

        fan_out(entities, defender, Hook::BeKilled, &mut event, commands);

        if entities.target(defender).is_some_and(|t| t.is_alive()) {
            tracing::debug!(entity = %defender, "defender saved by its own effects");
            outcome.saved = true;
            return Ok(outcome);
        }

        outcome.killed = true;
        tracing::debug!(entity = %defender, attacker = ?event.attacker, "defender killed");
        if let Some(attacker) = event.attacker {
            fan_out(entities, attacker, Hook::Kill, &mut event, commands);
        }
        Ok(outcome)
    }
}

/// Fire `hook` over one entity's container, if it has target and container.
fn fan_out(
    entities: &mut Entities,
    entity: EntityId,
    hook: Hook,
    event: &mut DamageEvent,
    commands: &mut EffectCommands,
) {
    let Some((target, container)) = entities.get_mut(entity).and_then(|e| e.split_mut()) else {
        return;
    };
    container.fire(hook, target, Some(event), commands);
}
