use smallvec::SmallVec;

use crate::container::EffectContainer;
use crate::core::{EngineConfig, Target, TickPolicy};
use crate::effects::{invoke, EffectCommands, Hook, InstanceId};

/// What one [`EffectScheduler::advance`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// `on_tick` invocations.
    pub ticks: usize,
    /// Instances whose duration ran out this step.
    pub expired: usize,
}

impl AdvanceReport {
    /// Add another report's counts into this one.
    pub fn merge(&mut self, other: AdvanceReport) {
        self.ticks += other.ticks;
        self.expired += other.expired;
    }
}

/// Advances effect timers.
///
/// ## Algorithm
///
/// For each instance, in container order:
/// 1. If the effect ticks, its tick countdown drops by `dt`. Below zero,
///    the due ticks fire and the countdown is refilled according to the
///    [`TickPolicy`]: one tick under `Reset`, one per elapsed interval under
///    `Accumulate`. Either way at most `max_ticks_per_step` ticks fire per
///    instance per step.
/// 2. Unless the effect is forever, its duration drops by `dt`. Below
///    zero, the instance is marked as expired.
///
/// Expired instances are removed only after every instance has been
/// processed, in container order, each by its own removal policy.
///
/// ```
/// use std::sync::Arc;
/// use buff_engine::container::EffectContainer;
/// use buff_engine::core::{Character, EntityId, Stats, TickPolicy};
/// use buff_engine::effects::{EffectCommands, EffectDefinition, EffectId};
/// use buff_engine::scheduler::EffectScheduler;
///
/// let mut hero = Character::new("Hero", 10, Stats::default());
/// let mut container = EffectContainer::new(EntityId::new(1));
/// let mut commands = EffectCommands::new();
/// let haste = Arc::new(EffectDefinition::new(EffectId::new(1), "Haste").with_duration(5.0));
/// container.add(&haste, None, &mut hero, &mut commands).unwrap();
///
/// let scheduler = EffectScheduler::new(TickPolicy::Reset);
/// let report = scheduler.advance(&mut container, &mut hero, 6.0, &mut commands);
///
/// assert_eq!(report.expired, 1);
/// assert!(container.is_empty());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectScheduler {
    policy: TickPolicy,
    max_ticks_per_step: u32,
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new(TickPolicy::default())
    }
}

impl EffectScheduler {
    /// Create a scheduler with the given tick policy and the default
    /// per-step tick bound.
    #[must_use]
    pub fn new(policy: TickPolicy) -> Self {
        Self {
            policy,
            max_ticks_per_step: EngineConfig::DEFAULT_MAX_TICKS_PER_STEP,
        }
    }

    /// Create a scheduler from engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.tick_policy).with_max_ticks_per_step(config.max_ticks_per_step)
    }

    /// Set the per-step tick bound (builder pattern).
    #[must_use]
    pub fn with_max_ticks_per_step(mut self, ticks: u32) -> Self {
        self.max_ticks_per_step = ticks;
        self
    }

    /// The tick policy in use.
    #[must_use]
    pub fn policy(&self) -> TickPolicy {
        self.policy
    }

    /// Maximum `on_tick` calls per instance per step.
    #[must_use]
    pub fn max_ticks_per_step(&self) -> u32 {
        self.max_ticks_per_step
    }

    /// Advance one container by `dt` seconds.
    ///
    /// `dt == 0` does nothing. A negative or non-finite `dt` is logged and
    /// ignored.
    ///
    /// With [`TickPolicy::Accumulate`] a large `dt` fires one tick per
    /// elapsed interval, up to the per-step limit. The work done is bounded
    /// by the container size whatever `dt` is.
    pub fn advance(
        &self,
        container: &mut EffectContainer,
        target: &mut dyn Target,
        dt: f32,
        commands: &mut EffectCommands,
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if dt == 0.0 {
            return report;
        }
        if !(dt.is_finite() && dt > 0.0) {
            tracing::warn!(entity = %container.owner(), dt, "ignoring invalid time step");
            return report;
        }

        let mut expired: SmallVec<[InstanceId; 4]> = SmallVec::new();

        for index in 0..container.len() {
            let instance = container.instance_at_mut(index);
            if instance.definition.ticks() {
                instance.remaining_tick_time -= dt;
                if instance.remaining_tick_time < 0.0 {
                    report.ticks += self.fire_ticks(container, index, &mut *target, commands);
                }
            }

            let instance = container.instance_at_mut(index);
            if !instance.definition.forever {
                instance.remaining_duration -= dt;
                if instance.remaining_duration < 0.0 {
                    expired.push(instance.id);
                }
            }
        }

        report.expired = expired.len();
        for id in expired {
            if let Err(error) = container.remove(id, &mut *target, commands) {
                tracing::warn!(%error, "failed to remove expired effect");
            }
        }

        for instance in container.instances() {
            tracing::trace!(%instance, "active effect");
        }

        report
    }

    /// Fire the ticks that are due for the instance at `index` and refill
    /// its countdown. Returns the number of `on_tick` calls made.
    fn fire_ticks(
        &self,
        container: &mut EffectContainer,
        index: usize,
        target: &mut dyn Target,
        commands: &mut EffectCommands,
    ) -> usize {
        let instance = container.instance_at(index);
        let interval = instance.definition.tick_interval;
        let (due, refilled) = match self.policy {
            TickPolicy::Reset => (1, interval),
            TickPolicy::Accumulate => catch_up(instance.remaining_tick_time, interval),
        };

        let fired = due.min(u64::from(self.max_ticks_per_step));
        if fired < due {
            tracing::warn!(
                effect = %instance.effect_id(),
                entity = %instance.owner(),
                due,
                fired,
                "tick limit reached, skipping ticks"
            );
        }

        for _ in 0..fired {
            invoke(Hook::Tick, container.instance_at(index), &mut *target, None, commands);
        }
        container.instance_at_mut(index).remaining_tick_time = refilled;

        // `fired` is bounded by a u32.
        fired as usize
    }
}

/// Number of ticks due for a countdown that fell to `remaining < 0`, and
/// the countdown left after all of them, in `[0, interval)`.
///
/// Each tick adds `interval`, so `n = ceil(-remaining / interval)` ticks
/// bring the countdown back to zero or above.
fn catch_up(remaining: f32, interval: f32) -> (u64, f32) {
    let remaining = f64::from(remaining);
    let interval = f64::from(interval);

    let mut due = (-remaining / interval).ceil().max(1.0);
    if remaining + due * interval < 0.0 {
        due += 1.0;
    }
    let refilled = (remaining + due * interval).clamp(0.0, interval);

    // Float-to-int casts saturate.
    (due as u64, refilled as f32)
}
