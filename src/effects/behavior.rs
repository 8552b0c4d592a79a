//! Effect behaviors - what an effect actually does.
//!
//! Every lifecycle and combat hook of a definition holds zero or one
//! [`EffectBehavior`]. Behaviors are open: hosts add new ones by
//! implementing the trait, without touching the engine.
//!
//! ## What a behavior may touch
//!
//! A behavior runs with an [`EffectContext`] giving it:
//! - read access to the instance that fired,
//! - mutable access to that instance's target (health, stats),
//! - mutable access to the damage event, for combat hooks,
//! - a command queue for everything else.
//!
//! Containers and other entities are never reachable directly. Adding or
//! removing effects and dealing follow-up damage go through
//! [`EffectCommands`] and run after the current pass finishes.

use std::fmt;
use std::sync::Arc;

use crate::combat::DamageEvent;
use crate::core::{BehaviorError, EntityId, StatDelta, Target};

use super::commands::EffectCommands;
use super::definition::EffectId;
use super::instance::EffectInstance;

/// A point in an effect's life where a behavior can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Effect applied, or a stack added.
    Create,
    /// A stack removed, or the whole effect.
    Remove,
    /// Tick interval elapsed.
    Tick,
    /// The owner dealt damage.
    Hit,
    /// The owner is about to take damage.
    BeHurt,
    /// The owner killed its victim.
    Kill,
    /// The owner's health reached zero.
    BeKilled,
}

impl Hook {
    /// All hooks, in slot order.
    pub const ALL: [Hook; 7] = [
        Hook::Create,
        Hook::Remove,
        Hook::Tick,
        Hook::Hit,
        Hook::BeHurt,
        Hook::Kill,
        Hook::BeKilled,
    ];

    const fn slot(self) -> usize {
        match self {
            Hook::Create => 0,
            Hook::Remove => 1,
            Hook::Tick => 2,
            Hook::Hit => 3,
            Hook::BeHurt => 4,
            Hook::Kill => 5,
            Hook::BeKilled => 6,
        }
    }

    /// Config-facing name of the hook.
    pub const fn as_str(self) -> &'static str {
        match self {
            Hook::Create => "on_create",
            Hook::Remove => "on_remove",
            Hook::Tick => "on_tick",
            Hook::Hit => "on_hit",
            Hook::BeHurt => "on_be_hurt",
            Hook::Kill => "on_kill",
            Hook::BeKilled => "on_be_killed",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a behavior can see and change while it runs.
///
/// Changes made through `target` and `event` land immediately. Anything
/// pushed to `commands` (adding, removing, or applying effects, dealing
/// damage elsewhere) runs only after the top-level call that fired the
/// hook has finished. An `on_be_killed` behavior that must keep its owner
/// alive therefore has to restore health through `target` directly; an
/// effect applied through `commands` arrives after the kill is decided.
pub struct EffectContext<'a> {
    /// Which hook fired.
    pub hook: Hook,

    /// The instance that fired.
    pub instance: &'a EffectInstance,

    /// The instance's target (the container owner).
    pub target: &'a mut dyn Target,

    /// The damage being resolved. `None` outside combat hooks.
    pub event: Option<&'a mut DamageEvent>,

    /// Deferred container and cross-entity mutations.
    pub commands: &'a mut EffectCommands,
}

impl EffectContext<'_> {
    /// The entity carrying the instance.
    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.instance.owner()
    }

    /// Current stack count of the instance.
    #[must_use]
    pub fn stack(&self) -> u32 {
        self.instance.stack()
    }

    /// The other side of the damage event, seen from the owner.
    #[must_use]
    pub fn opponent(&self) -> Option<EntityId> {
        let event = self.event.as_deref()?;
        event.opponent_of(self.owner())
    }
}

/// A pluggable effect behavior.
///
/// ## Implementing
///
/// ```
/// use buff_engine::core::BehaviorError;
/// use buff_engine::effects::{EffectBehavior, EffectContext};
///
/// /// Halves incoming damage.
/// #[derive(Debug)]
/// struct Ward;
///
/// impl EffectBehavior for Ward {
///     fn apply(&self, ctx: &mut EffectContext<'_>) -> Result<(), BehaviorError> {
///         let event = ctx
///             .event
///             .as_deref_mut()
///             .ok_or_else(|| BehaviorError::new("ward needs a damage event"))?;
///         event.amount /= 2;
///         Ok(())
///     }
/// }
/// ```
pub trait EffectBehavior: Send + Sync + fmt::Debug {
    /// Run the behavior.
    ///
    /// An error is logged by the engine and does not stop sibling
    /// behaviors in the same pass.
    fn apply(&self, ctx: &mut EffectContext<'_>) -> Result<(), BehaviorError>;
}

/// Behaviors bound to each hook of a definition.
#[derive(Clone, Default)]
pub struct EffectCallbacks {
    slots: [Option<Arc<dyn EffectBehavior>>; 7],
}

impl EffectCallbacks {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The behavior bound to `hook`.
    #[must_use]
    pub fn get(&self, hook: Hook) -> Option<&Arc<dyn EffectBehavior>> {
        self.slots[hook.slot()].as_ref()
    }

    /// Bind a behavior to `hook`, replacing any previous one.
    pub fn set(&mut self, hook: Hook, behavior: Arc<dyn EffectBehavior>) {
        self.slots[hook.slot()] = Some(behavior);
    }

    /// Unbind `hook`.
    pub fn clear(&mut self, hook: Hook) {
        self.slots[hook.slot()] = None;
    }

    /// Hooks that have a behavior.
    pub fn bound(&self) -> impl Iterator<Item = Hook> + '_ {
        Hook::ALL.into_iter().filter(|hook| self.get(*hook).is_some())
    }
}

impl fmt::Debug for EffectCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for hook in self.bound() {
            map.entry(&hook.as_str(), &self.slots[hook.slot()]);
        }
        map.finish()
    }
}

/// Run the behavior bound to `hook` for one instance, logging failures.
pub(crate) fn invoke(
    hook: Hook,
    instance: &EffectInstance,
    target: &mut dyn Target,
    event: Option<&mut DamageEvent>,
    commands: &mut EffectCommands,
) {
    let Some(behavior) = instance.definition().callbacks.get(hook) else {
        return;
    };
    let mut ctx = EffectContext {
        hook,
        instance,
        target,
        event,
        commands,
    };
    if let Err(error) = behavior.apply(&mut ctx) {
        tracing::warn!(
            effect = %instance.effect_id(),
            entity = %instance.owner(),
            %hook,
            %error,
            "effect callback failed"
        );
    }
}

// ============================================================================
// Built-in behaviors
// ============================================================================

/// Adds fixed deltas to the target's health and stats.
///
/// The engine does not undo the change on removal. Pair an `on_create`
/// `ModifyStats` with an `on_remove` one built from
/// [`StatDelta::reversed`] to get a temporary bonus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyStats {
    /// The change applied per invocation.
    pub delta: StatDelta,
}

impl ModifyStats {
    /// Create from a delta.
    pub fn new(delta: StatDelta) -> Self {
        Self { delta }
    }

    /// The behavior that undoes this one.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.delta.reversed())
    }
}

impl EffectBehavior for ModifyStats {
    fn apply(&self, ctx: &mut EffectContext<'_>) -> Result<(), BehaviorError> {
        self.delta.apply_to(ctx.target.stats_mut());
        if self.delta.health != 0 {
            let health = ctx.target.health();
            ctx.target.set_health(health.saturating_add(self.delta.health));
        }
        Ok(())
    }
}

/// Who an [`ApplyEffect`] behavior applies its effect to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    /// The instance's own target.
    Owner,
    /// The other party of the current damage event.
    Opponent,
    /// Whoever applied the instance.
    Source,
}

/// Queues another effect onto an entity.
///
/// The queued effect is applied after the current pass, credited to the
/// owner of the instance that fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyEffect {
    /// Effect to apply.
    pub effect: EffectId,
    /// Who receives it.
    pub recipient: Recipient,
}

impl ApplyEffect {
    /// Create an apply-effect behavior.
    pub fn new(effect: EffectId, recipient: Recipient) -> Self {
        Self { effect, recipient }
    }
}

impl EffectBehavior for ApplyEffect {
    fn apply(&self, ctx: &mut EffectContext<'_>) -> Result<(), BehaviorError> {
        let recipient = match self.recipient {
            Recipient::Owner => Some(ctx.owner()),
            Recipient::Opponent => ctx.opponent(),
            Recipient::Source => ctx.instance.source(),
        }
        .ok_or_else(|| {
            BehaviorError::new(format!("no {:?} to apply {} to", self.recipient, self.effect))
        })?;

        let owner = ctx.owner();
        ctx.commands.add_effect(recipient, self.effect, Some(owner));
        Ok(())
    }
}

/// Adapts a closure into a behavior.
///
/// ```
/// use buff_engine::effects::FnBehavior;
///
/// let regen = FnBehavior::new("regen", |ctx| {
///     let health = ctx.target.health();
///     ctx.target.set_health(health + 2);
///     Ok(())
/// });
/// assert_eq!(regen.name(), "regen");
/// ```
pub struct FnBehavior<F> {
    name: String,
    f: F,
}

impl<F> FnBehavior<F>
where
    F: Fn(&mut EffectContext<'_>) -> Result<(), BehaviorError> + Send + Sync,
{
    /// Wrap a closure under a debug name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// The debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnBehavior<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnBehavior").field(&self.name).finish()
    }
}

impl<F> EffectBehavior for FnBehavior<F>
where
    F: Fn(&mut EffectContext<'_>) -> Result<(), BehaviorError> + Send + Sync,
{
    fn apply(&self, ctx: &mut EffectContext<'_>) -> Result<(), BehaviorError> {
        (self.f)(ctx)
    }
}
