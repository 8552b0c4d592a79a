//! Effect definitions - static effect data.
//!
//! `EffectDefinition` holds the immutable configuration of an effect type.
//! "Poison" has a priority, a stack limit, a duration and a tick interval,
//! plus the behaviors that run at each lifecycle point - these are part of
//! the definition.
//!
//! Per-target runtime data (remaining time, current stack) lives in
//! [`EffectInstance`](super::EffectInstance).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::behavior::{EffectBehavior, EffectCallbacks, Hook};
use crate::core::ConfigError;

/// Unique identifier for an effect definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

impl EffectId {
    /// Create a new effect ID.
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

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Opaque reference to an icon asset. The engine never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef(pub String);

impl IconRef {
    /// Create an icon reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

/// What re-applying an already active effect does to its remaining duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshPolicy {
    /// Leave the remaining duration untouched.
    #[default]
    Keep,
    /// Extend the remaining duration by the base duration.
    Add,
    /// Reset the remaining duration to the base duration.
    Replace,
}

/// What removal or expiry does to a stacked effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Remove the whole instance, firing `on_remove` once.
    #[default]
    Clear,
    /// Remove one stack, firing `on_remove` once per stack. The instance
    /// goes away at zero stacks; otherwise its duration restarts.
    Reduce,
}

/// Static effect definition.
///
/// ## Ordering
///
/// Containers keep instances sorted by ascending `priority`: lower values
/// come first. Equal priorities keep insertion order.
///
/// ## Example
///
/// ```
/// use buff_engine::core::StatDelta;
/// use buff_engine::effects::{EffectDefinition, EffectId, Hook, ModifyStats, RefreshPolicy};
///
/// let rage = EffectDefinition::new(EffectId::new(1), "Rage")
///     .with_priority(2)
///     .with_max_stack(3)
///     .with_refresh(RefreshPolicy::Replace)
///     .with_duration(5.0)
///     .on(Hook::Create, ModifyStats::new(StatDelta::new().attack(2)))
///     .on(Hook::Remove, ModifyStats::new(StatDelta::new().attack(-2)));
///
/// assert!(rage.validate().is_ok());
/// assert!(rage.callbacks.get(Hook::Create).is_some());
/// assert!(rage.callbacks.get(Hook::Tick).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct EffectDefinition {
    /// Unique identifier for this definition.
    pub id: EffectId,

    /// Display name.
    pub name: String,

    /// Icon for presentation layers.
    pub icon: Option<IconRef>,

    /// Container ordering key, ascending.
    pub priority: i32,

    /// Maximum simultaneous stacks on one target (>= 1).
    pub max_stack: u32,

    /// Duration handling on re-application.
    pub refresh: RefreshPolicy,

    /// Stack handling on removal and expiry.
    pub removal: RemovalPolicy,

    /// Never expires. `duration` is ignored when set.
    pub forever: bool,

    /// Base duration in seconds.
    pub duration: f32,

    /// Seconds between `on_tick` calls. 0 disables ticking.
    pub tick_interval: f32,

    /// Behaviors bound to lifecycle and combat hooks.
    pub callbacks: EffectCallbacks,
}

impl EffectDefinition {
    /// Create a definition with defaults: priority 0, a single stack,
    /// `Keep`/`Clear` policies, zero duration, no ticking, no behaviors.
    #[must_use]
    pub fn new(id: EffectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: None,
            priority: 0,
            max_stack: 1,
            refresh: RefreshPolicy::default(),
            removal: RemovalPolicy::default(),
            forever: false,
            duration: 0.0,
            tick_interval: 0.0,
            callbacks: EffectCallbacks::default(),
        }
    }

    /// Set the icon (builder pattern).
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(IconRef::new(icon));
        self
    }

    /// Set the priority (builder pattern). Lower sorts first.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the stack limit (builder pattern).
    #[must_use]
    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    /// Set the refresh policy (builder pattern).
    #[must_use]
    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    /// Set the removal policy (builder pattern).
    #[must_use]
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Set the base duration in seconds (builder pattern).
    #[must_use]
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Mark the effect as never expiring (builder pattern).
    #[must_use]
    pub fn forever(mut self) -> Self {
        self.forever = true;
        self
    }

    /// Set the tick interval in seconds (builder pattern).
    #[must_use]
    pub fn with_tick_interval(mut self, seconds: f32) -> Self {
        self.tick_interval = seconds;
        self
    }

    /// Bind a behavior to a hook (builder pattern).
    #[must_use]
    pub fn on(self, hook: Hook, behavior: impl EffectBehavior + 'static) -> Self {
        self.on_shared(hook, Arc::new(behavior))
    }

    /// Bind an already shared behavior to a hook (builder pattern).
    #[must_use]
    pub fn on_shared(mut self, hook: Hook, behavior: Arc<dyn EffectBehavior>) -> Self {
        self.callbacks.set(hook, behavior);
        self
    }

    /// Does this effect fire `on_tick`?
    #[must_use]
    pub fn ticks(&self) -> bool {
        self.tick_interval > 0.0
    }

    /// Check the definition for authoring errors.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stack < 1 {
            return Err(ConfigError::InvalidMaxStack {
                effect: self.id,
                max_stack: self.max_stack,
            });
        }
        if !self.forever && !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigError::InvalidDuration {
                effect: self.id,
                duration: self.duration,
            });
        }
        if !(self.tick_interval.is_finite() && self.tick_interval >= 0.0) {
            return Err(ConfigError::InvalidTickInterval {
                effect: self.id,
                tick_interval: self.tick_interval,
            });
        }
        Ok(())
    }
}
