//! Data-only effect configuration.
//!
//! Hosts author effects in whatever asset format they use and deserialize
//! them into [`EffectConfig`] records. Behaviors are trait objects and
//! cannot be deserialized, so each hook slot names a behavior registered in
//! a [`BehaviorCatalog`]; [`EffectConfig::build`] resolves the names.
//!
//! ```
//! use buff_engine::core::StatDelta;
//! use buff_engine::effects::{BehaviorCatalog, EffectConfig, Hook, ModifyStats};
//!
//! let mut catalog = BehaviorCatalog::new();
//! catalog.insert("attack_up", ModifyStats::new(StatDelta::new().attack(2)));
//!
//! let mut config = EffectConfig::new(7, "Battle Cry");
//! config.duration = 10.0;
//! config.callbacks.on_create = Some("attack_up".into());
//!
//! let definition = config.build(&catalog).unwrap();
//! assert!(definition.callbacks.get(Hook::Create).is_some());
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::behavior::{EffectBehavior, EffectCallbacks, Hook};
use super::definition::{EffectDefinition, EffectId, IconRef, RefreshPolicy, RemovalPolicy};
use crate::core::ConfigError;

/// Behavior names per hook. `None` leaves the hook unbound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackNames {
    pub on_create: Option<String>,
    pub on_remove: Option<String>,
    pub on_tick: Option<String>,
    pub on_hit: Option<String>,
    pub on_be_hurt: Option<String>,
    pub on_kill: Option<String>,
    pub on_be_killed: Option<String>,
}

impl CallbackNames {
    /// The name bound to `hook`.
    #[must_use]
    pub fn get(&self, hook: Hook) -> Option<&str> {
        let name = match hook {
            Hook::Create => &self.on_create,
            Hook::Remove => &self.on_remove,
            Hook::Tick => &self.on_tick,
            Hook::Hit => &self.on_hit,
            Hook::BeHurt => &self.on_be_hurt,
            Hook::Kill => &self.on_kill,
            Hook::BeKilled => &self.on_be_killed,
        };
        name.as_deref()
    }
}

fn one() -> u32 {
    1
}

/// Serializable form of an [`EffectDefinition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub id: EffectId,
    pub name: String,
    #[serde(default)]
    pub icon: Option<IconRef>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "one")]
    pub max_stack: u32,
    #[serde(default)]
    pub refresh: RefreshPolicy,
    #[serde(default)]
    pub removal: RemovalPolicy,
    #[serde(default)]
    pub forever: bool,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub tick_interval: f32,
    #[serde(default)]
    pub callbacks: CallbackNames,
}

impl EffectConfig {
    /// A config with the same defaults as [`EffectDefinition::new`].
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: EffectId::new(id),
            name: name.into(),
            icon: None,
            priority: 0,
            max_stack: 1,
            refresh: RefreshPolicy::default(),
            removal: RemovalPolicy::default(),
            forever: false,
            duration: 0.0,
            tick_interval: 0.0,
            callbacks: CallbackNames::default(),
        }
    }

    /// Resolve behavior names and validate.
    pub fn build(&self, catalog: &BehaviorCatalog) -> Result<EffectDefinition, ConfigError> {
        let mut callbacks = EffectCallbacks::new();
        for hook in Hook::ALL {
            if let Some(name) = self.callbacks.get(hook) {
                let behavior = catalog.get(name).ok_or_else(|| ConfigError::UnknownBehavior {
                    effect: self.id,
                    behavior: name.to_string(),
                })?;
                callbacks.set(hook, Arc::clone(behavior));
            }
        }

        let definition = EffectDefinition {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon.clone(),
            priority: self.priority,
            max_stack: self.max_stack,
            refresh: self.refresh,
            removal: self.removal,
            forever: self.forever,
            duration: self.duration,
            tick_interval: self.tick_interval,
            callbacks,
        };
        definition.validate()?;
        Ok(definition)
    }
}

/// Named behaviors that configs can refer to.
#[derive(Clone, Debug, Default)]
pub struct BehaviorCatalog {
    behaviors: FxHashMap<String, Arc<dyn EffectBehavior>>,
}

impl BehaviorCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, behavior: impl EffectBehavior + 'static) {
        self.insert_shared(name, Arc::new(behavior));
    }

    /// Register an already shared behavior.
    pub fn insert_shared(&mut self, name: impl Into<String>, behavior: Arc<dyn EffectBehavior>) {
        self.behaviors.insert(name.into(), behavior);
    }

    /// Look up a behavior.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn EffectBehavior>> {
        self.behaviors.get(name)
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Is the catalog empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}
