//! Effect system: definitions, instances, behaviors, and configuration.
//!
//! ## Key Types
//!
//! - [`EffectDefinition`]: Static effect data (priority, stacking, timing)
//! - [`EffectInstance`]: One active effect on one target
//! - [`EffectBehavior`]: What an effect does at each [`Hook`]
//! - [`EffectCommands`]: Mutations deferred until the current pass ends
//! - [`DefinitionRegistry`]: Definition lookup, loaded at startup
//! - [`EffectConfig`] / [`BehaviorCatalog`]: Data-driven definitions

pub mod behavior;
pub mod commands;
pub mod config;
pub mod definition;
pub mod instance;
pub mod registry;

pub use behavior::{
    ApplyEffect, EffectBehavior, EffectCallbacks, EffectContext, FnBehavior, Hook, ModifyStats,
    Recipient,
};
pub(crate) use behavior::invoke;
pub use commands::{EffectCommand, EffectCommands};
pub use config::{BehaviorCatalog, CallbackNames, EffectConfig};
pub use definition::{EffectDefinition, EffectId, IconRef, RefreshPolicy, RemovalPolicy};
pub use instance::{EffectInstance, InstanceId};
pub use registry::DefinitionRegistry;
