//! # buff-engine
//!
//! A status-effect (buff/debuff) engine for real-time games.
//!
//! Effects are data-driven definitions with a priority, a stack limit,
//! refresh and removal policies, a duration, and an optional tick interval.
//! Their behavior at each lifecycle and combat hook is pluggable.
//!
//! ## Design Principles
//!
//! 1. **Host-Agnostic**: The engine never owns character data. Anything
//!    implementing [`Target`] can carry effects.
//!
//! 2. **Open Behaviors**: What an effect does is an [`EffectBehavior`]
//!    trait object. New behaviors need no engine changes.
//!
//! 3. **No Mid-Pass Mutation**: Behaviors cannot add or remove effects
//!    while a container is being iterated. They queue commands; the
//!    [`World`] applies them once the pass is over.
//!
//! ## Architecture
//!
//! - **Ordered Containers**: Each target's effects are kept sorted by
//!   ascending priority, ties in insertion order. Every fan-out pass
//!   follows that order.
//!
//! - **Persistent Data Structures**: Containers store instances in an
//!   `im::Vector`, so presentation snapshots are O(1) clones.
//!
//! - **Two-Phase Kill Check**: `on_kill` only fires if the defender is
//!   still dead after its own `on_be_killed` behaviors ran.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, targets, stats, errors, engine configuration
//! - `effects`: Definitions, instances, behaviors, commands, registry
//! - `container`: Per-target ordered effect containers
//! - `scheduler`: Tick and duration processing
//! - `combat`: Damage events and the damage pipeline
//! - `world`: Entity table and the host-facing engine

pub mod combat;
pub mod container;
pub mod core;
pub mod effects;
pub mod scheduler;
pub mod world;

// Re-export commonly used types
pub use crate::core::{
    BehaviorError, Character, ConfigError, EffectError, EngineConfig, EntityId, StatDelta,
    StatKey, Stats, Target, TickPolicy,
};

pub use crate::effects::{
    ApplyEffect, BehaviorCatalog, DefinitionRegistry, EffectBehavior, EffectCommand,
    EffectCommands, EffectConfig, EffectContext, EffectDefinition, EffectId, EffectInstance,
    FnBehavior, Hook, IconRef, InstanceId, ModifyStats, Recipient, RefreshPolicy, RemovalPolicy,
};

pub use crate::container::{AddOutcome, EffectContainer, RemoveOutcome};

pub use crate::scheduler::{AdvanceReport, EffectScheduler};

pub use crate::combat::{DamageEvent, DamageOutcome, DamagePipeline};

pub use crate::world::{Entities, Entity, World};
