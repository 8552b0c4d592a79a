//! Core engine types: entities, targets, stats, errors, configuration.
//!
//! These are the building blocks the effect engine is generic over.
//! Hosts plug their own characters in through the [`Target`] trait.

pub mod config;
pub mod entity;
pub mod error;
pub mod stats;
pub mod target;

pub use config::{EngineConfig, TickPolicy};
pub use entity::EntityId;
pub use error::{BehaviorError, ConfigError, EffectError};
pub use stats::{StatDelta, StatKey, Stats};
pub use target::{Character, Target};
