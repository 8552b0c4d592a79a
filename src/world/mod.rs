//! The world: entities plus the engine that drives their effects.
//!
//! [`World`] is the single entry point most hosts need. It owns an
//! [`Entities`] table, applies effects from a shared
//! [`DefinitionRegistry`](crate::effects::DefinitionRegistry), advances
//! time, and resolves damage.

mod engine;
mod entities;

pub use engine::World;
pub use entities::{Entities, Entity};
