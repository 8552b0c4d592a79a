//! Entity identification.
//!
//! Every object that can carry effects, deal damage, or be credited as the
//! source of an effect has a unique `EntityId`. IDs are allocated by the
//! [`World`](crate::world::World) in spawn order and are never reused.
//!
//! ## Usage
//!
//! ```
//! use buff_engine::core::EntityId;
//!
//! let knight = EntityId::new(3);
//! assert_eq!(knight.raw(), 3);
//! assert_eq!(knight.to_string(), "Entity(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any entity known to the engine.
///
/// Characters, props (traps, environment hazards), and anything else
/// that participates in effect or damage resolution has an EntityId.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The ID allocated after this one.
    ///
    /// # Panics
    ///
    /// Panics on `u32::MAX`: a world hands out at most that many IDs.
    #[must_use]
    pub(crate) const fn next(self) -> Self {
        match self.0.checked_add(1) {
            Some(next) => Self(next),
            None => panic!("entity IDs exhausted"),
        }
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
