//! Entity table.
//!
//! Each entity optionally carries a [`Target`] (health and stats) and an
//! [`EffectContainer`]. The three spawn flavors cover the usual cases:
//!
//! | Kind     | Target | Container | Can be                          |
//! |----------|--------|-----------|---------------------------------|
//! | full     | yes    | yes       | attacker, defender, effect host |
//! | passive  | yes    | no        | attacker, defender              |
//! | prop     | no     | no        | attacker, effect source         |

use std::fmt;

use rustc_hash::FxHashMap;

use crate::container::EffectContainer;
use crate::core::{EffectError, EntityId, Target};

/// One row of the entity table.
pub struct Entity {
    pub(crate) target: Option<Box<dyn Target>>,
    pub(crate) effects: Option<EffectContainer>,
}

impl Entity {
    /// The entity's target capability, if any.
    #[must_use]
    pub fn target(&self) -> Option<&dyn Target> {
        let target: &dyn Target = self.target.as_deref()?;
        Some(target)
    }

    /// The entity's effect container, if any.
    #[must_use]
    pub fn effects(&self) -> Option<&EffectContainer> {
        self.effects.as_ref()
    }

    /// Target and container together, when the entity has both.
    pub(crate) fn split_mut(&mut self) -> Option<(&mut dyn Target, &mut EffectContainer)> {
        let target: &mut dyn Target = self.target.as_deref_mut()?;
        let effects = self.effects.as_mut()?;
        Some((target, effects))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("health", &self.target.as_ref().map(|t| t.health()))
            .field("effects", &self.effects)
            .finish()
    }
}

/// All entities of a world, keyed by ID.
///
/// IDs are handed out in increasing order and never reused.
#[derive(Debug, Default)]
pub struct Entities {
    entities: FxHashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Entities {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        target: Option<Box<dyn Target>>,
        with_container: bool,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        let effects = with_container.then(|| EffectContainer::new(id));
        self.entities.insert(id, Entity { target, effects });
        id
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Does the entity exist?
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// The entity's target, if it exists and has one.
    #[must_use]
    pub fn target(&self, id: EntityId) -> Option<&dyn Target> {
        self.get(id)?.target()
    }

    /// Mutable access to the entity's target.
    pub fn target_mut(&mut self, id: EntityId) -> Option<&mut dyn Target> {
        let target: &mut dyn Target = self.get_mut(id)?.target.as_deref_mut()?;
        Some(target)
    }

    /// The entity's effect container, if it exists and has one.
    #[must_use]
    pub fn container(&self, id: EntityId) -> Option<&EffectContainer> {
        self.get(id)?.effects()
    }

    /// Target and container of an effect host.
    ///
    /// Fails with [`EffectError::InvalidTarget`] naming what is missing.
    pub(crate) fn parts_mut(
        &mut self,
        id: EntityId,
    ) -> Result<(&mut dyn Target, &mut EffectContainer), EffectError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| EffectError::invalid_target(id, EffectError::NO_ENTITY))?;
        if entity.target.is_none() {
            return Err(EffectError::invalid_target(id, EffectError::NO_TARGET));
        }
        entity
            .split_mut()
            .ok_or_else(|| EffectError::invalid_target(id, EffectError::NO_CONTAINER))
    }

    /// All entity IDs in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
