//! Effect definition registry.
//!
//! The `DefinitionRegistry` is the engine's configuration source: every
//! definition the game can apply, keyed by `EffectId`. It is loaded once at
//! startup and shared read-only (behind an `Arc`) by every world.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::config::{BehaviorCatalog, EffectConfig};
use super::definition::{EffectDefinition, EffectId};
use crate::core::ConfigError;

/// Registry of effect definitions.
///
/// ## Example
///
/// ```
/// use buff_engine::effects::{DefinitionRegistry, EffectDefinition, EffectId};
///
/// let mut registry = DefinitionRegistry::new();
/// registry
///     .register(EffectDefinition::new(EffectId::new(1), "Shield").with_duration(3.0))
///     .unwrap();
///
/// let found = registry.get(EffectId::new(1)).unwrap();
/// assert_eq!(found.name, "Shield");
/// ```
#[derive(Clone, Debug, Default)]
pub struct DefinitionRegistry {
    definitions: FxHashMap<EffectId, Arc<EffectDefinition>>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register one definition.
    ///
    /// A rejected definition leaves the registry unchanged.
    pub fn register(&mut self, definition: EffectDefinition) -> Result<(), ConfigError> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(ConfigError::DuplicateId {
                effect: definition.id,
            });
        }
        self.definitions.insert(definition.id, Arc::new(definition));
        Ok(())
    }

    /// Build a registry from definitions, skipping bad ones.
    ///
    /// Every rejected definition is logged and returned; the rest load.
    pub fn load(
        definitions: impl IntoIterator<Item = EffectDefinition>,
    ) -> (Self, Vec<ConfigError>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();
        for definition in definitions {
            let name = definition.name.clone();
            if let Err(error) = registry.register(definition) {
                tracing::warn!(%name, %error, "skipping effect definition");
                errors.push(error);
            }
        }
        tracing::debug!(
            loaded = registry.len(),
            rejected = errors.len(),
            "effect definitions loaded"
        );
        (registry, errors)
    }

    /// Build a registry from config records, resolving behaviors through
    /// `catalog`. Bad records are skipped as in [`load`](Self::load).
    pub fn load_configs<'a>(
        configs: impl IntoIterator<Item = &'a EffectConfig>,
        catalog: &BehaviorCatalog,
    ) -> (Self, Vec<ConfigError>) {
        let mut built = Vec::new();
        let mut errors = Vec::new();
        for config in configs {
            match config.build(catalog) {
                Ok(definition) => built.push(definition),
                Err(error) => {
                    tracing::warn!(name = %config.name, %error, "skipping effect definition");
                    errors.push(error);
                }
            }
        }
        let (registry, mut rejected) = Self::load(built);
        errors.append(&mut rejected);
        (registry, errors)
    }

    /// Get a definition by ID.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&Arc<EffectDefinition>> {
        self.definitions.get(&id)
    }

    /// Check if an ID is registered.
    #[must_use]
    pub fn contains(&self, id: EffectId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Get the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EffectDefinition>> {
        self.definitions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = DefinitionRegistry::new();
        registry
            .register(EffectDefinition::new(EffectId::new(1), "Burn").with_duration(4.0))
            .unwrap();

        assert!(registry.contains(EffectId::new(1)));
        assert_eq!(registry.get(EffectId::new(1)).unwrap().name, "Burn");
        assert!(registry.get(EffectId::new(99)).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = DefinitionRegistry::new();
        registry
            .register(EffectDefinition::new(EffectId::new(1), "A"))
            .unwrap();

        let err = registry
            .register(EffectDefinition::new(EffectId::new(1), "B"))
            .unwrap_err();

        assert_eq!(err, ConfigError::DuplicateId { effect: EffectId::new(1) });
        assert_eq!(registry.get(EffectId::new(1)).unwrap().name, "A");
    }

    #[test]
    fn test_load_skips_invalid() {
        let (registry, errors) = DefinitionRegistry::load([
            EffectDefinition::new(EffectId::new(1), "Good"),
            EffectDefinition::new(EffectId::new(2), "No stacks").with_max_stack(0),
            EffectDefinition::new(EffectId::new(3), "Negative").with_duration(-2.0),
            EffectDefinition::new(EffectId::new(4), "Also good").with_duration(2.0),
        ]);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(EffectId::new(1)));
        assert!(registry.contains(EffectId::new(4)));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_load_configs() {
        let mut bad = EffectConfig::new(2, "Unknown behavior");
        bad.callbacks.on_tick = Some("missing".into());
        let configs = vec![EffectConfig::new(1, "Plain"), bad];

        let (registry, errors) =
            DefinitionRegistry::load_configs(&configs, &BehaviorCatalog::new());

        assert_eq!(registry.len(), 1);
        assert!(matches!(errors[0], ConfigError::UnknownBehavior { .. }));
    }

    #[test]
    fn test_iteration() {
        let (registry, _) = DefinitionRegistry::load([
            EffectDefinition::new(EffectId::new(1), "A"),
            EffectDefinition::new(EffectId::new(2), "B"),
        ]);

        let mut names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }
}
