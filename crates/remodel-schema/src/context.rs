use crate::{node::Entity, types::EntityKind};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ContextError
///

#[derive(Debug, ThisError)]
pub enum ContextError {
    #[error("descriptor '{0}' is already registered")]
    DuplicateDescriptor(String),
}

///
/// ModelContext
///
/// Run-scoped descriptor registry: three keyed maps with a single writer
/// per key. Superclasses and embeddables are completed before any entity
/// build reads them; there is no ambient or static state.
///

#[derive(Debug, Default)]
pub struct ModelContext {
    superclasses: BTreeMap<String, Entity>,
    embeddables: BTreeMap<String, Entity>,
    entities: Vec<Entity>,
    entity_index: BTreeMap<String, usize>,
}

impl ModelContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a completed descriptor under its qualified name. Each key
    /// is written exactly once; a second write is a hard error.
    pub fn insert(&mut self, entity: Entity) -> Result<(), ContextError> {
        let key = entity.qualified_name.clone();
        if self.contains(&key) {
            return Err(ContextError::DuplicateDescriptor(key));
        }

        match entity.kind {
            EntityKind::Superclass => {
                self.superclasses.insert(key, entity);
            }
            EntityKind::Embeddable => {
                self.embeddables.insert(key, entity);
            }
            EntityKind::Entity => {
                self.entity_index.insert(key, self.entities.len());
                self.entities.push(entity);
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.superclasses.contains_key(qualified_name)
            || self.embeddables.contains_key(qualified_name)
            || self.entity_index.contains_key(qualified_name)
    }

    #[must_use]
    pub fn superclass(&self, qualified_name: &str) -> Option<&Entity> {
        self.superclasses.get(qualified_name)
    }

    #[must_use]
    pub fn embeddable(&self, qualified_name: &str) -> Option<&Entity> {
        self.embeddables.get(qualified_name)
    }

    #[must_use]
    pub fn entity(&self, qualified_name: &str) -> Option<&Entity> {
        self.entity_index
            .get(qualified_name)
            .map(|&i| &self.entities[i])
    }

    /// Ancestor lookup used during merge: superclasses first, then
    /// embeddables.
    #[must_use]
    pub fn ancestor(&self, qualified_name: &str) -> Option<&Entity> {
        self.superclass(qualified_name)
            .or_else(|| self.embeddable(qualified_name))
    }

    /// Entities in registration order (declaration order for one run).
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn superclasses(&self) -> impl Iterator<Item = &Entity> {
        self.superclasses.values()
    }

    #[must_use]
    pub fn embeddables(&self) -> impl Iterator<Item = &Entity> {
        self.embeddables.values()
    }
}
