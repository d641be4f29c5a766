//! The entity capability trait and a generic implementation.
//!
//! The broker client never knows concrete entity types. It reads identity and
//! attributes through [`Entity`] and, when listing, materialises new entities
//! through a caller-supplied factory `FnMut(&str, &str) -> E` taking the
//! entity type and id.

use serde::{Deserialize, Serialize};

use crate::Attributes;

/// A domain object identified by an immutable `(type, id)` pair that owns
/// one [`Attributes`] set.
pub trait Entity {
    /// The entity id, unique within its type.
    fn id(&self) -> &str;

    /// The entity type.
    fn entity_type(&self) -> &str;

    /// The current attribute set.
    fn attributes(&self) -> &Attributes;

    /// Replaces the attribute set wholesale.
    fn set_attributes(&mut self, attributes: Attributes);
}

impl<E: Entity + ?Sized> Entity for Box<E> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn entity_type(&self) -> &str {
        (**self).entity_type()
    }

    fn attributes(&self) -> &Attributes {
        (**self).attributes()
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        (**self).set_attributes(attributes)
    }
}

/// An entity with no domain behaviour of its own.
///
/// [`ContextEntity::new`] has the factory signature, so it can be handed to
/// listing operations directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntity {
    #[serde(rename = "type")]
    entity_type: String,
    id: String,
    attributes: Attributes,
}

impl ContextEntity {
    /// Creates an entity with an empty attribute set.
    pub fn new(entity_type: &str, id: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            attributes: Attributes::new(),
        }
    }

    /// Returns `self` with `attributes` installed.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Mutable access to the attribute set.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

impl Entity for ContextEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl std::fmt::Display for ContextEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.id)
    }
}
