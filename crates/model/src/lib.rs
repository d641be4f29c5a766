//! Context entity domain model.
//!
//! This crate contains the typed attribute model, the entity capability
//! trait, and the listing cursor shared by the broker client and its callers.
//!
//! ## Architectural Layer
//!
//! **Domain.** This crate has no I/O dependencies. The `broker` crate maps
//! these types onto the broker's JSON envelopes and HTTP surface.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`attributes`] | `Attribute`, `Attributes`, type inference and decoding |
//! | [`entity`] | The `Entity` trait and `ContextEntity` |
//! | [`page`] | `Page` cursor and the fixed page size |
//! | [`errors`] | `AttributeError` |

pub mod attributes;
pub mod entity;
pub mod errors;
pub mod page;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use attributes::{
    Attribute, AttributeValue, Attributes, IntoAttribute, FLOAT_TYPE, INT_TYPE, STRING_TYPE,
};
pub use entity::{ContextEntity, Entity};
pub use errors::AttributeError;
pub use page::{Page, PAGE_SIZE};
