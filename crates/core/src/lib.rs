//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error model, the `Entity` trait, user-assigned identifiers and
//! the form-field normalization rules every resource applies.

pub mod entity;
pub mod error;
pub mod id;
pub mod text;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{LocationId, MovementId, ProductId};
