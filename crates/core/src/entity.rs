//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products, locations and movements are all identified by a user-assigned
/// key that never changes after creation.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
