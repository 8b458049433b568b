//! Storage locations (warehouses, shelves, bins).

pub mod location;

pub use location::{CreateLocation, Location, UpdateLocation};
