//! `stocktake-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog,
//! counting and export crates (no IO).

pub mod error;
pub mod id;
pub mod location;
pub mod machine;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{slugify, ItemId, LocationId};
pub use location::{default_locations, sort_by_rank, Location, Unit, CONTAINER, COOLED, DRY};
pub use machine::StateMachine;
pub use value_object::{Quantity, Round};
