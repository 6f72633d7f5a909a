//! Drink catalog: parsing the line-oriented listing into items, and the
//! product/stock model built on top of it.
//!
//! Everything here is deterministic and IO-free; fetching the listing is the
//! application's job.

pub mod item;
pub mod parser;
pub mod rules;

pub use item::{Catalog, Item, Product, Stock};
pub use parser::{parse_catalog, parse_catalog_default};
pub use rules::{CategoryRules, LocationRule, Placement};
