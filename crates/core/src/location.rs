//! Storage locations and counting units.

use serde::{Deserialize, Serialize};

use crate::id::LocationId;

/// Location id of the cooled storage area (fridges at the bar).
pub const COOLED: &str = "cooled";
/// Location id of the dry storage area (cupboard for spirits and red wine).
pub const DRY: &str = "dry";
/// Location id of the overflow container.
pub const CONTAINER: &str = "container";

/// A physical place where stock is counted.
///
/// Locations are fixed at startup and never change afterwards. `rank` defines
/// the counting order: the location at position `n` (zero-based) in rank order
/// is counted in round `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub rank: u32,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rank: u32) -> Self {
        Self {
            id: LocationId::new(id),
            name: name.into(),
            rank,
        }
    }
}

/// The default venue layout, already in rank order.
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new(COOLED, "Cooler", 1),
        Location::new(DRY, "Cupboard", 2),
        Location::new(CONTAINER, "Container", 3),
    ]
}

/// Sort locations by rank (stable for equal ranks).
pub fn sort_by_rank(locations: &mut [Location]) {
    locations.sort_by_key(|l| l.rank);
}

/// Counting unit of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Pieces,
    Bottles,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Pieces => "pieces",
            Unit::Bottles => "bottles",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}
