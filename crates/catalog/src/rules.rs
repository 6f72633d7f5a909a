//! Declarative category rules: where a category is stored and how it is counted.

use serde::{Deserialize, Serialize};

use stocktake_core::{ItemId, LocationId, Unit, CONTAINER, COOLED, DRY};

/// Storage rule for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub location: LocationId,
    /// Emit a second stock record in the overflow location.
    pub split_overflow: bool,
}

impl LocationRule {
    pub fn new(location: impl Into<String>, split_overflow: bool) -> Self {
        Self {
            location: LocationId::new(location),
            split_overflow,
        }
    }
}

/// Resolved placement of a category: primary location, optional overflow
/// location and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub location: LocationId,
    pub overflow: Option<LocationId>,
    pub unit: Unit,
}

/// Category name → storage/unit lookup table.
///
/// Category names match exactly (headers are uppercase by construction).
/// Unit markers match as substrings, first match wins. Categories without a
/// rule fall back to `default_rule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    locations: Vec<(String, LocationRule)>,
    unit_markers: Vec<(String, Unit)>,
    default_rule: LocationRule,
    default_unit: Unit,
    overflow_location: LocationId,
    /// Locations whose item ids carry no location suffix.
    bare_id_locations: Vec<LocationId>,
}

impl CategoryRules {
    /// An empty table: every category goes to `default_rule`, counted in
    /// `default_unit`.
    pub fn new(default_rule: LocationRule, default_unit: Unit, overflow_location: impl Into<String>) -> Self {
        Self {
            locations: Vec::new(),
            unit_markers: Vec::new(),
            default_rule,
            default_unit,
            overflow_location: LocationId::new(overflow_location),
            bare_id_locations: Vec::new(),
        }
    }

    pub fn with_location(mut self, category: impl Into<String>, rule: LocationRule) -> Self {
        let category = category.into();
        self.locations.retain(|(c, _)| *c != category);
        self.locations.push((category, rule));
        self
    }

    pub fn with_unit_marker(mut self, marker: impl Into<String>, unit: Unit) -> Self {
        self.unit_markers.push((marker.into(), unit));
        self
    }

    pub fn with_bare_ids(mut self, location: impl Into<String>) -> Self {
        self.bare_id_locations.push(LocationId::new(location));
        self
    }

    pub fn overflow_location(&self) -> &LocationId {
        &self.overflow_location
    }

    pub fn location_rule(&self, category: &str) -> &LocationRule {
        self.locations
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, rule)| rule)
            .unwrap_or(&self.default_rule)
    }

    pub fn unit(&self, category: &str) -> Unit {
        self.unit_markers
            .iter()
            .find(|(marker, _)| category.contains(marker.as_str()))
            .map(|(_, unit)| *unit)
            .unwrap_or(self.default_unit)
    }

    pub fn resolve(&self, category: &str) -> Placement {
        let rule = self.location_rule(category);
        let overflow = (rule.split_overflow && rule.location != self.overflow_location)
            .then(|| self.overflow_location.clone());

        Placement {
            location: rule.location.clone(),
            overflow,
            unit: self.unit(category),
        }
    }

    /// Item id for a slugged name stored at `location`: `<slug>-<location>`,
    /// or the bare slug for locations registered with [`with_bare_ids`].
    ///
    /// [`with_bare_ids`]: CategoryRules::with_bare_ids
    pub fn item_id(&self, slug: &str, location: &LocationId) -> ItemId {
        if self.bare_id_locations.contains(location) {
            ItemId::new(slug)
        } else {
            ItemId::new(format!("{slug}-{location}"))
        }
    }
}

impl Default for CategoryRules {
    /// The venue's layout: everything is cooled with an overflow copy in the
    /// container, except backstage stock (cooled only) and spirits/red wine
    /// (dry storage only). Wine is counted in bottles.
    fn default() -> Self {
        let dry = || LocationRule::new(DRY, false);

        CategoryRules::new(LocationRule::new(COOLED, true), Unit::Pieces, CONTAINER)
            .with_location("BACKSTAGE", LocationRule::new(COOLED, false))
            .with_location("SPIRITS", dry())
            .with_location("RED WINE", dry())
            .with_location("WINES - RED", dry())
            .with_location("SEASONAL WINES - RED", dry())
            .with_unit_marker("WINE", Unit::Bottles)
            .with_bare_ids(DRY)
    }
}
