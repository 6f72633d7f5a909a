use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use stocktake_core::{ItemId, LocationId, Quantity, Round};

/// Composite key of a count: one item, at one location, in one round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountKey {
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub round: Round,
}

impl CountKey {
    pub fn new(item_id: ItemId, location_id: LocationId, round: Round) -> Self {
        Self {
            item_id,
            location_id,
            round,
        }
    }
}

/// A recorded quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub round: Round,
    pub quantity: Quantity,
}

impl Count {
    pub fn key(&self) -> CountKey {
        CountKey::new(self.item_id.clone(), self.location_id.clone(), self.round)
    }
}

/// Filter over the count store. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountQuery {
    location_id: Option<LocationId>,
    round: Option<Round>,
    item_ids: Option<HashSet<ItemId>>,
}

impl CountQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn at_location(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn in_round(mut self, round: Round) -> Self {
        self.round = Some(round);
        self
    }

    /// Restrict to counts of the given items. An empty set matches nothing.
    pub fn for_items<'a>(mut self, item_ids: impl IntoIterator<Item = &'a ItemId>) -> Self {
        self.item_ids = Some(item_ids.into_iter().cloned().collect());
        self
    }

    pub fn matches(&self, count: &Count) -> bool {
        self.location_id.as_ref().is_none_or(|l| *l == count.location_id)
            && self.round.is_none_or(|r| r == count.round)
            && self.item_ids.as_ref().is_none_or(|ids| ids.contains(&count.item_id))
    }
}

/// In-memory count store with upsert-by-key semantics.
///
/// Counts keep their insertion order; re-entering a key overwrites the
/// quantity in place.
#[derive(Debug, Clone, Default)]
pub struct CountStore {
    counts: Vec<Count>,
    index: HashMap<CountKey, usize>,
}

impl CountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `quantity` for `key` (last write wins).
    ///
    /// Returns `true` when a new count was appended, `false` when an existing
    /// one was overwritten.
    pub fn upsert(&mut self, key: CountKey, quantity: Quantity) -> bool {
        if let Some(idx) = self.index.get(&key) {
            self.counts[*idx].quantity = quantity;
            return false;
        }

        self.index.insert(key.clone(), self.counts.len());
        self.counts.push(Count {
            item_id: key.item_id,
            location_id: key.location_id,
            round: key.round,
            quantity,
        });
        true
    }

    /// Remove every count. Irreversible; callers confirm first.
    pub fn reset_all(&mut self) {
        tracing::info!(cleared = self.counts.len(), "all counts reset");
        self.counts.clear();
        self.index.clear();
    }

    pub fn get(&self, key: &CountKey) -> Option<&Count> {
        self.index.get(key).map(|idx| &self.counts[*idx])
    }

    pub fn quantity(&self, key: &CountKey) -> Option<Quantity> {
        self.get(key).map(|c| c.quantity)
    }

    /// Lazily filtered view of the store.
    pub fn query<'a>(&'a self, query: &'a CountQuery) -> impl Iterator<Item = &'a Count> + 'a {
        self.counts.iter().filter(move |c| query.matches(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Count> {
        self.counts.iter()
    }

    pub fn as_slice(&self) -> &[Count] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
