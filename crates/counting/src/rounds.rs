//! Per-round views: one round per location, in rank order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use stocktake_catalog::Catalog;
use stocktake_core::{ItemId, Location, LocationId, Round};

use crate::count::Count;

/// Counts belonging to one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub round: Round,
    pub location_id: LocationId,
    pub counted: Vec<Count>,
}

/// Build one view per location (`locations` must already be in rank order).
///
/// Round `n` belongs to the location at position `n - 1`; its counted subset
/// is every count whose item is stocked at that location, whatever round the
/// count was recorded in.
pub fn compute_round_view<'a>(
    locations: &[Location],
    catalog: &Catalog,
    counts: impl IntoIterator<Item = &'a Count>,
) -> Vec<RoundView> {
    let counts: Vec<&Count> = counts.into_iter().collect();

    locations
        .iter()
        .enumerate()
        .map(|(position, location)| {
            let stocked: HashSet<&ItemId> = catalog.items_at(&location.id).map(|i| &i.id).collect();

            RoundView {
                round: Round::for_position(position),
                location_id: location.id.clone(),
                counted: counts
                    .iter()
                    .filter(|c| stocked.contains(&c.item_id))
                    .map(|c| (*c).clone())
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::{CountKey, CountStore};
    use stocktake_catalog::parse_catalog_default;
    use stocktake_core::{default_locations, Quantity, CONTAINER, COOLED, DRY};

    #[test]
    fn rounds_follow_location_rank() {
        let catalog = Catalog::from_items(parse_catalog_default("SOFT DRINKS\nCola,24\nRED WINE\nMerlot,6"));
        let mut store = CountStore::new();
        for (item, location, round, qty) in [
            ("cola-cooled", COOLED, 1, 10),
            ("merlot", DRY, 2, 3),
            ("cola-container", CONTAINER, 3, 5),
        ] {
            store.upsert(
                CountKey::new(ItemId::new(item), LocationId::new(location), Round::new(round).unwrap()),
                Quantity::new(qty),
            );
        }

        let views = compute_round_view(&default_locations(), &catalog, store.iter());
        assert_eq!(views.len(), 3);

        let summary: Vec<_> = views
            .iter()
            .map(|v| {
                let ids: Vec<_> = v.counted.iter().map(|c| c.item_id.as_str().to_string()).collect();
                (v.round.value(), v.location_id.as_str().to_string(), ids)
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (1, COOLED.to_string(), vec!["cola-cooled".to_string()]),
                (2, DRY.to_string(), vec!["merlot".to_string()]),
                (3, CONTAINER.to_string(), vec!["cola-container".to_string()]),
            ]
        );
    }

    #[test]
    fn empty_catalog_yields_empty_rounds() {
        let views = compute_round_view(&default_locations(), &Catalog::empty(), std::iter::empty());
        assert!(views.iter().all(|v| v.counted.is_empty()));
        assert_eq!(views[2].round.value(), 3);
    }
}
