//! Per-product totals and reorder quantities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocktake_catalog::{Catalog, Product};
use stocktake_core::{ItemId, Location, LocationId, Quantity, Unit};

use crate::count::Count;

/// Overview label for products without a category.
pub const OTHER_CATEGORY: &str = "Other";

/// Derived overview row for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedTotal {
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub minimum_stock: Quantity,
    pub total_counted: Quantity,
    /// `minimum_stock - total_counted`, floored at zero.
    pub reorder_quantity: Quantity,
}

impl AggregatedTotal {
    pub fn needs_reorder(&self) -> bool {
        self.reorder_quantity > Quantity::ZERO
    }
}

fn sum_by_item<'a>(counts: impl IntoIterator<Item = &'a Count>) -> HashMap<&'a ItemId, Quantity> {
    let mut sums: HashMap<&ItemId, Quantity> = HashMap::new();
    for count in counts {
        let entry = sums.entry(&count.item_id).or_default();
        *entry = entry.saturating_add(count.quantity);
    }
    sums
}

/// One row per product, in catalog order.
///
/// A product's total is the sum of every count recorded against any of its
/// stock records, across all locations and rounds. Counts for items that are
/// not in the catalog are ignored.
pub fn compute_totals<'a>(catalog: &Catalog, counts: impl IntoIterator<Item = &'a Count>) -> Vec<AggregatedTotal> {
    let sums = sum_by_item(counts);

    catalog
        .products()
        .iter()
        .map(|product| {
            let total_counted: Quantity = product
                .item_ids()
                .filter_map(|id| sums.get(id).copied())
                .sum();

            AggregatedTotal {
                name: product.name.clone(),
                category: product.category.clone(),
                unit: product.unit,
                minimum_stock: product.minimum_stock,
                total_counted,
                reorder_quantity: product.minimum_stock.shortfall_from(total_counted),
            }
        })
        .collect()
}

/// Totals visible under the reorder filter.
pub fn filter_reorder(totals: &[AggregatedTotal], only_reorder: bool) -> impl Iterator<Item = &AggregatedTotal> {
    totals.iter().filter(move |t| !only_reorder || t.needs_reorder())
}

/// Group overview rows by category, in first-appearance order.
pub fn group_by_category<'a>(
    totals: impl IntoIterator<Item = &'a AggregatedTotal>,
) -> Vec<(&'a str, Vec<&'a AggregatedTotal>)> {
    let mut groups: Vec<(&str, Vec<&AggregatedTotal>)> = Vec::new();

    for total in totals {
        let label = if total.category.is_empty() {
            OTHER_CATEGORY
        } else {
            total.category.as_str()
        };

        match groups.iter_mut().find(|(c, _)| *c == label) {
            Some((_, rows)) => rows.push(total),
            None => groups.push((label, vec![total])),
        }
    }

    groups
}

/// Counted quantity of one product at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    pub location_id: LocationId,
    pub location_name: String,
    pub quantity: Quantity,
}

/// Per-location counts for one product (detail view).
///
/// Only locations where the product is stocked are listed, in the given
/// location order; quantities are summed over rounds and are zero when
/// nothing was counted yet.
pub fn product_breakdown<'a>(
    product: &Product,
    locations: &[Location],
    counts: impl IntoIterator<Item = &'a Count>,
) -> Vec<LocationCount> {
    let counts: Vec<&Count> = counts.into_iter().filter(|c| product.holds(&c.item_id)).collect();

    locations
        .iter()
        .filter_map(|location| {
            let stock = product.stock_at(&location.id)?;
            let quantity = counts
                .iter()
                .filter(|c| c.item_id == stock.item_id && c.location_id == location.id)
                .map(|c| c.quantity)
                .sum();

            Some(LocationCount {
                location_id: location.id.clone(),
                location_name: location.name.clone(),
                quantity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::{CountKey, CountStore};
    use stocktake_catalog::parse_catalog_default;
    use stocktake_core::{default_locations, Round, CONTAINER, COOLED, DRY};

    const LISTING: &str = "\
SOFT DRINKS
Cola,24
Fanta,12
RED WINE
Merlot,6
";

    fn record(store: &mut CountStore, item: &str, location: &str, round: u32, qty: u32) {
        store.upsert(
            CountKey::new(ItemId::new(item), LocationId::new(location), Round::new(round).unwrap()),
            Quantity::new(qty),
        );
    }

    fn catalog() -> Catalog {
        Catalog::from_items(parse_catalog_default(LISTING))
    }

    #[test]
    fn cola_counts_merge_across_locations() {
        let catalog = catalog();
        let mut store = CountStore::new();
        record(&mut store, "cola-cooled", COOLED, 1, 10);
        record(&mut store, "cola-container", CONTAINER, 3, 5);

        let totals = compute_totals(&catalog, store.iter());
        let cola = totals.iter().find(|t| t.name == "Cola").unwrap();
        assert_eq!(cola.total_counted, Quantity::new(15));
        assert_eq!(cola.minimum_stock, Quantity::new(24));
        assert_eq!(cola.reorder_quantity, Quantity::new(9));
    }

    #[test]
    fn one_row_per_product_in_catalog_order() {
        let totals = compute_totals(&catalog(), std::iter::empty());
        let names: Vec<_> = totals.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Cola", "Fanta", "Merlot"]);
        assert!(totals.iter().all(|t| t.total_counted == Quantity::ZERO));
        assert!(totals.iter().all(|t| t.reorder_quantity == t.minimum_stock));
    }

    #[test]
    fn overstock_never_goes_negative() {
        let catalog = catalog();
        let mut store = CountStore::new();
        record(&mut store, "merlot", DRY, 2, 40);

        let totals = compute_totals(&catalog, store.iter());
        let merlot = totals.iter().find(|t| t.name == "Merlot").unwrap();
        assert_eq!(merlot.reorder_quantity, Quantity::ZERO);
        assert!(!merlot.needs_reorder());
    }

    #[test]
    fn reset_reflects_all_zero_totals() {
        let catalog = catalog();
        let mut store = CountStore::new();
        record(&mut store, "cola-cooled", COOLED, 1, 30);
        record(&mut store, "merlot", DRY, 2, 6);

        store.reset_all();
        let totals = compute_totals(&catalog, store.iter());
        assert!(totals.iter().all(|t| t.total_counted == Quantity::ZERO));
    }

    #[test]
    fn unknown_items_are_ignored() {
        let mut store = CountStore::new();
        record(&mut store, "ghost-cooled", COOLED, 1, 3);
        let totals = compute_totals(&catalog(), store.iter());
        assert!(totals.iter().all(|t| t.total_counted == Quantity::ZERO));
    }

    #[test]
    fn filter_and_group_overview() {
        let catalog = catalog();
        let mut store = CountStore::new();
        record(&mut store, "cola-cooled", COOLED, 1, 24);

        let totals = compute_totals(&catalog, store.iter());
        let visible: Vec<_> = filter_reorder(&totals, true).map(|t| t.name.as_str()).collect();
        assert_eq!(visible, vec!["Fanta", "Merlot"]);
        assert_eq!(filter_reorder(&totals, false).count(), 3);

        let groups = group_by_category(&totals);
        let labels: Vec<_> = groups.iter().map(|(c, rows)| (*c, rows.len())).collect();
        assert_eq!(labels, vec![("SOFT DRINKS", 2), ("RED WINE", 1)]);
    }

    #[test]
    fn empty_category_is_grouped_as_other() {
        let catalog = Catalog::from_items(parse_catalog_default("Water,6"));
        let totals = compute_totals(&catalog, std::iter::empty());
        let groups = group_by_category(&totals);
        assert_eq!(groups[0].0, OTHER_CATEGORY);
    }

    #[test]
    fn breakdown_lists_stocked_locations_only() {
        let catalog = catalog();
        let mut store = CountStore::new();
        record(&mut store, "cola-cooled", COOLED, 1, 10);
        record(&mut store, "fanta-cooled", COOLED, 1, 2);

        let cola = catalog.product("Cola").unwrap();
        let breakdown = product_breakdown(cola, &default_locations(), store.iter());
        let rows: Vec<_> = breakdown
            .iter()
            .map(|r| (r.location_id.as_str(), r.quantity.value()))
            .collect();
        assert_eq!(rows, vec![(COOLED, 10), (CONTAINER, 0)]);

        let merlot = catalog.product("Merlot").unwrap();
        let breakdown = product_breakdown(merlot, &default_locations(), store.iter());
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].location_name, "Cupboard");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use stocktake_catalog::Item;

        const NAMES: [&str; 4] = ["Cola", "Fanta", "Merlot", "Pils"];
        const LOCATIONS: [&str; 3] = [COOLED, DRY, CONTAINER];

        fn items() -> impl Strategy<Value = Vec<Item>> {
            prop::collection::vec((0usize..4, 0usize..3, 0u32..50), 1..12).prop_map(|rows| {
                rows.into_iter()
                    .map(|(name, location, minimum)| {
                        let name = NAMES[name];
                        let location = LOCATIONS[location];
                        Item {
                            id: ItemId::new(format!("{}-{location}", name.to_lowercase())),
                            name: name.to_string(),
                            minimum_stock: Quantity::new(minimum),
                            location_id: LocationId::new(location),
                            category: String::new(),
                            unit: Unit::Pieces,
                        }
                    })
                    .collect()
            })
        }

        fn counts(items: &[Item], quantities: &[u32]) -> CountStore {
            let mut store = CountStore::new();
            for (item, qty) in items.iter().zip(quantities) {
                store.upsert(
                    CountKey::new(item.id.clone(), item.location_id.clone(), Round::FIRST),
                    Quantity::new(*qty),
                );
            }
            store
        }

        proptest! {
            /// Property: reorder quantity is never negative and equals the
            /// floored shortfall.
            #[test]
            fn reorder_is_floored_shortfall(
                items in items(),
                quantities in prop::collection::vec(0u32..100, 12)
            ) {
                let catalog = Catalog::from_items(items.clone());
                let store = counts(&items, &quantities);

                for total in compute_totals(&catalog, store.iter()) {
                    let expected = total.minimum_stock.value().saturating_sub(total.total_counted.value());
                    prop_assert_eq!(total.reorder_quantity.value(), expected);
                }
            }

            /// Property: permuting the items changes group order, never group sums.
            #[test]
            fn grouping_sums_ignore_item_order(
                (items, shuffled) in items().prop_flat_map(|items| {
                    (Just(items.clone()), Just(items).prop_shuffle())
                }),
                quantities in prop::collection::vec(0u32..100, 12)
            ) {
                let catalog = Catalog::from_items(items.clone());
                let store = counts(&items, &quantities);
                let shuffled_catalog = Catalog::from_items(shuffled);

                let sums = |totals: Vec<AggregatedTotal>| {
                    totals
                        .into_iter()
                        .map(|t| (t.name, t.total_counted))
                        .collect::<HashMap<_, _>>()
                };

                prop_assert_eq!(
                    sums(compute_totals(&catalog, store.iter())),
                    sums(compute_totals(&shuffled_catalog, store.iter()))
                );
            }
        }
    }
}
