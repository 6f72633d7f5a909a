use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocktake_core::{ItemId, LocationId, Quantity, Unit};

/// A countable product at one storage location.
///
/// Items are produced by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub minimum_stock: Quantity,
    pub location_id: LocationId,
    pub category: String,
    pub unit: Unit,
}

/// Per-location stock record owned by a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub item_id: ItemId,
    pub location_id: LocationId,
}

/// The logical beverage: one display name, stocked at one or more locations.
///
/// Category, unit and minimum stock come from the first item seen with this
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub minimum_stock: Quantity,
    pub stocks: Vec<Stock>,
}

impl Product {
    fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            unit: item.unit,
            minimum_stock: item.minimum_stock,
            stocks: Vec::new(),
        }
    }

    pub fn holds(&self, item_id: &ItemId) -> bool {
        self.stocks.iter().any(|s| &s.item_id == item_id)
    }

    pub fn stock_at(&self, location_id: &LocationId) -> Option<&Stock> {
        self.stocks.iter().find(|s| &s.location_id == location_id)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.stocks.iter().map(|s| &s.item_id)
    }
}

/// Loaded catalog: items in listing order plus the products they group into.
///
/// Grouping by name happens once, here; lookups afterwards go through the
/// item-id index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
    products: Vec<Product>,
    item_index: HashMap<ItemId, usize>,
    product_of_item: HashMap<ItemId, usize>,
    product_by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the catalog from parsed items.
    ///
    /// Items whose id was already seen are dropped (first one wins); ids are the
    /// count store's key and must stay unique.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Self::default();

        for item in items {
            if catalog.item_index.contains_key(&item.id) {
                tracing::warn!(item_id = %item.id, name = %item.name, "duplicate item id in catalog; keeping first");
                continue;
            }

            let product_idx = match catalog.product_by_name.get(&item.name) {
                Some(idx) => *idx,
                None => {
                    catalog.products.push(Product::from_item(&item));
                    let idx = catalog.products.len() - 1;
                    catalog.product_by_name.insert(item.name.clone(), idx);
                    idx
                }
            };

            catalog.products[product_idx].stocks.push(Stock {
                item_id: item.id.clone(),
                location_id: item.location_id.clone(),
            });
            catalog.product_of_item.insert(item.id.clone(), product_idx);
            catalog.item_index.insert(item.id.clone(), catalog.items.len());
            catalog.items.push(item);
        }

        catalog
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.item_index.get(id).map(|idx| &self.items[*idx])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.item_index.contains_key(id)
    }

    pub fn product(&self, name: &str) -> Option<&Product> {
        self.product_by_name.get(name).map(|idx| &self.products[*idx])
    }

    pub fn product_of(&self, id: &ItemId) -> Option<&Product> {
        self.product_of_item.get(id).map(|idx| &self.products[*idx])
    }

    /// Items stocked at `location_id`, in listing order.
    pub fn items_at<'a>(&'a self, location_id: &'a LocationId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |i| &i.location_id == location_id)
    }

    /// Entry screen sections for one location: items grouped by category, both
    /// categories and items in first-appearance order.
    pub fn sections_at(&self, location_id: &LocationId) -> Vec<(&str, Vec<&Item>)> {
        let mut sections: Vec<(&str, Vec<&Item>)> = Vec::new();
        for item in self.items.iter().filter(|i| &i.location_id == location_id) {
            match sections.iter_mut().find(|(c, _)| *c == item.category) {
                Some((_, items)) => items.push(item),
                None => sections.push((item.category.as_str(), vec![item])),
            }
        }
        sections
    }

    /// Flat entry order for one location (the order focus advances in).
    pub fn entry_order(&self, location_id: &LocationId) -> Vec<&Item> {
        self.sections_at(location_id)
            .into_iter()
            .flat_map(|(_, items)| items)
            .collect()
    }
}
