//! Catalog listing parser.
//!
//! The listing is line oriented. A line is either a category header (an
//! uppercase name with no second field) or a `name, minimum_stock` data line:
//!
//! ```text
//! SOFT DRINKS
//! Cola, 24
//! Fanta, 12
//! RED WINE
//! Merlot, 6
//! ```
//!
//! Malformed lines are skipped; parsing never fails.

use stocktake_core::{slugify, Quantity};

use crate::item::Item;
use crate::rules::CategoryRules;

enum Line<'a> {
    Header(&'a str),
    Data { name: &'a str, minimum_stock: Quantity },
    Skip(&'static str),
}

fn classify(line: &str) -> Line<'_> {
    let mut fields = line.split(',').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let minimum = fields.next().filter(|f| !f.is_empty());

    if name.is_empty() {
        return Line::Skip("missing name");
    }

    match minimum {
        None if name == name.to_uppercase() => Line::Header(name),
        None => Line::Skip("missing minimum stock"),
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) => Line::Data {
                name,
                minimum_stock: Quantity::new(value),
            },
            Err(_) => Line::Skip("minimum stock is not a non-negative integer"),
        },
    }
}

/// Parse a catalog listing into items, in order of appearance.
///
/// Each data line yields one item at the category's primary location, plus a
/// second item at the overflow location when the category's rule asks for it.
pub fn parse_catalog(text: &str, rules: &CategoryRules) -> Vec<Item> {
    let mut items = Vec::new();
    let mut category = String::new();

    for (line_no, line) in text.lines().enumerate() {
        match classify(line) {
            Line::Header(name) => {
                category = name.to_string();
            }
            Line::Skip(reason) => {
                if !line.trim().is_empty() {
                    tracing::debug!(line = line_no + 1, reason, "skipping catalog line");
                }
            }
            Line::Data { name, minimum_stock } => {
                let placement = rules.resolve(&category);
                let slug = slugify(name);

                items.push(Item {
                    id: rules.item_id(&slug, &placement.location),
                    name: name.to_string(),
                    minimum_stock,
                    location_id: placement.location.clone(),
                    category: category.clone(),
                    unit: placement.unit,
                });

                if let Some(overflow) = placement.overflow {
                    items.push(Item {
                        id: rules.item_id(&slug, &overflow),
                        name: name.to_string(),
                        minimum_stock,
                        location_id: overflow,
                        category: category.clone(),
                        unit: placement.unit,
                    });
                }
            }
        }
    }

    items
}

/// [`parse_catalog`] with the venue's default rule table.
pub fn parse_catalog_default(text: &str) -> Vec<Item> {
    parse_catalog(text, &CategoryRules::default())
}
