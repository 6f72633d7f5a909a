//! Counting: the in-memory count store and the aggregation engine that turns
//! counts into per-product totals and reorder quantities.
//!
//! Pure, deterministic logic; no IO.

pub mod count;
pub mod rounds;
pub mod totals;

pub use count::{Count, CountKey, CountQuery, CountStore};
pub use rounds::{compute_round_view, RoundView};
pub use totals::{
    compute_totals, filter_reorder, group_by_category, product_breakdown, AggregatedTotal,
    LocationCount, OTHER_CATEGORY,
};
