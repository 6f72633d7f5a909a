//! Counting session: the whole application state behind one state machine.
//!
//! The front-end turns user actions into [`SessionCommand`]s and dispatches
//! them; everything it shows is read back through the query methods. Only
//! the front-end performs IO (writing exports), using values produced here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocktake_catalog::{Catalog, Item};
use stocktake_core::{
    sort_by_rank, DomainError, ItemId, Location, Quantity, Round, StateMachine,
};
use stocktake_counting::{
    compute_round_view, compute_totals, filter_reorder, group_by_category, product_breakdown,
    AggregatedTotal, CountKey, CountStore, LocationCount, RoundView,
};
use stocktake_export::{ExportError, ExportFile};

/// Selected tab: one per location (by rank position), plus the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    Location(usize),
    Overview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectTab(Tab),
    /// Raw text typed into an item's quantity field.
    EnterQuantity { item_id: ItemId, input: String },
    RequestReset,
    ConfirmReset,
    CancelReset,
    ToggleReorderFilter,
    OpenDetail { name: String },
    CloseDetail,
    Focus { item_id: ItemId },
    Blur,
    /// Move focus to the next item in entry order, wrapping around.
    AdvanceFocus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TabSelected(Tab),
    CountRecorded { key: CountKey, quantity: Quantity },
    ResetRequested,
    ResetCancelled,
    CountsCleared,
    ReorderFilterSet(bool),
    DetailOpened(String),
    DetailClosed,
    FocusChanged(Option<ItemId>),
}

/// Application state.
#[derive(Debug, Clone)]
pub struct Session {
    locations: Vec<Location>,
    catalog: Catalog,
    counts: CountStore,
    tab: Tab,
    reset_pending: bool,
    only_reorder: bool,
    detail: Option<String>,
    focus: Option<ItemId>,
}

impl Session {
    /// Start a session; locations are put in rank order.
    pub fn new(mut locations: Vec<Location>, catalog: Catalog) -> Self {
        sort_by_rank(&mut locations);
        let tab = if locations.is_empty() {
            Tab::Overview
        } else {
            Tab::Location(0)
        };

        Self {
            locations,
            catalog,
            counts: CountStore::new(),
            tab,
            reset_pending: false,
            only_reorder: false,
            detail: None,
            focus: None,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn counts(&self) -> &CountStore {
        &self.counts
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn only_reorder(&self) -> bool {
        self.only_reorder
    }

    pub fn focus(&self) -> Option<&ItemId> {
        self.focus.as_ref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Active location and its round, when a location tab is selected.
    pub fn active_location(&self) -> Option<(&Location, Round)> {
        match self.tab {
            Tab::Location(idx) => self
                .locations
                .get(idx)
                .map(|l| (l, Round::for_position(idx))),
            Tab::Overview => None,
        }
    }

    fn count_key(&self, item_id: &ItemId) -> Option<CountKey> {
        self.active_location()
            .map(|(location, round)| CountKey::new(item_id.clone(), location.id.clone(), round))
    }

    /// Value shown in an item's field on the active tab (`None` when nothing
    /// was entered yet).
    pub fn displayed_quantity(&self, item_id: &ItemId) -> Option<Quantity> {
        self.count_key(item_id).and_then(|key| self.counts.quantity(&key))
    }

    /// Whether the item already has a count in the active round.
    pub fn is_counted(&self, item_id: &ItemId) -> bool {
        self.displayed_quantity(item_id).is_some()
    }

    /// Entry sections (category, items) for the active location tab.
    pub fn entry_sections(&self) -> Vec<(&str, Vec<&Item>)> {
        match self.active_location() {
            Some((location, _)) => self.catalog.sections_at(&location.id),
            None => Vec::new(),
        }
    }

    pub fn totals(&self) -> Vec<AggregatedTotal> {
        compute_totals(&self.catalog, self.counts.iter())
    }

    /// Overview rows under the current reorder filter, grouped by category.
    pub fn overview(&self) -> Vec<(String, Vec<AggregatedTotal>)> {
        let totals = self.totals();
        group_by_category(filter_reorder(&totals, self.only_reorder))
            .into_iter()
            .map(|(category, rows)| (category.to_string(), rows.into_iter().cloned().collect()))
            .collect()
    }

    pub fn round_views(&self) -> Vec<RoundView> {
        compute_round_view(&self.locations, &self.catalog, self.counts.iter())
    }

    /// Per-location counts of the product shown in the detail view.
    pub fn detail_breakdown(&self) -> Option<(&str, Vec<LocationCount>)> {
        let name = self.detail.as_deref()?;
        let product = self.catalog.product(name)?;
        Some((name, product_breakdown(product, &self.locations, self.counts.iter())))
    }

    /// Render the export for `date`, honouring the reorder filter.
    pub fn export(&self, date: NaiveDate) -> Result<ExportFile, ExportError> {
        ExportFile::build(&self.totals(), self.only_reorder, date)
    }

    fn item_on_active_tab(&self, item_id: &ItemId) -> Result<(&Item, CountKey), DomainError> {
        let (location, round) = self
            .active_location()
            .ok_or_else(|| DomainError::conflict("no location tab is active"))?;

        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;

        if item.location_id != location.id {
            return Err(DomainError::invariant(format!(
                "item {item_id} is not stocked at {}",
                location.id
            )));
        }

        Ok((item, CountKey::new(item_id.clone(), location.id.clone(), round)))
    }

    fn next_focus(&self) -> Option<ItemId> {
        let (location, _) = self.active_location()?;
        let order = self.catalog.entry_order(&location.id);
        if order.is_empty() {
            return None;
        }

        let next = match &self.focus {
            Some(current) => order
                .iter()
                .position(|i| &i.id == current)
                .map(|pos| (pos + 1) % order.len())
                .unwrap_or(0),
            None => 0,
        };
        Some(order[next].id.clone())
    }
}

impl StateMachine for Session {
    type Command = SessionCommand;
    type Event = SessionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SessionEvent::TabSelected(tab) => {
                self.tab = *tab;
                self.focus = None;
            }
            SessionEvent::CountRecorded { key, quantity } => {
                self.counts.upsert(key.clone(), *quantity);
            }
            SessionEvent::ResetRequested => {
                self.reset_pending = true;
            }
            SessionEvent::ResetCancelled => {
                self.reset_pending = false;
            }
            SessionEvent::CountsCleared => {
                self.counts.reset_all();
                self.reset_pending = false;
            }
            SessionEvent::ReorderFilterSet(on) => {
                self.only_reorder = *on;
            }
            SessionEvent::DetailOpened(name) => {
                self.detail = Some(name.clone());
            }
            SessionEvent::DetailClosed => {
                self.detail = None;
            }
            SessionEvent::FocusChanged(item_id) => {
                self.focus = item_id.clone();
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SessionCommand::SelectTab(tab) => {
                if let Tab::Location(idx) = tab {
                    if *idx >= self.locations.len() {
                        return Err(DomainError::not_found(format!("location tab {}", idx + 1)));
                    }
                }
                Ok(vec![SessionEvent::TabSelected(*tab)])
            }
            SessionCommand::EnterQuantity { item_id, input } => {
                let (_, key) = self.item_on_active_tab(item_id)?;
                Ok(vec![SessionEvent::CountRecorded {
                    key,
                    quantity: Quantity::from_input(input),
                }])
            }
            SessionCommand::RequestReset => {
                if self.reset_pending {
                    return Ok(vec![]);
                }
                Ok(vec![SessionEvent::ResetRequested])
            }
            SessionCommand::ConfirmReset => {
                if !self.reset_pending {
                    return Err(DomainError::conflict("reset was not requested"));
                }
                Ok(vec![SessionEvent::CountsCleared])
            }
            SessionCommand::CancelReset => {
                if !self.reset_pending {
                    return Ok(vec![]);
                }
                Ok(vec![SessionEvent::ResetCancelled])
            }
            SessionCommand::ToggleReorderFilter => {
                Ok(vec![SessionEvent::ReorderFilterSet(!self.only_reorder)])
            }
            SessionCommand::OpenDetail { name } => {
                if self.catalog.product(name).is_none() {
                    return Err(DomainError::not_found(format!("product {name:?}")));
                }
                Ok(vec![SessionEvent::DetailOpened(name.clone())])
            }
            SessionCommand::CloseDetail => {
                if self.detail.is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![SessionEvent::DetailClosed])
            }
            SessionCommand::Focus { item_id } => {
                self.item_on_active_tab(item_id)?;
                Ok(vec![SessionEvent::FocusChanged(Some(item_id.clone()))])
            }
            SessionCommand::Blur => {
                if self.focus.is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![SessionEvent::FocusChanged(None)])
            }
            SessionCommand::AdvanceFocus => {
                Ok(self
                    .next_focus()
                    .map(|next| vec![SessionEvent::FocusChanged(Some(next))])
                    .unwrap_or_default())
            }
        }
    }
}
