//! View model behind the official-alerts board.

use hazard_core::{process, Alert, AlertLevel, FilterState, LevelFilter, Pager, Zone, ZoneFilter};
use hazard_feed::{AlertSource, CancelFlag, IngestionError};
use tracing::{debug, warn};

use crate::sequence::{LastApplied, Sequencer, Ticket};

pub const EMPTY_MESSAGE: &str = "Sem alertas a mostrar com estes filtros.";
pub const LOADING_MESSAGE: &str = "A carregar alertas oficiais…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    /// The last fetch failed; the message is shown as a banner.
    Failed(String),
    Loaded,
}

/// Alert list, filters and pagination for one board.
///
/// The processed list is recomputed on every input change. Fetch results are
/// tagged with a [`Ticket`]: a result older than one already applied, or one
/// arriving after the board was torn down, is discarded.
#[derive(Debug)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
    processed: Vec<Alert>,
    state: LoadState,
    filter: FilterState,
    pager: Pager,
    sequencer: Sequencer,
    applied: LastApplied,
    cancel: CancelFlag,
}

impl AlertBoard {
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            alerts: Vec::new(),
            processed: Vec::new(),
            state: LoadState::Loading,
            filter: FilterState::default(),
            pager: Pager::default(),
            sequencer: Sequencer::new(),
            applied: LastApplied::default(),
            cancel,
        }
    }

    /// Mark a fetch as started and return its ticket.
    pub fn begin_load(&mut self) -> Ticket {
        let ticket = self.sequencer.issue();
        if !self.cancel.is_cancelled() {
            self.state = LoadState::Loading;
        }
        ticket
    }

    /// Apply a fetch result. Returns false if it was discarded.
    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<Alert>, IngestionError>) -> bool {
        if self.cancel.is_cancelled() {
            debug!("board torn down; dropping fetch {:?}", ticket);
            return false;
        }
        if !self.applied.accept(ticket) {
            debug!("dropping stale fetch {:?}", ticket);
            return false;
        }
        match result {
            Ok(alerts) => {
                self.alerts = alerts;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!("alert fetch failed: {}", e);
                self.alerts.clear();
                self.state = LoadState::Failed(e.to_string());
            }
        }
        self.recompute();
        true
    }

    /// Fetch from `source` and apply the result.
    pub async fn refresh(&mut self, source: &dyn AlertSource) -> bool {
        let ticket = self.begin_load();
        let result = source.fetch_alerts().await;
        self.apply(ticket, result)
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.filter = filter;
        self.pager.reset();
        self.recompute();
    }

    pub fn set_zone(&mut self, zone: ZoneFilter) {
        let mut filter = self.filter.clone();
        filter.zone = zone;
        self.set_filter(filter);
    }

    pub fn set_level(&mut self, level: LevelFilter) {
        let mut filter = self.filter.clone();
        filter.level = level;
        self.set_filter(filter);
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let mut filter = self.filter.clone();
        filter.query = query.into();
        self.set_filter(filter);
    }

    pub fn show_more(&mut self) {
        if !self.cancel.is_cancelled() {
            self.pager.show_more();
        }
    }

    pub fn show_less(&mut self) {
        if !self.cancel.is_cancelled() {
            self.pager.show_less();
        }
    }

    fn recompute(&mut self) {
        self.processed = process(&self.alerts, &self.filter);
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Every alert that passes the filters, ranked.
    pub fn processed(&self) -> &[Alert] {
        &self.processed
    }

    /// The current page of [`processed`](Self::processed).
    pub fn visible(&self) -> &[Alert] {
        self.pager.slice(&self.processed)
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.processed.len())
    }

    pub fn can_show_less(&self) -> bool {
        self.pager.can_show_less(self.processed.len())
    }

    /// Header count: `…` while loading, else the processed total.
    pub fn count_label(&self) -> String {
        match self.state {
            LoadState::Loading => "…".to_string(),
            _ => self.processed.len().to_string(),
        }
    }

    /// `"A mostrar 6 de 20"` when there is anything to show.
    pub fn shown_label(&self) -> Option<String> {
        if self.state != LoadState::Loaded || self.processed.is_empty() {
            return None;
        }
        let (shown, total) = self.pager.shown_of(self.processed.len());
        Some(format!("A mostrar {} de {}", shown, total))
    }

    /// Status line for the body of the board, if not showing a list.
    pub fn status_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Loading => Some(LOADING_MESSAGE),
            LoadState::Failed(message) => Some(message.as_str()),
            LoadState::Loaded if self.processed.is_empty() => Some(EMPTY_MESSAGE),
            LoadState::Loaded => None,
        }
    }

    /// Alerts per level among the processed list, most severe first.
    pub fn level_counts(&self) -> [(AlertLevel, usize); 3] {
        let count = |level: AlertLevel| self.processed.iter().filter(|a| a.level == level).count();
        [
            (AlertLevel::Red, count(AlertLevel::Red)),
            (AlertLevel::Orange, count(AlertLevel::Orange)),
            (AlertLevel::Yellow, count(AlertLevel::Yellow)),
        ]
    }

    /// Alerts per zone among all loaded alerts, in [`Zone::ALL`] order.
    pub fn zone_counts(&self) -> Vec<(Zone, usize)> {
        Zone::ALL
            .iter()
            .map(|&zone| (zone, self.alerts.iter().filter(|a| a.zone() == zone).count()))
            .collect()
    }
}
