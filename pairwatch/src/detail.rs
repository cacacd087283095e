//! Detail panel controller.
//!
//! The panel is a single slot: either [`PanelState::Closed`] or open on exactly one pair together
//! with that pair's [`DetailRecord`]. Opening is a two step affair. [`DetailPanel::toggle`] hands
//! out a [`DetailRequest`] which the caller fetches, and the panel only opens once
//! [`DetailPanel::resolve`] is given a successful response for the most recent request.

use crate::pair::{DetailRecord, PairId};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open {
        pair: PairId,
        record: DetailRecord,
    },
}

/// One-shot detail fetch issued by [`DetailPanel::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub id: u64,
    pub pair: PairId,
}

#[derive(Debug, Default)]
pub struct DetailPanel {
    state: PanelState,
    pending: Option<DetailRequest>,
    next_request_id: u64,
}

impl DetailPanel {
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    /// Pair the panel is currently open on.
    pub fn open_pair(&self) -> Option<&PairId> {
        match &self.state {
            PanelState::Closed => None,
            PanelState::Open { pair, .. } => Some(pair),
        }
    }

    /// The single resident record, if the panel is open.
    pub fn record(&self) -> Option<&DetailRecord> {
        match &self.state {
            PanelState::Closed => None,
            PanelState::Open { record, .. } => Some(record),
        }
    }

    /// Pair whose details are being fetched.
    pub fn pending_pair(&self) -> Option<&PairId> {
        self.pending.as_ref().map(|request| &request.pair)
    }

    /// Close the panel if it is open on `pair`, otherwise issue a fetch for `pair`.
    ///
    /// A new request supersedes any request still in flight. Closing leaves a request for
    /// another pair in flight, so that pair still opens once its response arrives.
    pub fn toggle(&mut self, pair: &PairId) -> Option<DetailRequest> {
        if self.open_pair() == Some(pair) {
            debug!(%pair, "closing detail panel");
            self.state = PanelState::Closed;
            if self.pending_pair() == Some(pair) {
                self.pending = None;
            }
            return None;
        }

        self.next_request_id += 1;
        let request = DetailRequest {
            id: self.next_request_id,
            pair: pair.clone(),
        };
        debug!(%pair, request = request.id, "requesting pair details");
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Apply the outcome of a detail fetch.
    ///
    /// Outcomes for anything but the latest pending request are discarded. A failed fetch leaves
    /// the panel as it was before the toggle. Returns whether the outcome was applied.
    pub fn resolve<E>(&mut self, request: u64, outcome: Result<DetailRecord, E>) -> bool {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == request => pending,
            other => {
                self.pending = other;
                debug!(request, "discarding superseded detail response");
                return false;
            }
        };

        if let Ok(mut record) = outcome {
            record.pair = pending.pair.clone();
            self.state = PanelState::Open {
                pair: pending.pair,
                record,
            };
        }
        true
    }

    /// Forget everything about `pair` after it stopped being a favorite.
    pub fn forget(&mut self, pair: &str) {
        if self.open_pair().is_some_and(|open| open.as_str() == pair) {
            debug!(pair, "closing detail panel for removed favorite");
            self.state = PanelState::Closed;
        }
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.pair.as_str() == pair)
        {
            self.pending = None;
        }
    }
}
