//! Application state for the pair watcher.
//!
//! [`Watcher`] owns the catalog, filter inputs, favorites, price snapshot, poller and detail
//! panel. Network work is spawned onto the runtime and reports back as [`WatchEvent`]s on the
//! channel returned by [`Watcher::new`]; the owner feeds those back through [`Watcher::handle`],
//! which is the only place asynchronous results are applied.

use crate::{
    catalog::Catalog,
    detail::{DetailPanel, DetailRequest},
    error::ClientError,
    favorites::FavoritesSet,
    filter::PairFilter,
    gesture::{Gesture, GestureDetector, Point},
    pair::{DetailRecord, PairId, PriceQuote, TradingPair},
    poller::{POLL_INTERVAL, PollerState, PriceBoard, PricePoller},
    source::MarketDataSource,
};
use chrono::Utc;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watcher configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Period between batched price requests while favorites exist
    pub poll_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl WatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Outcome of asynchronous work, applied via [`Watcher::handle`].
#[derive(Debug)]
pub enum WatchEvent {
    CatalogLoaded(Result<Vec<TradingPair>, ClientError>),
    PollTick {
        epoch: u64,
    },
    PricesResolved {
        epoch: u64,
        outcome: Result<Vec<PriceQuote>, ClientError>,
    },
    DetailResolved {
        request: u64,
        outcome: Result<DetailRecord, ClientError>,
    },
}

/// Receiving half of the watcher's event channel.
pub type WatchEvents = mpsc::UnboundedReceiver<WatchEvent>;

pub struct Watcher {
    source: Arc<dyn MarketDataSource>,
    events_tx: mpsc::UnboundedSender<WatchEvent>,
    catalog: Catalog,
    filter: PairFilter,
    favorites: FavoritesSet,
    prices: PriceBoard,
    poller: PricePoller,
    detail: DetailPanel,
    gestures: HashMap<PairId, GestureDetector>,
}

impl Watcher {
    pub fn new(source: Arc<dyn MarketDataSource>, config: WatcherConfig) -> (Self, WatchEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let watcher = Self {
            source,
            events_tx,
            catalog: Catalog::default(),
            filter: PairFilter::default(),
            favorites: FavoritesSet::default(),
            prices: PriceBoard::default(),
            poller: PricePoller::new(config.poll_interval),
            detail: DetailPanel::default(),
            gestures: HashMap::new(),
        };

        (watcher, events_rx)
    }

    /// Fetch the catalog in the background. The result arrives as [`WatchEvent::CatalogLoaded`].
    pub fn load_catalog(&self) {
        let source = Arc::clone(&self.source);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_catalog().await;
            let _ = events_tx.send(WatchEvent::CatalogLoaded(outcome));
        });
    }

    /// Apply the outcome of asynchronous work.
    pub fn handle(&mut self, event: WatchEvent) {
        match event {
            WatchEvent::CatalogLoaded(Ok(pairs)) => {
                self.catalog = Catalog::new(pairs);
                info!(
                    pairs = self.catalog.len(),
                    quote_assets = self.catalog.quote_assets().len(),
                    statuses = self.catalog.statuses().len(),
                    "loaded trading pair catalog"
                );
            }
            WatchEvent::CatalogLoaded(Err(error)) => {
                warn!(%error, "failed to load trading pair catalog");
            }
            WatchEvent::PollTick { epoch } => self.poll(epoch),
            WatchEvent::PricesResolved { epoch, outcome } => {
                if !self.poller.accepts(epoch) {
                    debug!(epoch, "discarding price response from cancelled poller");
                    return;
                }
                match outcome {
                    Ok(quotes) => self.prices.replace(quotes, Utc::now()),
                    Err(error) => warn!(%error, epoch, "price poll failed, keeping last prices"),
                }
            }
            WatchEvent::DetailResolved { request, outcome } => {
                if let Err(error) = &outcome {
                    if error.is_rejection() {
                        warn!(%error, request, "exchange rejected detail request");
                    } else {
                        warn!(%error, request, "detail fetch failed");
                    }
                }
                self.detail.resolve(request, outcome);
            }
        }
    }

    fn poll(&mut self, epoch: u64) {
        if !self.poller.accepts(epoch) || self.favorites.is_empty() {
            debug!(epoch, "ignoring stale poll tick");
            return;
        }

        let pairs = self.favorites.snapshot();
        let source = Arc::clone(&self.source);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_prices(&pairs).await;
            let _ = events_tx.send(WatchEvent::PricesResolved { epoch, outcome });
        });
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &PairFilter {
        &self.filter
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter.set_text(text);
    }

    pub fn toggle_quote_asset(&mut self, asset: &str) -> bool {
        self.filter.toggle_quote_asset(asset)
    }

    pub fn toggle_status(&mut self, status: &str) -> bool {
        self.filter.toggle_status(status)
    }

    /// Catalog pairs passing the current filter inputs.
    pub fn visible_pairs(&self) -> Vec<&TradingPair> {
        self.filter.apply(&self.catalog)
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Pin `pair`. Arms the poller if this is the first favorite.
    pub fn add_favorite(&mut self, pair: impl Into<PairId>) -> bool {
        let pair = pair.into();
        debug!(%pair, "adding favorite");
        let added = self.favorites.add(pair);
        if added {
            self.poller.sync(!self.favorites.is_empty(), &self.events_tx);
        }
        added
    }

    /// Unpin `pair`. Closes the detail panel if it was showing `pair`, and idles the poller if no
    /// favorites remain.
    pub fn remove_favorite(&mut self, pair: &str) -> bool {
        let removed = self.favorites.remove(pair);
        if removed {
            debug!(pair, "removed favorite");
            self.detail.forget(pair);
            self.gestures.remove(pair);
            self.poller.sync(!self.favorites.is_empty(), &self.events_tx);
        }
        removed
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    pub fn prices(&self) -> &PriceBoard {
        &self.prices
    }

    /// Display value for the price of `pair`.
    pub fn price_label(&self, pair: &str) -> &str {
        self.prices.label(pair)
    }

    pub fn detail(&self) -> &DetailPanel {
        &self.detail
    }

    /// Begin a gesture on the favorite item `pair`.
    pub fn gesture_start(&mut self, pair: &str, at: Point) {
        let Some(pair) = self.favorites.get(pair) else {
            return;
        };
        self.gestures.entry(pair.clone()).or_default().start(at);
    }

    /// Finish a gesture on the favorite item `pair`. A swipe toggles the detail panel for `pair`.
    pub fn gesture_end(&mut self, pair: &str, at: Point) -> Option<Gesture> {
        let gesture = self.gestures.get_mut(pair)?.end(at)?;
        if gesture == Gesture::Swipe {
            self.toggle_detail(pair);
        }
        Some(gesture)
    }

    /// Close the detail panel if it shows `pair`, otherwise fetch `pair`'s details and open the
    /// panel on them once they arrive. Only favorites can be shown.
    pub fn toggle_detail(&mut self, pair: &str) {
        let Some(pair) = self.favorites.get(pair).cloned() else {
            return;
        };

        if let Some(DetailRequest { id, pair }) = self.detail.toggle(&pair) {
            let source = Arc::clone(&self.source);
            let events_tx = self.events_tx.clone();
            tokio::spawn(async move {
                let outcome = source.fetch_detail(&pair).await;
                let _ = events_tx.send(WatchEvent::DetailResolved {
                    request: id,
                    outcome,
                });
            });
        }
    }

    /// Stop background polling. Called on teardown.
    pub fn shutdown(&mut self) {
        self.poller.stop();
    }
}
