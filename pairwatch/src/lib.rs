//! # Pairwatch
//! Browse the trading pair catalog of a market-data service, narrow it with text and categorical
//! filters, pin favorites and watch their prices refresh on a fixed interval.
//!
//! The [`Watcher`] is the explicit application state. It owns:
//! - [`Catalog`]: every tradable pair plus the distinct quote assets and statuses.
//! - [`PairFilter`]: free-text, quote asset and status predicates.
//! - [`FavoritesSet`]: ordered, duplicate-free pinned pairs.
//! - [`PricePoller`]: polls prices for the favorites while any exist.
//! - [`DetailPanel`]: single-slot 24 hour statistics view, toggled by swipe gestures.
//!
//! Network access goes through the [`MarketDataSource`] trait, implemented for the Binance spot
//! REST API by [`BinanceRestClient`].

/// All [`Error`](std::error::Error)s generated in Pairwatch.
pub mod error;

/// Pair identifiers and the records the market-data service returns.
pub mod pair;

pub mod catalog;
pub mod filter;
pub mod favorites;
pub mod poller;
pub mod gesture;
pub mod detail;

/// Abstract market-data service contract.
pub mod source;

pub mod binance;
pub mod watcher;

pub use binance::{BinanceConfig, BinanceRestClient};
pub use catalog::Catalog;
pub use detail::{DetailPanel, PanelState};
pub use error::ClientError;
pub use favorites::FavoritesSet;
pub use filter::PairFilter;
pub use gesture::{Gesture, GestureDetector, Point};
pub use pair::{DetailRecord, LOADING, PairId, PriceQuote, TradingPair};
pub use poller::{POLL_INTERVAL, PollerState, PriceBoard, PricePoller};
pub use source::MarketDataSource;
pub use watcher::{WatchEvent, WatchEvents, Watcher, WatcherConfig};
