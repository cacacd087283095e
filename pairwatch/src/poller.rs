//! Price poller: a recurring batched price refresh that runs whenever favorites exist.
//!
//! The poller is `Idle` while the favorites set is empty and `Polling` otherwise. Entering
//! `Polling` spawns a ticker task that emits [`WatchEvent::PollTick`] every period; leaving it
//! aborts that task. Each armed ticker carries an epoch so that ticks and responses issued under
//! an earlier arming can be told apart from current ones.

use crate::{
    pair::{LOADING, PriceQuote},
    watcher::WatchEvent,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

/// Fixed period between poll ticks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

#[derive(Debug)]
pub struct PricePoller {
    interval: Duration,
    epoch: u64,
    ticker: Option<JoinHandle<()>>,
}

impl PricePoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            epoch: 0,
            ticker: None,
        }
    }

    pub fn state(&self) -> PollerState {
        if self.ticker.is_some() {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    /// Epoch of the currently armed ticker.
    pub fn epoch(&self) -> Option<u64> {
        self.ticker.as_ref().map(|_| self.epoch)
    }

    /// Determine if a tick or response issued under `epoch` belongs to the armed ticker.
    pub fn accepts(&self, epoch: u64) -> bool {
        self.epoch() == Some(epoch)
    }

    /// Follow the favorites membership: arm on the transition into non-empty, disarm on the
    /// transition into empty. Membership changes while already polling leave the ticker's
    /// phase untouched.
    pub fn sync(&mut self, has_favorites: bool, events: &mpsc::UnboundedSender<WatchEvent>) {
        match (self.state(), has_favorites) {
            (PollerState::Idle, true) => self.arm(events),
            (PollerState::Polling, false) => self.stop(),
            _ => {}
        }
    }

    fn arm(&mut self, events: &mpsc::UnboundedSender<WatchEvent>) {
        self.epoch += 1;
        debug!(epoch = self.epoch, interval = ?self.interval, "price poller polling");
        self.ticker = Some(spawn_ticker(self.interval, self.epoch, events.clone()));
    }

    /// Cancel the ticker. No further ticks are produced for the current epoch.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            debug!(epoch = self.epoch, "price poller idle");
        }
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_ticker(
    period: Duration,
    epoch: u64,
    events: mpsc::UnboundedSender<WatchEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick fires one full period after arming
        let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            if events.send(WatchEvent::PollTick { epoch }).is_err() {
                debug!(epoch, "watcher dropped, stopping price ticker");
                break;
            }
        }
    })
}

/// Latest price snapshot. Every successful poll replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBoard {
    quotes: Vec<PriceQuote>,
    updated_at: Option<DateTime<Utc>>,
}

impl PriceBoard {
    pub fn replace(&mut self, quotes: Vec<PriceQuote>, at: DateTime<Utc>) {
        self.quotes = quotes;
        self.updated_at = Some(at);
    }

    pub fn quotes(&self) -> &[PriceQuote] {
        &self.quotes
    }

    pub fn price(&self, pair: &str) -> Option<&str> {
        self.quotes
            .iter()
            .find(|quote| quote.pair.as_str() == pair)
            .map(|quote| quote.price.as_str())
    }

    /// Display value for `pair`: the verbatim price, or [`LOADING`] if none is known yet.
    pub fn label(&self, pair: &str) -> &str {
        match self.price(pair) {
            Some(price) if !price.is_empty() => price,
            _ => LOADING,
        }
    }

    /// Time of the last successful poll.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_board_label() {
        struct TestCase {
            pair: &'static str,
            expected: &'static str,
        }

        let mut board = PriceBoard::default();
        board.replace(
            vec![
                PriceQuote::new("BTCUSDT", "50000.00"),
                PriceQuote::new("ETHBTC", ""),
            ],
            Utc::now(),
        );

        let tests = vec![
            TestCase {
                // TC0: known price passed through verbatim
                pair: "BTCUSDT",
                expected: "50000.00",
            },
            TestCase {
                // TC1: empty price treated as not yet populated
                pair: "ETHBTC",
                expected: LOADING,
            },
            TestCase {
                // TC2: absent pair
                pair: "BNBUSDT",
                expected: LOADING,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(board.label(test.pair), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_price_board_replace_is_wholesale() {
        let mut board = PriceBoard::default();
        board.replace(vec![PriceQuote::new("BTCUSDT", "1")], Utc::now());
        board.replace(vec![PriceQuote::new("ETHBTC", "2")], Utc::now());

        assert_eq!(board.price("BTCUSDT"), None);
        assert_eq!(board.price("ETHBTC"), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_transitions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = PricePoller::new(POLL_INTERVAL);
        assert_eq!(poller.state(), PollerState::Idle);

        poller.sync(true, &tx);
        assert_eq!(poller.state(), PollerState::Polling);
        let first = poller.epoch().unwrap();

        // Staying non-empty does not re-arm
        poller.sync(true, &tx);
        assert_eq!(poller.epoch(), Some(first));

        tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(1)).await;
        match rx.try_recv() {
            Ok(WatchEvent::PollTick { epoch }) => assert_eq!(epoch, first),
            other => panic!("expected PollTick, got {:?}", other),
        }

        poller.sync(false, &tx);
        assert_eq!(poller.state(), PollerState::Idle);
        assert!(!poller.accepts(first));

        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert!(rx.try_recv().is_err());

        // Re-arming starts a new epoch
        poller.sync(true, &tx);
        assert!(poller.accepts(first + 1));
    }
}
