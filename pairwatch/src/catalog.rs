//! Catalog store: the full list of tradable pairs plus the option lists derived from it.

use crate::pair::TradingPair;
use itertools::Itertools;

/// Every tradable pair known to the client, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pairs: Vec<TradingPair>,
    quote_assets: Vec<String>,
    statuses: Vec<String>,
}

impl Catalog {
    pub fn new(pairs: Vec<TradingPair>) -> Self {
        let quote_assets = pairs
            .iter()
            .map(|pair| pair.quote_asset.clone())
            .unique()
            .collect();
        let statuses = pairs
            .iter()
            .map(|pair| pair.status.clone())
            .unique()
            .collect();

        Self {
            pairs,
            quote_assets,
            statuses,
        }
    }

    pub fn pairs(&self) -> &[TradingPair] {
        &self.pairs
    }

    /// Distinct quote assets in first-seen catalog order.
    pub fn quote_assets(&self) -> &[String] {
        &self.quote_assets
    }

    /// Distinct statuses in first-seen catalog order.
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_derives_distinct_options_in_first_seen_order() {
        let catalog = Catalog::new(vec![
            TradingPair::new("BTCUSDT", "TRADING", "BTC", "USDT"),
            TradingPair::new("ETHBTC", "BREAK", "ETH", "BTC"),
            TradingPair::new("ETHUSDT", "TRADING", "ETH", "USDT"),
            TradingPair::new("BNBETH", "HALT", "BNB", "ETH"),
        ]);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.quote_assets(), ["USDT", "BTC", "ETH"]);
        assert_eq!(catalog.statuses(), ["TRADING", "BREAK", "HALT"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.quote_assets().is_empty());
        assert!(catalog.statuses().is_empty());
    }
}
