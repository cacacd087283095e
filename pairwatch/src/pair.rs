use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;

/// Placeholder shown for any value that has not been populated yet.
pub const LOADING: &str = "Loading...";

/// Exchange-unique trading pair identifier (eg/ "BTCUSDT").
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct PairId(SmolStr);

impl PairId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for PairId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for PairId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Tradable pair as listed by the exchange catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    #[serde(rename = "symbol")]
    pub id: PairId,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl TradingPair {
    pub fn new(
        id: impl Into<PairId>,
        status: impl Into<String>,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
        }
    }
}

/// Latest price for one pair. The price is passed through verbatim, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceQuote {
    #[serde(rename = "symbol")]
    pub pair: PairId,
    pub price: String,
}

impl PriceQuote {
    pub fn new(pair: impl Into<PairId>, price: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            price: price.into(),
        }
    }
}

/// Rolling 24 hour statistics for one pair, all values verbatim from the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    #[serde(rename = "symbol")]
    pub pair: PairId,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub bid_price: String,
    #[serde(default)]
    pub ask_price: String,
    #[serde(default)]
    pub high_price: String,
    #[serde(default)]
    pub low_price: String,
}

impl DetailRecord {
    /// Labelled fields in display order, with [`LOADING`] substituted for empty values.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("Volume", display_or_loading(&self.volume)),
            ("Bid Price", display_or_loading(&self.bid_price)),
            ("Ask Price", display_or_loading(&self.ask_price)),
            ("High Price", display_or_loading(&self.high_price)),
            ("Low Price", display_or_loading(&self.low_price)),
        ]
    }
}

/// Return `value`, or [`LOADING`] if it is empty.
pub fn display_or_loading(value: &str) -> &str {
    if value.is_empty() { LOADING } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_de_trading_pair_ignores_extra_fields() {
        let input = r#"
            {
                "symbol": "ETHBTC",
                "status": "TRADING",
                "baseAsset": "ETH",
                "baseAssetPrecision": 8,
                "quoteAsset": "BTC",
                "quotePrecision": 8,
                "orderTypes": ["LIMIT", "MARKET"],
                "isSpotTradingAllowed": true
            }
        "#;

        let actual = serde_json::from_str::<TradingPair>(input).unwrap();
        assert_eq!(actual, TradingPair::new("ETHBTC", "TRADING", "ETH", "BTC"));
    }

    #[test]
    fn test_de_detail_record_keeps_strings_verbatim() {
        let input = r#"
            {
                "symbol": "BTCUSDT",
                "priceChange": "-94.99999800",
                "lastPrice": "50000.00000000",
                "bidPrice": "49999.99000000",
                "askPrice": "50000.00000000",
                "highPrice": "51000.10000000",
                "lowPrice": "48000.00000000",
                "volume": "12345.67800000"
            }
        "#;

        let actual = serde_json::from_str::<DetailRecord>(input).unwrap();
        assert_eq!(actual.pair.as_str(), "BTCUSDT");
        assert_eq!(actual.volume, "12345.67800000");
        assert_eq!(actual.bid_price, "49999.99000000");
        assert_eq!(actual.ask_price, "50000.00000000");
        assert_eq!(actual.high_price, "51000.10000000");
        assert_eq!(actual.low_price, "48000.00000000");
    }

    #[test]
    fn test_detail_fields_fall_back_to_loading() {
        let record = DetailRecord {
            pair: PairId::from("BTCUSDT"),
            volume: "10.5".to_string(),
            ..Default::default()
        };

        let fields = record.fields();
        assert_eq!(fields[0], ("Volume", "10.5"));
        assert_eq!(fields[1], ("Bid Price", LOADING));
        assert_eq!(fields[4], ("Low Price", LOADING));
    }

    #[test]
    fn test_pair_id_borrows_as_str() {
        let mut set = std::collections::HashSet::new();
        set.insert(PairId::from("BTCUSDT"));
        assert!(set.contains("BTCUSDT"));
        assert!(!set.contains("ETHBTC"));
    }
}
