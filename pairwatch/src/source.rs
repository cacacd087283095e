use crate::{
    error::ClientError,
    pair::{DetailRecord, PairId, PriceQuote, TradingPair},
};
use async_trait::async_trait;

/// Remote market-data service consumed by the [`Watcher`](crate::watcher::Watcher).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Full list of tradable pairs. Called once at startup.
    async fn fetch_catalog(&self) -> Result<Vec<TradingPair>, ClientError>;

    /// Latest price of every pair in `pairs`, in one batched request.
    async fn fetch_prices(&self, pairs: &[PairId]) -> Result<Vec<PriceQuote>, ClientError>;

    /// Rolling 24 hour statistics for `pair`.
    async fn fetch_detail(&self, pair: &PairId) -> Result<DetailRecord, ClientError>;
}
