//! Filter engine combining free-text, quote asset and status predicates.

use crate::{catalog::Catalog, pair::TradingPair};
use indexmap::IndexSet;

/// Current filter inputs. An empty selection for a category places no constraint on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairFilter {
    text: String,
    quote_assets: IndexSet<String>,
    statuses: IndexSet<String>,
}

impl PairFilter {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the free-text query, matched case-insensitively against the pair identifier.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn quote_assets(&self) -> &IndexSet<String> {
        &self.quote_assets
    }

    pub fn statuses(&self) -> &IndexSet<String> {
        &self.statuses
    }

    /// Select `asset` if unselected, deselect it otherwise. Returns whether it is now selected.
    pub fn toggle_quote_asset(&mut self, asset: &str) -> bool {
        toggle(&mut self.quote_assets, asset)
    }

    /// Select `status` if unselected, deselect it otherwise. Returns whether it is now selected.
    pub fn toggle_status(&mut self, status: &str) -> bool {
        toggle(&mut self.statuses, status)
    }

    fn matches_with(&self, needle: &str, pair: &TradingPair) -> bool {
        (needle.is_empty() || pair.id.as_str().to_lowercase().contains(needle))
            && (self.quote_assets.is_empty() || self.quote_assets.contains(&pair.quote_asset))
            && (self.statuses.is_empty() || self.statuses.contains(&pair.status))
    }

    /// Visible subset of the catalog, in catalog order.
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a TradingPair> {
        let needle = self.text.to_lowercase();
        catalog
            .pairs()
            .iter()
            .filter(|pair| self.matches_with(&needle, pair))
            .collect()
    }
}

fn toggle(selection: &mut IndexSet<String>, value: &str) -> bool {
    if selection.shift_remove(value) {
        false
    } else {
        selection.insert(value.to_string());
        true
    }
}
