use crate::pair::PairId;
use indexmap::IndexSet;

/// Ordered set of pinned pairs. Iteration order is first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    pairs: IndexSet<PairId>,
}

impl FavoritesSet {
    /// Append `pair` if absent. Returns `false` if it was already a favorite.
    pub fn add(&mut self, pair: PairId) -> bool {
        self.pairs.insert(pair)
    }

    /// Remove `pair` if present, preserving the order of the remaining favorites.
    pub fn remove(&mut self, pair: &str) -> bool {
        self.pairs.shift_remove(pair)
    }

    pub fn contains(&self, pair: &str) -> bool {
        self.pairs.contains(pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairId> {
        self.pairs.iter()
    }

    /// Stored identifier equal to `pair`, if it is a favorite.
    pub fn get(&self, pair: &str) -> Option<&PairId> {
        self.pairs.get(pair)
    }

    pub fn get_index(&self, index: usize) -> Option<&PairId> {
        self.pairs.get_index(index)
    }

    /// Owned copy of the current membership, in order.
    pub fn snapshot(&self) -> Vec<PairId> {
        self.pairs.iter().cloned().collect()
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

    enum Op {
        Add(&'static str),
        Remove(&'static str),
    }

    #[test]
    fn test_add_remove_sequences() {
        struct TestCase {
            ops: Vec<Op>,
            expected: Vec<&'static str>,
        }

        let tests = vec![
            TestCase {
                // TC0: insertion order
                ops: vec![Op::Add("BTCUSDT"), Op::Add("ETHBTC"), Op::Add("BNBUSDT")],
                expected: vec!["BTCUSDT", "ETHBTC", "BNBUSDT"],
            },
            TestCase {
                // TC1: duplicate add is a no-op and keeps first position
                ops: vec![Op::Add("BTCUSDT"), Op::Add("ETHBTC"), Op::Add("BTCUSDT")],
                expected: vec!["BTCUSDT", "ETHBTC"],
            },
            TestCase {
                // TC2: removing an absent pair is a no-op
                ops: vec![Op::Add("BTCUSDT"), Op::Remove("ETHBTC")],
                expected: vec!["BTCUSDT"],
            },
            TestCase {
                // TC3: removal from the middle keeps relative order
                ops: vec![
                    Op::Add("A"),
                    Op::Add("B"),
                    Op::Add("C"),
                    Op::Remove("B"),
                    Op::Add("D"),
                ],
                expected: vec!["A", "C", "D"],
            },
            TestCase {
                // TC4: re-adding after removal appends at the end
                ops: vec![Op::Add("A"), Op::Add("B"), Op::Remove("A"), Op::Add("A")],
                expected: vec!["B", "A"],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let mut favorites = FavoritesSet::default();
            for op in test.ops {
                match op {
                    Op::Add(pair) => {
                        favorites.add(PairId::from(pair));
                    }
                    Op::Remove(pair) => {
                        favorites.remove(pair);
                    }
                }
            }

            let actual: Vec<_> = favorites.iter().map(PairId::as_str).collect();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_add_remove_report_membership_change() {
        let mut favorites = FavoritesSet::default();

        assert!(favorites.add(PairId::from("BTCUSDT")));
        assert!(!favorites.add(PairId::from("BTCUSDT")));
        assert!(favorites.remove("BTCUSDT"));
        assert!(!favorites.remove("BTCUSDT"));
        assert!(favorites.is_empty());
    }
}
