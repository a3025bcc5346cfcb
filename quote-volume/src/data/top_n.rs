//! Bounded ranking of the highest-volume contracts.

use std::slice;

use super::types::OptionRecord;

/// Number of contracts kept per side for a trading day.
pub const TOP_CONTRACTS: usize = 5;

/// Keeps the `capacity` highest-volume records seen so far, ascending by
/// amount.
///
/// Index 0 is always the smallest retained record and the next eviction
/// candidate. Ties keep the earlier-considered record lower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopVolumes {
    capacity: usize,
    records: Vec<OptionRecord>,
}

impl Default for TopVolumes {
    fn default() -> Self {
        Self::new()
    }
}

impl TopVolumes {
    /// Tracker holding the top five contracts.
    pub fn new() -> Self {
        Self::with_capacity(TOP_CONTRACTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::with_capacity(capacity),
        }
    }

    /// Offer a record to the ranking.
    ///
    /// Returns `true` if the record was retained.
    pub fn consider(&mut self, record: OptionRecord) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if self.records.len() == self.capacity {
            if !self.min_amount().is_some_and(|min| record.amount() > min) {
                return false;
            }
            self.records.remove(0);
        }

        // Insert after every record with an equal or smaller amount so older
        // records stay lower on ties.
        let idx = self
            .records
            .partition_point(|held| held.amount() <= record.amount());
        self.records.insert(idx, record);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest retained amount, if any.
    pub fn min_amount(&self) -> Option<u64> {
        self.records.first().map(OptionRecord::amount)
    }

    pub fn as_slice(&self) -> &[OptionRecord] {
        &self.records
    }

    pub fn iter(&self) -> slice::Iter<'_, OptionRecord> {
        self.records.iter()
    }

    pub fn into_vec(self) -> Vec<OptionRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a TopVolumes {
    type Item = &'a OptionRecord;
    type IntoIter = slice::Iter<'a, OptionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(top: &TopVolumes) -> Vec<u64> {
        top.iter().map(OptionRecord::amount).collect()
    }

    fn names(top: &TopVolumes) -> Vec<&str> {
        top.iter().map(OptionRecord::name).collect()
    }

    #[test]
    fn test_keeps_five_largest() {
        let mut top = TopVolumes::new();
        for (i, amount) in [3, 1, 4, 1, 5, 9, 2, 6].into_iter().enumerate() {
            top.consider(OptionRecord::new(format!("opt{}", i), amount));
        }
        assert_eq!(amounts(&top), vec![3, 4, 5, 6, 9]);
        assert_eq!(top.min_amount(), Some(3));
    }

    #[test]
    fn test_fewer_than_capacity() {
        let mut top = TopVolumes::new();
        top.consider(OptionRecord::new("a", 10));
        top.consider(OptionRecord::new("b", 2));
        assert_eq!(top.len(), 2);
        assert_eq!(amounts(&top), vec![2, 10]);
    }

    #[test]
    fn test_equal_to_minimum_is_rejected() {
        let mut top = TopVolumes::with_capacity(2);
        assert!(top.consider(OptionRecord::new("a", 5)));
        assert!(top.consider(OptionRecord::new("b", 7)));
        assert!(!top.consider(OptionRecord::new("c", 5)));
        assert_eq!(names(&top), vec!["a", "b"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut top = TopVolumes::with_capacity(3);
        top.consider(OptionRecord::new("first", 4));
        top.consider(OptionRecord::new("second", 4));
        top.consider(OptionRecord::new("third", 1));
        assert_eq!(names(&top), vec!["third", "first", "second"]);

        // Replacing the minimum with a tied amount still lands after the
        // older records.
        top.consider(OptionRecord::new("fourth", 4));
        assert_eq!(names(&top), vec!["first", "second", "fourth"]);
    }

    #[test]
    fn test_bounded_and_sorted_for_many_sequences() {
        // Deterministic pseudo-random amounts (LCG) across several seeds.
        for seed in 1u64..40 {
            let mut state = seed;
            let mut top = TopVolumes::new();
            let mut seen = Vec::new();
            for i in 0..60 {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let amount = (state >> 33) % 50;
                seen.push(amount);
                top.consider(OptionRecord::new(format!("o{}", i), amount));

                assert!(top.len() <= TOP_CONTRACTS);
                let held = amounts(&top);
                assert!(held.windows(2).all(|w| w[0] <= w[1]));
            }

            let mut expected = seen.clone();
            expected.sort_unstable();
            let expected = expected[expected.len() - TOP_CONTRACTS..].to_vec();
            assert_eq!(amounts(&top), expected);
        }
    }

    #[test]
    fn test_zero_capacity() {
        let mut top = TopVolumes::with_capacity(0);
        assert!(!top.consider(OptionRecord::new("a", 1)));
        assert!(top.is_empty());
    }
}
