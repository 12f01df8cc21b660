use derive_deref::{Deref, DerefMut};

#[derive(Debug, PartialEq)]
pub enum IntervalError {
    InvalidBounds { lo: i64, hi: i64 },
}

/// A closed integer interval. `lo <= hi` always holds, so an `Interval` is never empty.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Interval {
    pub lo: i64,
    pub hi: i64,
}

impl Interval {
    pub fn try_new(lo: i64, hi: i64) -> Result<Self, IntervalError> {
        if lo <= hi {
            Ok(Self { lo, hi })
        } else {
            Err(IntervalError::InvalidBounds { lo, hi })
        }
    }

    #[inline]
    pub const fn len(self) -> u64 {
        (self.hi - self.lo) as u64 + 1_u64
    }

    #[inline]
    pub const fn contains(self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Whether `self` and `other` overlap or abut. Abutting intervals (gap of width 0) merge into
    /// one contiguous interval.
    #[inline]
    pub const fn touches(self, other: Self) -> bool {
        self.lo <= other.hi + 1_i64 && other.lo <= self.hi + 1_i64
    }
}

/// A set of intervals kept sorted, pairwise disjoint, and non-abutting.
#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, PartialEq)]
pub struct Intervals(Vec<Interval>);

impl Intervals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `interval`, coalescing it with any existing intervals it touches.
    pub fn insert(&mut self, interval: Interval) {
        let start: usize = self
            .0
            .partition_point(|existing| existing.hi + 1_i64 < interval.lo);
        let end: usize = self
            .0
            .partition_point(|existing| existing.lo <= interval.hi + 1_i64);

        if start == end {
            self.0.insert(start, interval);
        } else {
            self.0[start] = Interval {
                lo: interval.lo.min(self.0[start].lo),
                hi: interval.hi.max(self.0[end - 1_usize].hi),
            };
            self.0.drain(start + 1_usize..end);
        }
    }

    /// The total count of integers covered by the set.
    pub fn covered_len(&self) -> u64 {
        self.0.iter().map(|interval| interval.len()).sum()
    }

    /// If exactly one integer within `bounds` is uncovered, returns it. Returns `None` when
    /// `bounds` is fully covered or more than one position is uncovered.
    pub fn find_single_gap(&self, bounds: Interval) -> Option<i64> {
        let mut gap: Option<i64> = None;
        let mut cursor: i64 = bounds.lo;

        for interval in self.0.iter() {
            if interval.lo > bounds.hi {
                break;
            }

            if interval.hi < cursor {
                continue;
            }

            if interval.lo > cursor {
                if interval.lo - cursor > 1_i64 || gap.is_some() {
                    return None;
                }

                gap = Some(cursor);
            }

            cursor = cursor.max(interval.hi + 1_i64);

            if cursor > bounds.hi {
                break;
            }
        }

        match (bounds.hi - cursor + 1_i64, gap) {
            (trailing, gap) if trailing <= 0_i64 => gap,
            (1_i64, None) => Some(cursor),
            _ => None,
        }
    }
}

/// Batch merge: sorts the bounds pairs and sweeps once, merging any pair within
/// `next.lo <= running.hi + 1`. Produces the same set as inserting the pairs one at a time in any
/// order.
pub fn merge_intervals<I: IntoIterator<Item = (i64, i64)>>(
    interval_bounds: I,
) -> Result<Intervals, IntervalError> {
    let mut intervals: Vec<Interval> = interval_bounds
        .into_iter()
        .map(|(lo, hi)| Interval::try_new(lo, hi))
        .collect::<Result<Vec<Interval>, IntervalError>>()?;

    intervals.sort();

    let mut merged: Intervals = Intervals::new();

    for interval in intervals {
        match merged.0.last_mut() {
            Some(running) if interval.lo <= running.hi + 1_i64 => {
                running.hi = running.hi.max(interval.hi);
            }
            _ => merged.0.push(interval),
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng},
        std::collections::BTreeSet,
    };

    fn interval(lo: i64, hi: i64) -> Interval {
        Interval::try_new(lo, hi).unwrap()
    }

    #[test]
    fn test_interval_try_new() {
        assert_eq!(interval(-2_i64, 3_i64).len(), 6_u64);
        assert_eq!(
            Interval::try_new(4_i64, 3_i64),
            Err(IntervalError::InvalidBounds { lo: 4_i64, hi: 3_i64 })
        );
    }

    #[test]
    fn test_merge_intervals_coalesces_overlap_and_adjacency() {
        // [1,3] and [5,6] merge once [4,4] bridges the gap between them.
        assert_eq!(
            merge_intervals([(1_i64, 3_i64), (5_i64, 6_i64), (4_i64, 4_i64)]).unwrap(),
            merge_intervals([(1_i64, 6_i64)]).unwrap()
        );
        // A gap of one position keeps intervals separate.
        assert_eq!(
            merge_intervals([(1_i64, 2_i64), (4_i64, 5_i64)])
                .unwrap()
                .len(),
            2_usize
        );
        assert_eq!(
            merge_intervals([(1_i64, 2_i64), (0_i64, -1_i64)]),
            Err(IntervalError::InvalidBounds { lo: 0_i64, hi: -1_i64 })
        );
    }

    #[test]
    fn test_insert_matches_batch_merge() {
        let mut rng: SmallRng = SmallRng::seed_from_u64(0x1117_u64);

        for _ in 0_usize..64_usize {
            let mut bounds: Vec<(i64, i64)> = (0_usize..rng.gen_range(1_usize..12_usize))
                .map(|_| {
                    let lo: i64 = rng.gen_range(-20_i64..20_i64);

                    (lo, lo + rng.gen_range(0_i64..8_i64))
                })
                .collect();
            let batch: Intervals = merge_intervals(bounds.iter().copied()).unwrap();

            // Permutation independence for the batch merge.
            bounds.shuffle(&mut rng);
            assert_eq!(merge_intervals(bounds.iter().copied()).unwrap(), batch);

            // Incremental insertion agrees with the batch merge.
            let mut incremental: Intervals = Intervals::new();

            for (lo, hi) in bounds.iter().copied() {
                incremental.insert(interval(lo, hi));
            }

            assert_eq!(incremental, batch);

            // The merged set is sorted and pairwise non-touching.
            for window in batch.windows(2_usize) {
                assert!(!window[0_usize].touches(window[1_usize]));
            }

            // Idempotence: re-merging the merged set is a no-op.
            assert_eq!(
                merge_intervals(batch.iter().map(|interval| (interval.lo, interval.hi))).unwrap(),
                batch
            );

            // Coverage conservation against a brute-force point set.
            let points: BTreeSet<i64> = bounds
                .iter()
                .flat_map(|&(lo, hi)| lo..=hi)
                .collect();

            assert_eq!(batch.covered_len(), points.len() as u64);

            for point in points {
                assert!(batch.iter().any(|interval| interval.contains(point)));
            }
        }
    }

    #[test]
    fn test_find_single_gap() {
        let bounds: Interval = interval(0_i64, 10_i64);

        assert_eq!(
            merge_intervals([(0_i64, 4_i64), (6_i64, 10_i64)])
                .unwrap()
                .find_single_gap(bounds),
            Some(5_i64)
        );
        // A gap at either boundary of the search window still counts.
        assert_eq!(
            merge_intervals([(1_i64, 10_i64)])
                .unwrap()
                .find_single_gap(bounds),
            Some(0_i64)
        );
        assert_eq!(
            merge_intervals([(0_i64, 9_i64)])
                .unwrap()
                .find_single_gap(bounds),
            Some(10_i64)
        );
        // Full coverage, or more than one uncovered position, is not a single gap.
        assert_eq!(
            merge_intervals([(-3_i64, 12_i64)])
                .unwrap()
                .find_single_gap(bounds),
            None
        );
        assert_eq!(
            merge_intervals([(0_i64, 4_i64), (7_i64, 10_i64)])
                .unwrap()
                .find_single_gap(bounds),
            None
        );
        assert_eq!(
            merge_intervals([(0_i64, 4_i64), (6_i64, 8_i64)])
                .unwrap()
                .find_single_gap(bounds),
            None
        );
    }
}
