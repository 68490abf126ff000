//! Position allocation for feed ordering.
//!
//! Positions are plain `f64` sort keys. Appends seed from the wall clock;
//! interleaves bisect the gap after the viewer's read position. Repeated
//! midpoint bisection of the same gap eventually exhausts float precision;
//! realistic feeds hydrate in small batches anchored at a moving read
//! position, which keeps bisection depth far below that ceiling (see
//! DESIGN.md).

/// Stateless position calculator.
pub struct PositionAllocator;

impl PositionAllocator {
    /// Positions for appending `count` items past the end of the feed.
    ///
    /// Seeded from the current wall-clock milliseconds plus an index
    /// offset. Timestamps are coarse and clocks can run behind, so the
    /// base is bumped past the current maximum rather than ever reusing a
    /// position already present in the feed.
    pub fn append(existing_max: Option<f64>, now_ms: i64, count: usize) -> Vec<f64> {
        let mut base = now_ms as f64;
        if let Some(max) = existing_max {
            if base <= max {
                base = max + 1.0;
            }
        }
        (0..count).map(|i| base + i as f64).collect()
    }

    /// Positions for interleaving `count` items after the viewer's
    /// last-seen position.
    ///
    /// With a successor present, items start at the midpoint of the gap
    /// and fan out by a 1/1000th-of-the-gap increment, so batch members
    /// stay strictly ordered among themselves without crowding the
    /// midpoint of the remaining half-gap. Without a successor the batch
    /// degenerates to an append after the last-seen position.
    pub fn interleave(last_seen: f64, next: Option<f64>, count: usize) -> Vec<f64> {
        match next {
            Some(next) => {
                let midpoint = (last_seen + next) / 2.0;
                let step = (next - last_seen) / 1000.0;
                (0..count).map(|i| midpoint + i as f64 * step).collect()
            }
            None => (0..count).map(|i| last_seen + 1.0 + i as f64).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_strictly_increasing() {
        let positions = PositionAllocator::append(None, 1_760_000_000_000, 4);
        assert_eq!(positions.len(), 4);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(positions[0], 1_760_000_000_000.0);
    }

    #[test]
    fn append_never_reuses_an_existing_position() {
        // Clock behind the feed's max: the batch must land past it.
        let positions = PositionAllocator::append(Some(2_000_000_000_000.0), 1_000, 3);
        assert!(positions[0] > 2_000_000_000_000.0);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn interleave_lands_strictly_between_neighbors() {
        let positions = PositionAllocator::interleave(10.0, Some(20.0), 2);
        assert_eq!(positions.len(), 2);
        for &p in &positions {
            assert!(p > 10.0 && p < 20.0);
        }
        assert!(positions[0] < positions[1]);
    }

    #[test]
    fn interleave_without_successor_appends_past_last_seen() {
        let positions = PositionAllocator::interleave(42.0, None, 3);
        assert_eq!(positions, vec![43.0, 44.0, 45.0]);
    }

    #[test]
    fn repeated_bisection_stays_ordered_at_realistic_depth() {
        // A batch of 8 interleaved into the same gap, re-anchored at the
        // first new item each round, for many more rounds than a session
        // would produce.
        let mut lower = 1_000.0_f64;
        let upper = 2_000.0_f64;
        for _ in 0..40 {
            let batch = PositionAllocator::interleave(lower, Some(upper), 8);
            assert!(batch.windows(2).all(|w| w[0] < w[1]));
            assert!(batch[0] > lower);
            assert!(*batch.last().unwrap() < upper);
            lower = batch[0];
        }
    }
}
