pub const DEFAULT_REVIEW_RATIO: u32 = 3;

/// Merges two already-ordered pools, emitting up to `ratio` review items for
/// every fresh item until both run dry. Order within each pool is preserved.
pub fn interleave<T>(reviews: Vec<T>, fresh: Vec<T>, ratio: u32) -> Vec<T> {
    let ratio = ratio.max(1) as usize;
    let mut out = Vec::with_capacity(reviews.len() + fresh.len());
    let mut reviews = reviews.into_iter().peekable();
    let mut fresh = fresh.into_iter().peekable();

    while reviews.peek().is_some() || fresh.peek().is_some() {
        out.extend(reviews.by_ref().take(ratio));
        if let Some(f) = fresh.next() {
            out.push(f);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_to_one() {
        let out = interleave(vec!["d"; 6], vec!["n"; 2], 3);
        assert_eq!(out, vec!["d", "d", "d", "n", "d", "d", "d", "n"]);
    }

    #[test]
    fn leftovers_are_appended() {
        let out = interleave(vec![1, 2], vec![10, 11, 12], 3);
        assert_eq!(out, vec![1, 2, 10, 11, 12]);

        let out = interleave(vec![1, 2, 3, 4, 5], vec![10], 3);
        assert_eq!(out, vec![1, 2, 3, 10, 4, 5]);
    }

    #[test]
    fn zero_ratio_still_drains_reviews() {
        let out = interleave(vec![1, 2], vec![10, 11], 0);
        assert_eq!(out, vec![1, 10, 2, 11]);
    }

    #[test]
    fn empty_pools() {
        assert!(interleave(Vec::<u8>::new(), Vec::new(), 3).is_empty());
    }
}
