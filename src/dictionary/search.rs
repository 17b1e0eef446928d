//! Predecessor search over sorted sequences.
//!
//! The dictionary never asks "is this word present?", it asks "where would
//! this word sit?". [`predecessor`] answers that with the index of the
//! rightmost element that is not greater than the key, so a reader browsing
//! near a misspelled or partial word still lands on a neighbouring entry.

use std::cmp::Ordering;

/// Find the highest index `i` such that `key_cmp(i)` reports the element at
/// `i` is less than or equal to the key.
///
/// `key_cmp(i)` must return the ordering of the *key* relative to element
/// `i`; elements `0..len` must be sorted ascending (duplicates allowed).
/// Returns `None` when every element is greater than the key or `len == 0`.
///
/// The search keeps `low` on an element known to be `<= key` (or on the
/// virtual position `-1`) and shrinks `high` until both meet.
pub fn predecessor_by<F>(len: usize, mut key_cmp: F) -> Option<usize>
where
    F: FnMut(usize) -> Ordering,
{
    let mut low: isize = -1;
    let mut high: isize = len as isize - 1;

    while low < high {
        // Rounds up, so mid > low and the loop always makes progress.
        let mid = low + (high - low + 1) / 2;

        if key_cmp(mid as usize) == Ordering::Less {
            high = mid - 1;
        } else {
            low = mid;
        }
    }

    usize::try_from(low).ok()
}

/// Find the rightmost element of `sorted` that is `<= key`.
///
/// Behaviour on an unsorted slice is unspecified but never panics.
///
/// # Examples
///
/// ```
/// use minidic::dictionary::search::predecessor;
///
/// let words = ["apple", "banana", "cherry"];
/// assert_eq!(predecessor(&words, &"blueberry"), Some(1));
/// assert_eq!(predecessor(&words, &"aardvark"), None);
/// assert_eq!(predecessor(&words, &"zucchini"), Some(2));
/// ```
pub fn predecessor<T: Ord>(sorted: &[T], key: &T) -> Option<usize> {
    predecessor_by(sorted.len(), |i| key.cmp(&sorted[i]))
}

/// Signed form of [`predecessor`], returning `-1` when there is no
/// predecessor.
pub fn insertion_point<T: Ord>(sorted: &[T], key: &T) -> isize {
    predecessor(sorted, key).map_or(-1, |i| i as isize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_sequence() {
        let empty: [&str; 0] = [];
        assert_eq!(predecessor(&empty, &"anything"), None);
        assert_eq!(insertion_point(&empty, &""), -1);
    }

    #[test]
    fn test_single_element() {
        assert_eq!(predecessor(&[5], &4), None);
        assert_eq!(predecessor(&[5], &5), Some(0));
        assert_eq!(predecessor(&[5], &6), Some(0));
    }

    #[test]
    fn test_boundaries() {
        let words = ["apple", "banana", "cherry"];

        assert_eq!(insertion_point(&words, &"aardvark"), -1);
        assert_eq!(predecessor(&words, &"apple"), Some(0));
        assert_eq!(predecessor(&words, &"blueberry"), Some(1));
        assert_eq!(predecessor(&words, &"cherry"), Some(2));
        assert_eq!(predecessor(&words, &"zebra"), Some(2));
    }

    #[test]
    fn test_duplicates_return_last_occurrence() {
        let values = [1, 2, 2, 2, 3, 3, 7];

        assert_eq!(predecessor(&values, &2), Some(3));
        assert_eq!(predecessor(&values, &3), Some(5));
        assert_eq!(predecessor(&values, &5), Some(5));
        assert_eq!(predecessor(&[4, 4, 4], &4), Some(2));
    }

    #[test]
    fn test_ordinal_string_comparison() {
        // Uppercase sorts before lowercase in ordinal order.
        let words = ["Zeta", "alpha", "beta"];
        assert_eq!(predecessor(&words, &"a"), Some(0));
        assert_eq!(predecessor(&words, &"alpha"), Some(1));
    }

    #[test]
    fn test_predecessor_property_randomized() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..500 {
            let len = rng.random_range(0..40);
            let mut values: Vec<i32> = (0..len).map(|_| rng.random_range(0..20)).collect();
            values.sort();

            for key in -2..23 {
                let found = predecessor(&values, &key);
                match found {
                    Some(i) => {
                        assert!(values[i] <= key);
                        if i + 1 < values.len() {
                            assert!(values[i + 1] > key);
                        }
                    }
                    None => {
                        assert!(values.first().is_none_or(|first| *first > key));
                    }
                }
                assert_eq!(found, predecessor(&values, &key));
            }
        }
    }

    #[test]
    fn test_predecessor_by_counts_comparisons() {
        let values: Vec<u32> = (0..1024).collect();
        let mut comparisons = 0;

        let found = predecessor_by(values.len(), |i| {
            comparisons += 1;
            700u32.cmp(&values[i])
        });

        assert_eq!(found, Some(700));
        assert!(comparisons <= 11);
    }
}
