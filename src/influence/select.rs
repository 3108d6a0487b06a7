// Influence selection policies.
//
// Both policies consume the same per-position distance vector and differ
// only in how they derive thresholds:
//
//   TopKAdaptive — rank positions by distance, take the top K winners, and
//   derive a local threshold from each winner (distance * (1 - fraction)).
//   A word is influential if it is a winner or clears any winner's
//   threshold. Result is deduplicated by word value.
//
//   GlobalThreshold — one threshold from the maximum distance
//   (max * (1 - fraction)); every position at or above it survives, and
//   duplicate word values survive with it.

use std::collections::HashSet;

/// Default winner count for [`SelectionPolicy::TopKAdaptive`].
pub const DEFAULT_TOP_K: usize = 3;

/// Default threshold fraction for [`SelectionPolicy::TopKAdaptive`].
pub const DEFAULT_TOP_K_FRACTION: f64 = 0.15;

/// Default threshold fraction for [`SelectionPolicy::GlobalThreshold`].
pub const DEFAULT_GLOBAL_FRACTION: f64 = 0.35;

/// Threshold-selection strategy for picking influential words.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionPolicy {
    /// Per-winner adaptive thresholds; deduplicates by word value.
    TopKAdaptive {
        top_k: usize,
        threshold_fraction: f64,
    },
    /// One threshold from the max distance; keeps duplicate word values.
    GlobalThreshold { threshold_fraction: f64 },
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::TopKAdaptive {
            top_k: DEFAULT_TOP_K,
            threshold_fraction: DEFAULT_TOP_K_FRACTION,
        }
    }
}

impl SelectionPolicy {
    /// The global-threshold policy with its default fraction.
    pub fn global() -> Self {
        Self::GlobalThreshold {
            threshold_fraction: DEFAULT_GLOBAL_FRACTION,
        }
    }
}

/// Select influential words from per-position distances.
///
/// `words` and `distances` correspond positionally; if the lengths differ,
/// only the common prefix is considered so a malformed pair can never
/// cause an indexing panic.
pub fn select_influential(
    words: &[String],
    distances: &[f64],
    policy: &SelectionPolicy,
) -> Vec<String> {
    match *policy {
        SelectionPolicy::TopKAdaptive {
            top_k,
            threshold_fraction,
        } => select_top_k_adaptive(words, distances, top_k, threshold_fraction),
        SelectionPolicy::GlobalThreshold { threshold_fraction } => {
            select_global_threshold(words, distances, threshold_fraction)
        }
    }
}

/// Top-K adaptive multi-threshold selection.
///
/// Every winner contributes its own local threshold, so a clear outlier
/// (one huge distance) doesn't drag unrelated words in through a single
/// diluted cutoff, while a flat distance profile still admits near-ties.
fn select_top_k_adaptive(
    words: &[String],
    distances: &[f64],
    top_k: usize,
    threshold_fraction: f64,
) -> Vec<String> {
    let n = words.len().min(distances.len());
    if n == 0 {
        return Vec::new();
    }

    // Rank positions by distance, highest first. Distances are NaN-free by
    // the scorer's fallback, so the comparison never actually falls through.
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| {
        distances[b]
            .partial_cmp(&distances[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let winners = &ranked[..top_k.min(n)];
    let thresholds: Vec<f64> = winners
        .iter()
        .map(|&i| distances[i] * (1.0 - threshold_fraction))
        .collect();

    // A position is influential if it is a winner or clears any winner's
    // local threshold.
    let mut selected: HashSet<usize> = winners.iter().copied().collect();
    for j in 0..n {
        if thresholds.iter().any(|&t| distances[j] >= t) {
            selected.insert(j);
        }
    }

    // Render back as word values: original left-to-right order of first
    // occurrence, duplicates removed by value.
    let selected_values: HashSet<&str> = selected.iter().map(|&j| words[j].as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut influential = Vec::new();
    for word in &words[..n] {
        if selected_values.contains(word.as_str()) && emitted.insert(word.as_str()) {
            influential.push(word.clone());
        }
    }

    influential
}

/// Single global threshold selection.
///
/// A pure positional filter: no dedup, so a prompt with repeated words can
/// report the same value twice.
fn select_global_threshold(
    words: &[String],
    distances: &[f64],
    threshold_fraction: f64,
) -> Vec<String> {
    let n = words.len().min(distances.len());
    if n == 0 {
        return Vec::new();
    }

    let max_distance = distances[..n].iter().fold(f64::NEG_INFINITY, |m, &d| m.max(d));
    let threshold = max_distance * (1.0 - threshold_fraction);

    (0..n)
        .filter(|&j| distances[j] >= threshold)
        .map(|j| words[j].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(prompt: &str) -> Vec<String> {
        prompt.split_whitespace().map(str::to_string).collect()
    }

    // The worked example: prompt "fix the bug now" with distances by position.
    const SCENARIO: [f64; 4] = [0.1, 0.05, 0.9, 0.2];

    #[test]
    fn top_k_adaptive_worked_example() {
        // Winners: bug (0.9), now (0.2), fix (0.1); local thresholds
        // 0.765, 0.17, 0.085. "the" (0.05) clears none of them.
        let policy = SelectionPolicy::default();
        let result = select_influential(&words("fix the bug now"), &SCENARIO, &policy);
        assert_eq!(result, vec!["fix", "bug", "now"]);
    }

    #[test]
    fn global_threshold_worked_example() {
        // max 0.9 * (1 - 0.35) = 0.585; only "bug" clears it.
        let policy = SelectionPolicy::global();
        let result = select_influential(&words("fix the bug now"), &SCENARIO, &policy);
        assert_eq!(result, vec!["bug"]);
    }

    #[test]
    fn top_k_always_includes_the_highest_distance_word() {
        let policy = SelectionPolicy::TopKAdaptive {
            top_k: 1,
            threshold_fraction: 0.0,
        };
        let result = select_influential(&words("a b c d"), &[0.2, 0.1, 0.8, 0.3], &policy);
        assert!(result.contains(&"c".to_string()));
    }

    #[test]
    fn top_k_result_is_a_subset_in_prompt_order() {
        let w = words("alpha beta gamma delta");
        let result = select_influential(&w, &[0.4, 0.1, 0.5, 0.3], &SelectionPolicy::default());
        // Subset of the prompt's words...
        for word in &result {
            assert!(w.contains(word));
        }
        // ...and in original order
        let positions: Vec<usize> = result
            .iter()
            .map(|r| w.iter().position(|x| x == r).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "Result should preserve prompt order");
    }

    #[test]
    fn top_k_deduplicates_repeated_words() {
        // "the" appears twice; both positions clear the thresholds
        let policy = SelectionPolicy::TopKAdaptive {
            top_k: 4,
            threshold_fraction: 0.5,
        };
        let result = select_influential(&words("the cat the dog"), &[0.5, 0.5, 0.5, 0.5], &policy);
        assert_eq!(result, vec!["the", "cat", "dog"]);
    }

    #[test]
    fn top_k_larger_than_word_count_is_not_an_error() {
        let policy = SelectionPolicy::TopKAdaptive {
            top_k: 10,
            threshold_fraction: 0.15,
        };
        let result = select_influential(&words("a b"), &[0.3, 0.6], &policy);
        assert_eq!(result, vec!["a", "b"]);
    }

    #[test]
    fn global_threshold_keeps_duplicates() {
        let policy = SelectionPolicy::GlobalThreshold {
            threshold_fraction: 0.5,
        };
        let result = select_influential(&words("the cat the dog"), &[0.9, 0.1, 0.8, 0.2], &policy);
        assert_eq!(result, vec!["the", "the"]);
    }

    #[test]
    fn global_threshold_equal_distances_select_everything() {
        let policy = SelectionPolicy::global();
        let result = select_influential(&words("a b c"), &[0.4, 0.4, 0.4], &policy);
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn global_threshold_zero_distances_select_everything() {
        // threshold = 0 * (1 - f) = 0 and every distance >= 0
        let policy = SelectionPolicy::global();
        let result = select_influential(&words("a b"), &[0.0, 0.0], &policy);
        assert_eq!(result, vec!["a", "b"]);
    }

    #[test]
    fn global_threshold_fraction_zero_keeps_only_max_ties() {
        let policy = SelectionPolicy::GlobalThreshold {
            threshold_fraction: 0.0,
        };
        let result = select_influential(&words("a b c d"), &[0.7, 0.3, 0.7, 0.1], &policy);
        assert_eq!(result, vec!["a", "c"]);
    }

    #[test]
    fn single_word_prompt_is_always_selected_by_global() {
        let policy = SelectionPolicy::global();
        let result = select_influential(&words("hello"), &[0.001], &policy);
        assert_eq!(result, vec!["hello"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        for policy in [SelectionPolicy::default(), SelectionPolicy::global()] {
            assert!(select_influential(&[], &[], &policy).is_empty());
        }
    }

    #[test]
    fn mismatched_lengths_use_common_prefix() {
        let policy = SelectionPolicy::global();
        // Three words, two distances; the third word can never be selected
        let result = select_influential(&words("a b c"), &[0.9, 0.1], &policy);
        assert_eq!(result, vec!["a"]);
    }
}
