//! Candidate ranking
//!
//! Runs the matcher once per candidate, keeps the matches and orders them by
//! score. Ties keep their input order.

use rayon::prelude::*;
use tracing::debug;

use crate::matcher::StringMatcher;

/// Candidate lists at least this long are scored on the rayon pool
const PARALLEL_THRESHOLD: usize = 512;

/// An item that can be searched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Display text, the string matched against
    pub display: String,
    /// Value to return on selection
    pub value: String,
    /// Optional icon or type indicator
    pub icon: Option<String>,
}

impl Item {
    /// Item whose value is its display text
    pub fn new(display: impl Into<String>) -> Self {
        let display = display.into();
        Self {
            value: display.clone(),
            display,
            icon: None,
        }
    }
}

/// A matched candidate
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    /// Position in the input slice
    pub index: usize,
    pub score: f64,
    /// Char positions to highlight in the item's display text
    pub indices: Vec<usize>,
}

/// Match `query` against every item and return the hits, best first.
///
/// A blank query matches everything, unscored, in input order.
pub fn rank(matcher: &StringMatcher, query: &str, items: &[Item]) -> Vec<Ranked> {
    if query.trim().is_empty() {
        return (0..items.len())
            .map(|index| Ranked {
                index,
                score: 0.0,
                indices: Vec::new(),
            })
            .collect();
    }

    let score_item = |(index, item): (usize, &Item)| {
        let result = matcher.match_text(query, &item.display);
        result.matched.then(|| Ranked {
            index,
            score: result.score,
            indices: result.index_list,
        })
    };

    let mut ranked: Vec<Ranked> = if items.len() >= PARALLEL_THRESHOLD {
        items.par_iter().enumerate().filter_map(score_item).collect()
    } else {
        items.iter().enumerate().filter_map(score_item).collect()
    };

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(query, candidates = items.len(), matched = ranked.len(), "ranked");

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::SearchPrecision;

    fn items(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n)).collect()
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let items = items(&["Firefox", "Files", "Terminal"]);
        let ranked = rank(&StringMatcher::new(), "  ", &items);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(ranked.iter().all(|r| r.indices.is_empty()));
    }

    #[test]
    fn test_filters_and_sorts_by_score() {
        let items = items(&["Terminal", "Windows Explorer", "Window Manager Tweaks", "Win"]);
        let ranked = rank(&StringMatcher::new(), "win", &items);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.index != 0));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        // Shortest candidate gets the length-proximity bonus
        assert_eq!(ranked[0].index, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = items(&["Notes", "Notes", "Notes"]);
        let ranked = rank(&StringMatcher::new(), "not", &items);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let names: Vec<String> = (0..2000).map(|i| format!("Item {i} Launcher")).collect();
        let all: Vec<Item> = names.iter().map(Item::new).collect();
        let small = &all[..100];

        let matcher = StringMatcher::new().with_precision(SearchPrecision::Low);
        let big = rank(&matcher, "il", &all);
        let little = rank(&matcher, "il", small);

        assert_eq!(big.len(), all.len());
        let big_small: Vec<&Ranked> = big.iter().filter(|r| r.index < 100).collect();
        assert_eq!(big_small.len(), little.len());
        for (a, b) in big_small.iter().zip(little.iter()) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_item_new_uses_display_as_value() {
        let item = Item::new("Firefox");
        assert_eq!(item.value, "Firefox");
        assert_eq!(item.icon, None);
    }
}
