//! Launcher string matcher
//!
//! Scores a query against a candidate label in one forward pass, running two
//! strategies side by side: acronym matching (word initials, capitals and
//! digits) and ordered substring matching. An acronym hit wins when its score
//! clears the precision threshold.

use std::ops::Range;

use tracing::trace;

use crate::precision::SearchPrecision;

const SPACE: char = ' ';

/// Outcome of matching one query against one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    /// Precision threshold this result was evaluated against
    pub score_threshold: u32,
    /// Relevance, higher is better. Zero when not matched
    pub score: f64,
    /// Char positions in the candidate to highlight, ascending and unique
    pub index_list: Vec<usize>,
}

impl MatchResult {
    fn unmatched(score_threshold: u32) -> Self {
        Self {
            matched: false,
            score_threshold,
            score: 0.0,
            index_list: Vec::new(),
        }
    }

    fn hit(score_threshold: u32, index_list: Vec<usize>, score: f64) -> Self {
        Self {
            matched: true,
            score_threshold,
            score,
            index_list,
        }
    }
}

/// Matcher configured with a case rule and a precision level
#[derive(Debug, Clone, Copy)]
pub struct StringMatcher {
    ignore_case: bool,
    precision: SearchPrecision,
}

impl StringMatcher {
    pub fn new() -> Self {
        Self {
            ignore_case: true,
            precision: SearchPrecision::default(),
        }
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_precision(mut self, precision: SearchPrecision) -> Self {
        self.precision = precision;
        self
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn precision(&self) -> SearchPrecision {
        self.precision
    }

    /// Match a query against a candidate
    pub fn match_text(&self, query: &str, text: &str) -> MatchResult {
        fuzzy_match(query, text, self.ignore_case, self.precision)
    }

    /// Score of the match, if the candidate matched
    pub fn score(&self, query: &str, text: &str) -> Option<f64> {
        let result = self.match_text(query, text);
        result.matched.then_some(result.score)
    }

    /// Check if query matches text
    pub fn matches(&self, query: &str, text: &str) -> bool {
        self.match_text(query, text).matched
    }
}

impl Default for StringMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Working state of a single scan. Lives only for one `fuzzy_match` call.
#[derive(Debug)]
struct ScanState {
    acronym_cursor: usize,
    acronym_matched: usize,
    acronym_total: usize,
    acronym_indices: Vec<usize>,

    substring_index: usize,
    substring_char_index: usize,
    first_match_index: Option<usize>,
    first_match_index_in_word: usize,
    last_match_index: usize,
    match_found_in_previous_step: bool,
    all_substrings_contiguous: bool,
    all_substrings_matched: bool,
    index_list: Vec<usize>,
    space_indices: Vec<usize>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            acronym_cursor: 0,
            acronym_matched: 0,
            acronym_total: 0,
            acronym_indices: Vec::new(),
            substring_index: 0,
            substring_char_index: 0,
            first_match_index: None,
            first_match_index_in_word: 0,
            last_match_index: 0,
            match_found_in_previous_step: false,
            all_substrings_contiguous: true,
            all_substrings_matched: false,
            index_list: Vec::new(),
            space_indices: Vec::new(),
        }
    }

    fn scan(&mut self, text: &[char], folded_text: &[char], folded_query: &[char], substrings: &[&[char]]) {
        let query_len = folded_query.len();

        for (i, &c) in folded_text.iter().enumerate() {
            if self.acronym_cursor >= query_len {
                // Acronym query exhausted: keep counting trailing initials, stop at the first non-initial
                if self.acronym_matched == query_len && is_acronym_count(folded_text, i) {
                    self.acronym_total += 1;
                    continue;
                }
                break;
            }

            if c == SPACE && self.substring_char_index == 0 {
                self.space_indices.push(i);
            }

            if is_acronym(text, i) && c == folded_query[self.acronym_cursor] {
                self.acronym_indices.push(i);
                self.acronym_matched += 1;
                self.acronym_cursor += 1;
            }

            if is_acronym_count(text, i) {
                self.acronym_total += 1;
            }

            let current = match substrings.get(self.substring_index) {
                Some(s) if !self.all_substrings_matched => *s,
                _ => {
                    self.match_found_in_previous_step = false;
                    continue;
                }
            };

            if current[self.substring_char_index] != c {
                self.match_found_in_previous_step = false;
                continue;
            }

            self.first_match_index.get_or_insert(i);
            let char_index = self.substring_char_index;

            if char_index == 0 {
                self.match_found_in_previous_step = true;
                self.first_match_index_in_word = i;
            } else if !self.match_found_in_previous_step {
                let start = i - char_index;

                if run_matches_prefix(folded_text, start, &current[..char_index]) {
                    self.match_found_in_previous_step = true;
                    // Later words only replace their own indices, earlier words keep theirs
                    let cut = if self.substring_index == 0 {
                        start
                    } else {
                        self.first_match_index_in_word
                    };
                    self.first_match_index_in_word = start;
                    self.index_list = updated_index_list(&self.index_list, cut, start..i);
                }
            }

            self.last_match_index = i + 1;
            self.index_list.push(i);
            self.substring_char_index += 1;

            if self.substring_char_index == current.len() {
                self.all_substrings_contiguous &= self.match_found_in_previous_step;
                self.substring_index += 1;
                self.all_substrings_matched = self.substring_index >= substrings.len();

                if !self.all_substrings_matched {
                    self.substring_char_index = 0;
                }
            }
        }
    }
}

/// Match `query` against `text`.
///
/// Query words (split on single spaces) must appear in `text` in the order
/// given. Acronym matches are preferred when their score reaches the
/// precision threshold. Never fails: degenerate input is simply not matched.
pub fn fuzzy_match(query: &str, text: &str, ignore_case: bool, precision: SearchPrecision) -> MatchResult {
    let threshold = precision.threshold();

    if query.is_empty() || text.is_empty() {
        return MatchResult::unmatched(threshold);
    }

    let query = query.trim();
    if query.is_empty() {
        return MatchResult::unmatched(threshold);
    }

    let text: Vec<char> = text.chars().collect();
    let query: Vec<char> = query.chars().collect();
    let folded_text = fold_case(&text, ignore_case);
    let folded_query = fold_case(&query, ignore_case);

    let substrings: Vec<&[char]> = folded_query
        .split(|&c| c == SPACE)
        .filter(|s| !s.is_empty())
        .collect();

    let mut state = ScanState::new();
    state.scan(&text, &folded_text, &folded_query, &substrings);

    // Compared against the full query length, spaces included
    if state.acronym_matched > 0 && state.acronym_matched == query.len() {
        let acronym_score = state.acronym_matched as f64 * 100.0 / state.acronym_total as f64;

        trace!(
            matched = state.acronym_matched,
            total = state.acronym_total,
            score = acronym_score,
            threshold,
            "acronym candidate"
        );

        if acronym_score >= f64::from(threshold) {
            return MatchResult::hit(threshold, state.acronym_indices, acronym_score);
        }
    }

    match state.first_match_index {
        Some(first_match_index) if state.all_substrings_matched => {
            let distance_from_word_start = first_match_index
                - closest_space_index(&state.space_indices, first_match_index).map_or(0, |s| s + 1);

            let score = search_score(
                &query,
                text.len(),
                distance_from_word_start,
                state.space_indices.len(),
                state.last_match_index - first_match_index,
                state.all_substrings_contiguous,
            );

            MatchResult::hit(threshold, state.index_list, score)
        }
        _ => MatchResult::unmatched(threshold),
    }
}

/// Lowercase per char, keeping chars whose lowercase form expands so indices stay aligned
fn fold_case(chars: &[char], ignore_case: bool) -> Vec<char> {
    if !ignore_case {
        return chars.to_vec();
    }

    chars
        .iter()
        .map(|&c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

fn is_acronym(text: &[char], index: usize) -> bool {
    is_acronym_char(text, index) || is_acronym_number(text, index)
}

/// Whether the position counts toward the acronym total
fn is_acronym_count(text: &[char], index: usize) -> bool {
    if is_acronym_char(text, index) {
        return true;
    }

    is_acronym_number(text, index) && (index == 0 || text[index - 1] == SPACE)
}

fn is_acronym_char(text: &[char], index: usize) -> bool {
    text[index].is_uppercase() || index == 0 || text[index - 1] == SPACE
}

fn is_acronym_number(text: &[char], index: usize) -> bool {
    text[index].is_ascii_digit()
}

fn run_matches_prefix(text: &[char], start: usize, prefix: &[char]) -> bool {
    text.get(start..start + prefix.len()) == Some(prefix)
}

/// Drop every index at or after `cut` and append the verified run.
fn updated_index_list(index_list: &[usize], cut: usize, run: Range<usize>) -> Vec<usize> {
    index_list
        .iter()
        .copied()
        .filter(|&i| i < cut)
        .chain(run)
        .collect()
}

/// Largest space position before `first_match_index`. Space indices are ascending.
fn closest_space_index(space_indices: &[usize], first_match_index: usize) -> Option<usize> {
    space_indices
        .iter()
        .copied()
        .take_while(|&i| i < first_match_index)
        .last()
}

fn search_score(
    query: &[char],
    text_len: usize,
    distance_from_word_start: usize,
    space_count: usize,
    match_span: usize,
    all_contiguous: bool,
) -> f64 {
    let query_len = query.len();
    let mut score =
        100.0 * (query_len + 1) as f64 / ((1 + distance_from_word_start) + (match_span + 1)) as f64;

    if distance_from_word_start == 0 && all_contiguous {
        score -= space_count as f64;
    }

    let length_gap = text_len as i64 - query_len as i64;
    if length_gap < 5 {
        score += 20.0;
    } else if length_gap < 10 {
        score += 10.0;
    }

    if all_contiguous {
        let count = query.iter().filter(|&&c| c != SPACE).count();
        let threshold = 4;
        let bonus = if count <= threshold {
            count * 10
        } else {
            threshold * 10 + (count - threshold) * 5
        };
        score += bonus as f64;
    }

    score
}
