//! Live search over the cards' `data-search` payloads.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::controller::{Deferred, GalleryController};
use super::dom::Dom;
use super::timer::Clock;
use crate::error::{Error, Result};

/// Lowercase, trim and collapse whitespace runs to single spaces.
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered fuzzy matcher: every token must appear, in order, with anything in
/// between.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    pattern: Regex,
}

impl QueryMatcher {
    /// Build from a normalized, non-empty query.
    pub fn new(query: &str) -> Result<Self> {
        let body = query
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*?");
        let pattern = RegexBuilder::new(&body).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// True if any of the card's searchable strings matches.
    pub fn matches_any<S: AsRef<str>>(&self, sources: &[S]) -> bool {
        sources.iter().any(|s| self.is_match(s.as_ref()))
    }
}

/// What a search pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Same normalized query as last time; nothing touched.
    Unchanged,
    /// Empty query: all marks removed.
    Cleared { removed: usize },
    Filtered { added: usize, removed: usize, total: usize },
}

#[derive(Debug, Default)]
pub struct SearchState {
    last_query: Option<String>,
    /// Indices into the card list.
    results: BTreeSet<usize>,
}

impl<D: Dom, C: Clock> GalleryController<D, C> {
    /// Filter the cards against the search field's current value.
    pub fn run_search(&mut self) -> Result<SearchOutcome> {
        let query = normalize_query(&self.dom.value(&self.search_input));
        if self.search.last_query.as_deref() == Some(query.as_str()) {
            return Ok(SearchOutcome::Unchanged);
        }

        let outcome = if query.is_empty() {
            let previous = std::mem::take(&mut self.search.results);
            for &index in &previous {
                self.unmark(index);
            }
            self.dom.set_class(&self.games, &self.config.results_class, false);
            SearchOutcome::Cleared { removed: previous.len() }
        } else {
            let matcher = QueryMatcher::new(&query)?;
            let mut results = BTreeSet::new();
            for index in 0..self.cards.len() {
                if matcher.matches_any(self.sources(index)?) {
                    results.insert(index);
                }
            }

            let added: Vec<usize> = results.difference(&self.search.results).copied().collect();
            let removed: Vec<usize> = self.search.results.difference(&results).copied().collect();
            for &index in &added {
                let node = self.cards[index].node.clone();
                self.dom.add_class(&node, &self.config.hit_class);
            }
            for &index in &removed {
                self.unmark(index);
            }
            self.dom.set_class(&self.games, &self.config.results_class, true);

            let total = results.len();
            self.search.results = results;
            SearchOutcome::Filtered { added: added.len(), removed: removed.len(), total }
        };

        debug!("search {query:?}: {outcome:?}");
        self.search.last_query = Some(query);
        Ok(outcome)
    }

    fn unmark(&mut self, index: usize) {
        let node = self.cards[index].node.clone();
        self.dom.remove_class(&node, &self.config.hit_class);
        self.dom.set_style(&node, "order", None);
    }

    /// Searchable strings of card `index`, parsed once from `data-search`.
    fn sources(&mut self, index: usize) -> Result<&[String]> {
        let card = &mut self.cards[index];
        if card.sources.is_none() {
            let raw = self
                .dom
                .data(&card.node, "search")
                .ok_or_else(|| Error::MissingSearchData(card.key.clone()))?;
            card.sources = Some(serde_json::from_str(&raw)?);
        }
        Ok(card.sources.as_deref().unwrap_or_default())
    }

    /// Re-run the search shortly after the field loses focus, so a caller can
    /// restore the text first. Runs with whatever the field holds by then.
    pub(super) fn schedule_search_rerun(&mut self) {
        if let Some(id) = self.search_rerun.take() {
            self.timers.cancel(id);
        }
        let now = self.clock.now_ms();
        self.search_rerun = Some(self.timers.schedule(
            now,
            self.config.search_rerun_ms,
            Deferred::RerunSearch,
        ));
    }

    /// Keys of the cards matching the active query, in container order.
    pub fn search_results(&self) -> Vec<&str> {
        self.search.results.iter().map(|&i| self.cards[i].key.as_str()).collect()
    }

    /// Last query that was processed, normalized.
    pub fn last_query(&self) -> Option<&str> {
        self.search.last_query.as_deref()
    }
}
