//! Parent/child adjacency and root detection over one run's spans.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::span::Span;

/// Normalized bounds and tree structure for a collection of spans.
///
/// Borrowed from the span slice; one index per conversion run.
#[derive(Debug, Default)]
pub struct SpanIndex<'a> {
    /// Normalized `(start, end)` per span, in input order
    ranges: IndexMap<&'a str, (i64, i64)>,
    /// Children grouped by parent identity, including parents absent from
    /// `ranges`
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> SpanIndex<'a> {
    pub fn build(spans: &'a [Span]) -> Self {
        let mut index = SpanIndex::default();

        for span in spans {
            index.ranges.insert(span.span_id.as_str(), span.bounds());
            if let Some(parent) = &span.parent_id {
                index
                    .children
                    .entry(parent.as_str())
                    .or_default()
                    .push(span.span_id.as_str());
            }
        }

        log::debug!(
            "Indexed {} spans under {} parents",
            index.ranges.len(),
            index.children.len()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the span is part of this run.
    pub fn contains(&self, span_id: &str) -> bool {
        self.ranges.contains_key(span_id)
    }

    /// Normalized bounds of a span, if it is part of this run.
    pub fn range(&self, span_id: &str) -> Option<(i64, i64)> {
        self.ranges.get(span_id).copied()
    }

    /// In-collection children of a span, sorted by identity.
    pub fn children(&self, span_id: &str) -> Vec<&'a str> {
        let mut children: Vec<&'a str> = self
            .children
            .get(span_id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|child| self.contains(child))
            .collect();
        children.sort_unstable();
        children
    }

    /// Spans with no resolvable parent, by ascending normalized start.
    ///
    /// Only parents present in the run claim their children; a span whose
    /// parent is missing stays a root. Ties keep input order.
    pub fn roots(&self) -> Vec<&'a str> {
        let claimed: HashSet<&str> = self
            .children
            .iter()
            .filter(|(parent, _)| self.contains(parent))
            .flat_map(|(_, children)| children.iter().copied())
            .collect();

        for (parent, children) in &self.children {
            if !self.contains(parent) {
                log::debug!(
                    "Parent {parent} is not in the trace; treating {} span(s) as roots",
                    children.len()
                );
            }
        }

        let mut roots: Vec<(&'a str, i64)> = self
            .ranges
            .iter()
            .filter(|(id, _)| !claimed.contains(**id))
            .map(|(id, (start, _))| (*id, *start))
            .collect();
        roots.sort_by_key(|(_, start)| *start);
        roots.into_iter().map(|(id, _)| id).collect()
    }
}
