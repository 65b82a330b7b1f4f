//! Effective time ranges: skew padding plus containment repair.
//!
//! Instrumentation clocks are not synchronized, so a child can start before
//! or end after its parent. Timeline viewers reconstruct call stacks from
//! begin/end ordering and misrender such spans. Every span is padded by
//! `100 - depth` nanoseconds on both sides, then widened to contain all of its
//! descendants.
//!
//! The walk is an explicit-stack post-order traversal, so arbitrarily deep
//! traces cannot overflow the call stack.

use std::collections::{HashMap, HashSet};

use super::index::SpanIndex;

/// Base padding in nanoseconds applied to depth-0 spans.
///
/// Each nesting level gets one nanosecond less. At depth 100 and beyond the
/// pad is zero or negative and spans are no longer widened.
const BASE_PAD_NANOS: i64 = 100;

/// A span's bounds after padding and containment repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRange {
    pub start: i64,
    pub end: i64,
    /// Nesting level below the nearest root (roots are 0)
    pub depth: usize,
}

/// Effective ranges for every span reachable from a root.
#[derive(Debug, Default)]
pub struct EffectiveRanges<'a> {
    ranges: HashMap<&'a str, EffectiveRange>,
}

impl EffectiveRanges<'_> {
    pub fn get(&self, span_id: &str) -> Option<EffectiveRange> {
        self.ranges.get(span_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Earliest effective start across the run, or 0 when there are no spans.
    pub fn global_min(&self) -> i64 {
        self.ranges.values().map(|r| r.start).min().unwrap_or(0)
    }
}

fn pad_for_depth(depth: usize) -> i64 {
    BASE_PAD_NANOS - i64::try_from(depth).unwrap_or(i64::MAX)
}

/// Compute effective ranges for every span reachable from the index's roots.
///
/// Spans caught in a parent cycle are never reached and get no range.
pub fn expand_ranges<'a>(index: &SpanIndex<'a>) -> EffectiveRanges<'a> {
    let mut stack: Vec<(&'a str, usize)> = index.roots().into_iter().map(|id| (id, 0)).collect();
    let mut expanded: HashSet<&'a str> = HashSet::new();
    let mut out = EffectiveRanges::default();

    while let Some(&(current, depth)) = stack.last() {
        let children = index.children(current);

        // First visit: push children and come back once they are resolved
        if !children.is_empty() && expanded.insert(current) {
            stack.extend(children.into_iter().map(|child| (child, depth + 1)));
            continue;
        }
        stack.pop();

        let Some((start, end)) = index.range(current) else {
            continue;
        };
        let pad = pad_for_depth(depth);
        let mut range = EffectiveRange {
            start: start.saturating_sub(pad),
            end: end.saturating_add(pad),
            depth,
        };

        for child in children.iter().filter_map(|child| out.get(child)) {
            range.start = range.start.min(child.start);
            range.end = range.end.max(child.end);
        }

        out.ranges.insert(current, range);
    }

    let unresolved = index.len().saturating_sub(out.len());
    if unresolved > 0 {
        log::debug!("{unresolved} span(s) unreachable from any root");
    }
    log::debug!("Expanded {} span ranges", out.len());
    out
}
