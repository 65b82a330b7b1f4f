//! Summarize spans by name to see where time goes.

use super::span::Span;
use std::collections::HashMap;
use std::time::Duration;

/// Summary statistics for all spans sharing a name.
#[derive(Debug, Clone)]
pub struct SpanStats {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub max: Duration,
}

/// Complete analysis of one run's spans.
#[derive(Debug)]
pub struct TraceAnalysis {
    /// Stats grouped by span name, by total time descending
    pub span_stats: Vec<SpanStats>,
    pub span_count: usize,
    /// Point-events across all spans
    pub event_count: usize,
    /// Slowest individual spans (duration, rendered name)
    pub slowest_spans: Vec<(Duration, String)>,
}

/// Analyze spans and produce a complete summary.
///
/// Durations come from each span's normalized bounds, before padding.
pub fn analyze(spans: &[Span]) -> TraceAnalysis {
    TraceAnalysis {
        span_stats: compute_span_stats(spans),
        span_count: spans.len(),
        event_count: spans.iter().map(|s| s.events.len()).sum(),
        slowest_spans: compute_slowest(spans, 10),
    }
}

fn duration_of(span: &Span) -> Duration {
    Duration::from_nanos(span.duration_nanos())
}

/// Group spans by name and compute statistics for each group.
fn compute_span_stats(spans: &[Span]) -> Vec<SpanStats> {
    let mut groups: HashMap<&str, Vec<Duration>> = HashMap::new();
    for span in spans {
        groups.entry(&span.name).or_default().push(duration_of(span));
    }

    let mut stats: Vec<SpanStats> = groups
        .into_iter()
        .map(|(name, mut durations)| {
            durations.sort();
            SpanStats {
                name: name.to_string(),
                count: durations.len(),
                total: durations.iter().sum(),
                p50: percentile(&durations, 50),
                p90: percentile(&durations, 90),
                max: durations.last().copied().unwrap_or(Duration::ZERO),
            }
        })
        .collect();

    // Total time descending; name keeps the output stable
    stats.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    stats
}

/// Compute a percentile from sorted durations.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = (sorted.len() * pct / 100).min(sorted.len() - 1);
    sorted[idx]
}

/// Get the N slowest spans.
fn compute_slowest(spans: &[Span], n: usize) -> Vec<(Duration, String)> {
    let mut sorted: Vec<_> = spans
        .iter()
        .map(|s| (duration_of(s), s.display_name()))
        .collect();
    // Stable: equal durations keep input order
    sorted.sort_by(|a, b| b.0.cmp(&a.0));
    sorted.truncate(n);
    sorted
}
