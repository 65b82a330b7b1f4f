//! In-memory span model.
//!
//! Spans are built once from the input batches and never mutated afterwards;
//! the derived time ranges live in [`super::expand::EffectiveRanges`].

/// An instantaneous, named occurrence attached to exactly one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEvent {
    /// Timestamp in nanoseconds
    pub ts: i64,
    pub name: String,
}

impl PointEvent {
    pub fn new(ts: i64, name: impl Into<String>) -> Self {
        Self {
            ts,
            name: name.into(),
        }
    }
}

/// A named, time-bounded unit of work with an optional parent.
///
/// `start_time` may be greater than `end_time` when instrumentation clocks
/// disagree; use [`Span::bounds`] for the normalized range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Opaque identity, unique within one conversion run
    pub span_id: String,
    pub name: String,
    /// Parent identity. May reference a span that is not part of the run.
    pub parent_id: Option<String>,
    /// Start timestamp in nanoseconds
    pub start_time: i64,
    /// End timestamp in nanoseconds
    pub end_time: i64,
    pub events: Vec<PointEvent>,
}

impl Span {
    pub fn new(
        span_id: impl Into<String>,
        name: impl Into<String>,
        parent_id: Option<&str>,
        start_time: i64,
        end_time: i64,
    ) -> Self {
        Self {
            span_id: span_id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            start_time,
            end_time,
            events: Vec::new(),
        }
    }

    /// Attach point-events, builder style.
    pub fn with_events(mut self, events: impl IntoIterator<Item = PointEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Normalized `(min, max)` bounds, widened to cover every point-event.
    pub fn bounds(&self) -> (i64, i64) {
        let lo = self.start_time.min(self.end_time);
        let hi = self.start_time.max(self.end_time);

        self.events
            .iter()
            .fold((lo, hi), |(lo, hi), event| (lo.min(event.ts), hi.max(event.ts)))
    }

    /// Name shown on the timeline: the span name suffixed with its identity.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.span_id)
    }

    /// Duration of the normalized bounds, in nanoseconds.
    pub fn duration_nanos(&self) -> u64 {
        let (lo, hi) = self.bounds();
        hi.abs_diff(lo)
    }
}
