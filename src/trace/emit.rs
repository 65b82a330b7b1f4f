//! Begin/End/Instant event emission and final ordering.

use std::cmp::Ordering;

use super::chrome::{PROCESS_ID, Phase, TraceEvent};
use super::error::{ConvertError, Result};
use super::expand::EffectiveRanges;
use super::frames::FrameRegistry;
use super::span::Span;

/// Nanoseconds since `origin`, as fractional microseconds.
fn to_micros(ns: i64, origin: i64) -> f64 {
    ns.saturating_sub(origin) as f64 / 1000.0
}

/// Sort key at equal timestamp and phase: shallow spans open first, deep
/// spans close first.
fn depth_key(event: &TraceEvent) -> i64 {
    let level = event.level as i64;
    if event.ph == Phase::Begin { level } else { -level }
}

fn timeline_order(a: &TraceEvent, b: &TraceEvent) -> Ordering {
    a.ts.total_cmp(&b.ts)
        .then(a.ph.cmp(&b.ph))
        .then(depth_key(a).cmp(&depth_key(b)))
}

/// Emit timeline events for every span, allocating frames as it goes.
///
/// Spans are visited in input order; event ids start at 1. Point-events keep
/// their raw timestamps. The result is stably sorted by timestamp, phase and
/// depth so begin/end pairs nest correctly at equal timestamps.
pub fn emit_events(
    spans: &[Span],
    ranges: &EffectiveRanges<'_>,
    frames: &mut FrameRegistry,
) -> Result<Vec<TraceEvent>> {
    let origin = ranges.global_min();
    let mut events = Vec::with_capacity(spans.len() * 2);
    let mut next_id: u64 = 1;

    for span in spans {
        let range = ranges
            .get(&span.span_id)
            .ok_or_else(|| ConvertError::UnresolvedSpan {
                span_id: span.span_id.clone(),
            })?;
        let frame = frames.allocate(span, range.depth);
        let name = span.display_name();

        let pair_id = next_id;
        next_id += 1;

        let event = |name: String, ph: Phase, ns: i64, id: u64| TraceEvent {
            name,
            ph,
            ts: to_micros(ns, origin),
            pid: PROCESS_ID,
            cat: span.name.clone(),
            sf: frame,
            id,
            s: (ph == Phase::Instant).then_some("t"),
            level: range.depth,
        };

        events.push(event(name.clone(), Phase::Begin, range.start, pair_id));
        for point in &span.events {
            let point_name = format!("{} ({})", point.name, span.span_id);
            events.push(event(point_name, Phase::Instant, point.ts, next_id));
            next_id += 1;
        }
        events.push(event(name, Phase::End, range.end, pair_id));
    }

    events.sort_by(timeline_order);
    log::debug!(
        "Emitted {} events for {} spans",
        events.len(),
        spans.len()
    );
    Ok(events)
}
