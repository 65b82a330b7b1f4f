//! OpenTelemetry span batches to Chrome Trace Event Format.
//!
//! A conversion run goes through four phases, each owning its own state:
//!
//! 1. [`index`] normalizes every span's bounds and builds the parent/child
//!    adjacency and root set.
//! 2. [`expand`] pads each span and widens parents to contain their
//!    children, assigning nesting depths.
//! 3. [`frames`] allocates depth-banded stack-frame ids.
//! 4. [`emit`] produces the ordered Begin/End/Instant timeline.
//!
//! # Usage
//!
//! ```ignore
//! use otel2chrome::trace;
//!
//! let trace = trace::convert_reader(std::io::stdin().lock())?;
//! println!("{}", trace.to_json(false)?);
//! ```
//!
//! Open the output in chrome://tracing, https://ui.perfetto.dev or
//! https://www.speedscope.app.

pub mod analyze;
pub mod chrome;
pub mod display;
pub mod emit;
pub mod error;
pub mod expand;
pub mod frames;
pub mod index;
pub mod otel;
pub mod span;

use std::io::BufRead;

// Re-export main types for convenience
pub use analyze::{SpanStats, TraceAnalysis, analyze};
pub use chrome::{ChromeTrace, Phase, TraceEvent};
pub use display::render;
pub use error::{ConvertError, Result};
pub use expand::{EffectiveRange, EffectiveRanges, expand_ranges};
pub use frames::{FrameId, FrameRegistry, StackFrame};
pub use index::SpanIndex;
pub use otel::{parse_batch, parse_batches};
pub use span::{PointEvent, Span};

/// Convert a full set of spans into the Chrome trace structure.
///
/// The whole run either succeeds or fails; nothing is emitted on error.
pub fn convert(spans: &[Span]) -> Result<ChromeTrace> {
    let index = SpanIndex::build(spans);
    let ranges = expand_ranges(&index);
    let mut frames = FrameRegistry::new();
    let events = emit::emit_events(spans, &ranges, &mut frames)?;
    Ok(ChromeTrace::new(events, frames.into_stack_frames()))
}

/// Read JSON Lines batches and convert them in one go.
pub fn convert_reader(reader: impl BufRead) -> Result<ChromeTrace> {
    let spans = parse_batches(reader)?;
    convert(&spans)
}
