//! Chrome Trace Event Format output structure.
//!
//! The result loads in chrome://tracing, Perfetto and speedscope. Begin/End
//! pairs carry a stack-frame reference (`sf`) into `stackFrames`, which the
//! viewers use to render call stacks.
//!
//! `displayTimeUnit` is always `"ns"` even though `ts` values are in
//! microseconds: the viewer then shows sub-microsecond precision.

use indexmap::IndexMap;
use serde::Serialize;

use super::error::{ConvertError, Result};
use super::frames::{FrameId, StackFrame};

/// Single logical process for every event.
pub const PROCESS_ID: u32 = 1;

/// Event phase. Declaration order is the sort order at equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "E")]
    End,
    #[serde(rename = "i")]
    Instant,
}

/// One timeline record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub name: String,
    pub ph: Phase,
    /// Microseconds since the run's earliest effective start
    pub ts: f64,
    pub pid: u32,
    /// Owning span's name, used by viewers for coloring
    pub cat: String,
    pub sf: FrameId,
    /// Shared by a Begin/End pair; unique for instants
    pub id: u64,
    /// Instant scope (`"t"`, thread)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<&'static str>,
    /// Owning span's depth
    #[serde(rename = "_level")]
    pub level: usize,
}

/// The complete converted trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeTrace {
    pub trace_events: Vec<TraceEvent>,
    pub display_time_unit: &'static str,
    pub stack_frames: IndexMap<String, StackFrame>,
}

impl ChromeTrace {
    pub fn new(trace_events: Vec<TraceEvent>, stack_frames: IndexMap<String, StackFrame>) -> Self {
        Self {
            trace_events,
            display_time_unit: "ns",
            stack_frames,
        }
    }

    /// Encode as JSON text.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(ConvertError::Serialize)
    }
}
