//! Synthetic stack frames for the viewer's call-stack rendering.
//!
//! Frame ids are partitioned into depth bands: `depth * 1_000_000 + n`, where
//! `n` counts the frames allocated so far in the run. Sorting by id therefore
//! groups frames by depth, then by allocation order. A band holds at most one
//! million frames; beyond that ids from adjacent depths collide.

use indexmap::IndexMap;
use serde::Serialize;

use super::span::Span;

/// Width of one depth band.
pub const FRAMES_PER_DEPTH: u64 = 1_000_000;

pub type FrameId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    id: FrameId,
    name: String,
    parent_span: Option<String>,
}

/// Externalized frame-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<FrameId>,
}

/// Frames allocated during one conversion run, keyed by span identity.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    frames: IndexMap<String, Frame>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Allocate the frame for `span` at nesting level `depth`.
    pub fn allocate(&mut self, span: &Span, depth: usize) -> FrameId {
        let id = depth as u64 * FRAMES_PER_DEPTH + self.frames.len() as u64;
        self.frames.insert(
            span.span_id.clone(),
            Frame {
                id,
                name: span.name.clone(),
                parent_span: span.parent_id.clone(),
            },
        );
        id
    }

    /// Frame id previously allocated for a span.
    pub fn get(&self, span_id: &str) -> Option<FrameId> {
        self.frames.get(span_id).map(|f| f.id)
    }

    /// The frame table, ascending by id and keyed by the stringified id.
    ///
    /// A parent span without a frame (absent from the run) leaves the entry
    /// without a parent reference.
    pub fn into_stack_frames(self) -> IndexMap<String, StackFrame> {
        let mut frames: Vec<&Frame> = self.frames.values().collect();
        frames.sort_by_key(|f| f.id);

        frames
            .into_iter()
            .map(|frame| {
                let parent = frame
                    .parent_span
                    .as_deref()
                    .and_then(|parent| self.get(parent));
                (
                    frame.id.to_string(),
                    StackFrame {
                        name: frame.name.clone(),
                        parent,
                    },
                )
            })
            .collect()
    }
}
