//! Conversion error types.
//!
//! Every failure aborts the whole run: there is no partial or best-effort
//! output. Dangling parent references are not errors (such spans become
//! roots) and never appear here.

/// Errors raised while reading span batches or building the timeline.
///
/// # Usage
///
/// ```ignore
/// // Pattern match on errors
/// if let Err(ConvertError::Json { line, .. }) = parse_batches(reader) {
///     eprintln!("bad batch on line {line}");
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Reading the input failed
    #[error("failed to read input")]
    Io(#[from] std::io::Error),

    /// A batch line is not valid JSON or lacks a required span field
    #[error("malformed batch on line {line}")]
    Json {
        /// 1-based line number in the input
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A span has no computed range, which only happens when its parent
    /// links form a cycle and no root reaches it
    #[error("span '{span_id}' is not reachable from any root span")]
    UnresolvedSpan { span_id: String },

    /// Encoding the output structure failed
    #[error("failed to serialize trace")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
