//! OTLP/JSON batch decoding.
//!
//! Input is JSON Lines: one `TracesData` batch per line, shaped as
//! `resourceSpans[].scopeSpans[].spans[]`. Only the fields the converter
//! needs are decoded; everything else (attributes, status, links) is ignored.
//!
//! ```text
//! {"resourceSpans":[{"scopeSpans":[{"spans":[{"spanId":"a1","name":"root",
//!   "parentSpanId":"","startTimeUnixNano":"1000","endTimeUnixNano":"5000"}]}]}]}
//! ```

use std::io::BufRead;

use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer};

use super::error::{ConvertError, Result};
use super::span::{PointEvent, Span};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Batch {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScopeSpans {
    spans: Vec<WireSpan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSpan {
    span_id: String,
    name: String,
    /// OTLP/JSON encodes "no parent" as an empty string or omits the field
    #[serde(default)]
    parent_span_id: String,
    #[serde(deserialize_with = "deserialize_nanos")]
    start_time_unix_nano: i64,
    #[serde(deserialize_with = "deserialize_nanos")]
    end_time_unix_nano: i64,
    #[serde(default)]
    events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(deserialize_with = "deserialize_nanos")]
    time_unix_nano: i64,
    name: String,
}

/// Deserialize a nanosecond timestamp given either as a number or as a
/// decimal string (OTLP/JSON encodes 64-bit integers as strings).
///
/// Integral floats such as `1000.0` are accepted; fractional ones are not.
fn deserialize_nanos<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NanosVisitor;

    impl Visitor<'_> for NanosVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a nanosecond timestamp as an integer or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(NanosVisitor)
}

impl From<WireSpan> for Span {
    fn from(wire: WireSpan) -> Self {
        let parent_id = (!wire.parent_span_id.is_empty()).then_some(wire.parent_span_id);
        Span {
            span_id: wire.span_id,
            name: wire.name,
            parent_id,
            start_time: wire.start_time_unix_nano,
            end_time: wire.end_time_unix_nano,
            events: wire
                .events
                .into_iter()
                .map(|e| PointEvent::new(e.time_unix_nano, e.name))
                .collect(),
        }
    }
}

/// Decode a single batch line into spans, in document order.
pub fn parse_batch(line: &str) -> serde_json::Result<Vec<Span>> {
    let batch: Batch = serde_json::from_str(line)?;
    Ok(batch
        .resource_spans
        .into_iter()
        .flat_map(|r| r.scope_spans)
        .flat_map(|s| s.spans)
        .map(Span::from)
        .collect())
}

/// Read every batch from a JSON Lines stream.
///
/// Blank lines are skipped. The first malformed line aborts the read with its
/// 1-based line number.
pub fn parse_batches(reader: impl BufRead) -> Result<Vec<Span>> {
    let mut spans = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let batch =
            parse_batch(&line).map_err(|source| ConvertError::Json { line: idx + 1, source })?;
        spans.extend(batch);
    }

    log::debug!("Decoded {} spans", spans.len());
    Ok(spans)
}
