//! Display formatting for span analysis output.

use super::analyze::TraceAnalysis;
use std::fmt::Write as _;

/// Render the complete analysis to a string.
pub fn render(analysis: &TraceAnalysis) -> String {
    let mut out = String::new();

    render_header(&mut out, analysis);
    render_span_breakdown(&mut out, analysis);
    render_slowest(&mut out, analysis);

    out
}

fn render_header(out: &mut String, analysis: &TraceAnalysis) {
    out.push_str("============================================================\n");
    out.push_str("                   SPAN TIME SUMMARY\n");
    out.push_str("============================================================\n");
    writeln!(
        out,
        "{} spans, {} point events",
        analysis.span_count, analysis.event_count
    )
    .unwrap();
}

fn render_span_breakdown(out: &mut String, analysis: &TraceAnalysis) {
    out.push_str("\nSPAN NAME BREAKDOWN\n");
    out.push_str("-------------------\n");
    writeln!(
        out,
        "{:<30} {:>6} {:>10} {:>9} {:>9} {:>9}",
        "Span", "Count", "Total(ms)", "p50(ms)", "p90(ms)", "Max(ms)"
    )
    .unwrap();

    for stat in &analysis.span_stats {
        writeln!(
            out,
            "{:<30} {:>6} {:>10.3} {:>9.3} {:>9.3} {:>9.3}",
            truncate(&stat.name, 30),
            stat.count,
            stat.total.as_secs_f64() * 1000.0,
            stat.p50.as_secs_f64() * 1000.0,
            stat.p90.as_secs_f64() * 1000.0,
            stat.max.as_secs_f64() * 1000.0,
        )
        .unwrap();
    }
}

fn render_slowest(out: &mut String, analysis: &TraceAnalysis) {
    out.push_str("\nSLOWEST SPANS\n");
    out.push_str("-------------\n");

    for (duration, name) in &analysis.slowest_spans {
        writeln!(
            out,
            "{:>10.3}ms  {}",
            duration.as_secs_f64() * 1000.0,
            truncate(name, 60)
        )
        .unwrap();
    }
}

/// Truncate to `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
