pub mod config;
pub mod trace;

// Re-export the one-shot entry points for convenience
pub use trace::{ChromeTrace, ConvertError, Span, convert, convert_reader};
