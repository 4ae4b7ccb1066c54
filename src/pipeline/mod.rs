//! Generation pipeline: turns topics into persisted video records.

pub mod executor;
pub mod stage;

pub use executor::{PipelineExecutor, StageCallback};
pub use stage::{PipelineStage, TopicOutcome};

/// Split a comma-separated line into trimmed, non-empty topics.
pub fn parse_topics(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// True when an input line asks to stop reading topics.
pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("quit")
}
