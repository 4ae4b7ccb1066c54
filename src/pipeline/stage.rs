use clipforge_common::VideoRecord;
use serde::Serialize;
use std::fmt;

/// Steps a topic passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Script,
    Speech,
    Video,
    Assemble,
    Persist,
    Sync,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::Script,
        PipelineStage::Speech,
        PipelineStage::Video,
        PipelineStage::Assemble,
        PipelineStage::Persist,
        PipelineStage::Sync,
    ];
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Speech => write!(f, "speech"),
            Self::Video => write!(f, "video"),
            Self::Assemble => write!(f, "assemble"),
            Self::Persist => write!(f, "persist"),
            Self::Sync => write!(f, "sync"),
        }
    }
}

/// Result of running one topic inside a batch.
///
/// A failed topic only yields a diagnostic; it is never written to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TopicOutcome {
    Generated(VideoRecord),
    Failed { title: String, error: String },
}

impl TopicOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TopicOutcome::Generated(_))
    }

    pub fn title(&self) -> &str {
        match self {
            TopicOutcome::Generated(record) => &record.title,
            TopicOutcome::Failed { title, .. } => title,
        }
    }
}
