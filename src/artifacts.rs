//! Local artifact files produced by the speech and video stages.
//!
//! Every artifact gets a fresh UUID file name, so two runs never overwrite
//! each other's output. Directories are created on first write.

use std::path::{Path, PathBuf};

use clipforge_common::Result;
use uuid::Uuid;

use crate::config::PathsConfig;

/// Placeholder body written when no video credential is configured.
pub const MISSING_KEY_MARKER: &str = "FAKE VIDEO - HEYGEN KEY MISSING";

/// Prefix of the placeholder body written when rendering failed.
pub const RENDER_FAILED_PREFIX: &str = "FAKE VIDEO - HEYGEN FAILED: ";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    audio_dir: PathBuf,
    videos_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(audio_dir: impl Into<PathBuf>, videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            videos_dir: videos_dir.into(),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.audio_dir, &paths.videos_dir)
    }

    /// Store the script text as a stand-in for synthesized speech.
    pub async fn write_transcript(&self, text: &str) -> Result<PathBuf> {
        write_unique(&self.audio_dir, "txt", text.as_bytes()).await
    }

    /// Store synthesized speech returned by the provider.
    pub async fn write_audio(&self, bytes: &[u8]) -> Result<PathBuf> {
        write_unique(&self.audio_dir, "mp3", bytes).await
    }

    /// Store a placeholder standing in for a video the renderer did not produce.
    pub async fn write_placeholder_video(&self, body: &str) -> Result<PathBuf> {
        write_unique(&self.videos_dir, "mp4", body.as_bytes()).await
    }
}

async fn write_unique(dir: &Path, extension: &str, contents: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.{extension}", Uuid::new_v4()));
    tokio::fs::write(&path, contents).await?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn transcript_holds_text_verbatim() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("audio"), dir.path().join("videos"));

        let path = store.write_transcript("Hook: hi\nCTA: bye").await.unwrap();

        assert_eq!(path.extension().unwrap(), "txt");
        assert!(path.starts_with(dir.path().join("audio")));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hook: hi\nCTA: bye");
    }

    #[tokio::test]
    async fn artifacts_never_collide() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("audio"), dir.path().join("videos"));

        let a = store.write_placeholder_video(MISSING_KEY_MARKER).await.unwrap();
        let b = store.write_placeholder_video(MISSING_KEY_MARKER).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "mp4");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), MISSING_KEY_MARKER);
    }

    #[tokio::test]
    async fn audio_keeps_binary_payload() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("audio"), dir.path().join("videos"));

        let path = store.write_audio(&[0xFF, 0xFB, 0x90, 0x00]).await.unwrap();

        assert_eq!(path.extension().unwrap(), "mp3");
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0xFB, 0x90, 0x00]);
    }
}
