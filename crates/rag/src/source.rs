//! Directory-backed transcript source
//!
//! Lists `*.txt` files under a directory; the transcript id is the file
//! stem. Invalid UTF-8 degrades lossily rather than failing the file.

use async_trait::async_trait;
use std::path::PathBuf;

use course_buddy_core::TranscriptSource;

use crate::RagError;

/// Transcript source reading `*.txt` files from a directory
pub struct DirTranscriptSource {
    dir: PathBuf,
}

impl DirTranscriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", id))
    }
}

#[async_trait]
impl TranscriptSource for DirTranscriptSource {
    async fn list(&self) -> course_buddy_core::Result<Vec<String>> {
        if !self.dir.exists() {
            return Err(RagError::Source(format!(
                "Transcript directory not found: {}",
                self.dir.display()
            ))
            .into());
        }

        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| RagError::Source(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| RagError::Source(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn fetch(&self, id: &str) -> course_buddy_core::Result<String> {
        let path = self.path_for(id);
        let bytes = std::fs::read(&path).map_err(|e| {
            RagError::Source(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
