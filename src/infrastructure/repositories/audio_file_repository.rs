use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use uuid::Uuid;

/// Stores generated audio under a single directory.
///
/// Files are addressed by bare file name only. Anything that is not a plain
/// name inside the directory resolves to nothing.
pub struct AudioFileRepository {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    pub filename: String,
    pub size_bytes: usize,
}

impl AudioFileRepository {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if it is missing
    pub async fn init(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write audio under a fresh unique name
    pub async fn save(&self, audio: &[u8], extension: &str) -> io::Result<StoredAudio> {
        self.init().await?;

        let filename = format!("tts_{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.root.join(&filename);
        tokio::fs::write(&path, audio).await?;

        tracing::debug!(
            filename = %filename,
            size_bytes = audio.len(),
            "Audio file written"
        );

        Ok(StoredAudio {
            filename,
            size_bytes: audio.len(),
        })
    }

    /// Read a previously generated file. `Ok(None)` when the name is unknown
    /// or does not denote a file inside the storage directory.
    pub async fn read(&self, filename: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(filename).await? else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete files whose last modification is older than `max_age`.
    /// Returns the number of files removed.
    pub async fn purge_older_than(&self, max_age: Duration) -> io::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();

            if age >= max_age {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(removed)
    }

    async fn resolve(&self, filename: &str) -> io::Result<Option<PathBuf>> {
        if !is_plain_file_name(filename) {
            tracing::warn!(filename = %filename, "Rejected audio file name");
            return Ok(None);
        }

        let candidate = self.root.join(filename);
        let (root, path) = match (
            tokio::fs::canonicalize(&self.root).await,
            tokio::fs::canonicalize(&candidate).await,
        ) {
            (Ok(root), Ok(path)) => (root, path),
            (Err(e), _) | (_, Err(e)) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        // Symlinks pointing out of the directory are treated as missing
        if !path.starts_with(&root) {
            tracing::warn!(filename = %filename, "Audio file resolves outside storage directory");
            return Ok(None);
        }

        let metadata = tokio::fs::metadata(&path).await?;
        Ok(metadata.is_file().then_some(path))
    }
}

/// Periodically evict expired audio files until the returned handle is aborted
pub fn spawn_retention_task(
    repository: Arc<AudioFileRepository>,
    retention: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            match repository.purge_older_than(retention).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(
                    removed = removed,
                    retention_secs = retention.as_secs(),
                    "Expired audio files removed"
                ),
                Err(e) => tracing::error!(error = %e, "Audio retention sweep failed"),
            }
        }
    })
}

fn is_plain_file_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename.len() <= 255
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
