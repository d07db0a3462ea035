//! Shared temp directory for uploads and generated speech clips
//!
//! Uploads are request-scoped: a [`TempUpload`] guard removes the file when it
//! goes out of scope, on success, on error, and on unwinding alike. Speech
//! clips stay on disk so callers can fetch them later; they are only removed by
//! the optional retention sweep.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use uuid::Uuid;

/// Extension used for generated speech clips
pub const CLIP_EXTENSION: &str = "wav";

/// Sanitize a filename to be safe for filesystem use
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// A fresh, collision-free clip filename (`<uuid>.wav`)
pub fn new_clip_filename() -> String {
    format!("{}.{}", Uuid::new_v4(), CLIP_EXTENSION)
}

/// Longest file name most filesystems accept, in bytes
const MAX_FILENAME_BYTES: usize = 255;

/// Longest client-supplied name kept in an upload's file name, in chars
const MAX_UPLOAD_NAME_CHARS: usize = 100;

/// True when `name` is a single plain path component the filesystem can hold
fn is_plain_filename(name: &str) -> bool {
    if name.len() > MAX_FILENAME_BYTES || name.contains('\0') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// An uploaded file that is deleted when dropped
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temporary upload {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove temporary upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// The directory holding uploads and speech clips
#[derive(Debug, Clone)]
pub struct ClipStore {
    dir: PathBuf,
}

impl ClipStore {
    /// Open (creating if needed) the storage directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create temp directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an uploaded file under a fresh unique name
    pub async fn save_upload(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<TempUpload> {
        let unique = Uuid::new_v4();
        let file_name = match original_name.map(sanitize_filename) {
            Some(name) if !name.is_empty() => {
                let name: String = name.chars().take(MAX_UPLOAD_NAME_CHARS).collect();
                format!("{}_{}", unique, name)
            }
            _ => unique.to_string(),
        };

        let upload = TempUpload {
            path: self.dir.join(file_name),
        };
        tokio::fs::write(upload.path(), bytes)
            .await
            .with_context(|| format!("Failed to save upload to {}", upload.path().display()))?;

        log::debug!("Saved {} byte upload to {}", bytes.len(), upload.path().display());
        Ok(upload)
    }

    /// Resolve a caller-supplied clip name inside the store.
    ///
    /// Only single-component names are accepted; anything that could step out of
    /// the directory resolves to `None`.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() || !is_plain_filename(filename) {
            return None;
        }
        Some(self.dir.join(filename))
    }

    /// Read a stored clip. `Ok(None)` when it does not exist.
    pub async fn read_clip(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(filename) else {
            log::warn!("Rejected clip name {:?}", filename);
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidInput) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Delete speech clips whose last modification is at least `max_age` old.
    /// Returns how many were removed.
    pub fn sweep_expired(&self, max_age: Duration) -> Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CLIP_EXTENSION) {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();

            if age >= max_age {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => log::warn!("Failed to remove expired clip {}: {}", path.display(), e),
                }
            }
        }

        Ok(removed)
    }
}

/// Periodically remove clips older than `max_age`
pub fn spawn_clip_sweeper(store: Arc<ClipStore>, max_age: Duration) -> tokio::task::JoinHandle<()> {
    let period = (max_age / 2).max(Duration::from_secs(60));
    log::info!(
        "Clip retention enabled: removing clips older than {:?} every {:?}",
        max_age,
        period
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.sweep_expired(max_age)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(count)) => log::info!("Removed {} expired speech clips", count),
                Ok(Err(e)) => log::warn!("Clip sweep failed: {}", e),
                Err(e) => log::error!("Clip sweep task panicked: {}", e),
            }
        }
    })
}
