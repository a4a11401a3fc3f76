use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes a file next to its destination and renames it into place on
/// `finalize`, so readers never see a half-written catalog or playlist.
pub struct AtomicFileWriter {
    writer: BufWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    bytes_written: usize,
}

impl AtomicFileWriter {
    /// Create the temp file (and the destination directory if needed)
    pub fn create(final_path: impl Into<PathBuf>) -> Result<Self> {
        let final_path = final_path.into();
        if let Some(parent) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut tmp_name = final_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = final_path.with_file_name(tmp_name);

        let file = File::create(&tmp_path)
            .with_context(|| format!("Failed to create {}", tmp_path.display()))?;

        Ok(Self {
            writer: BufWriter::with_capacity(64 * 1024, file),
            tmp_path,
            final_path,
            bytes_written: 0,
        })
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }

    /// Flush, sync and rename into place. Returns bytes written.
    pub fn finalize(self) -> Result<usize> {
        let Self {
            writer,
            tmp_path,
            final_path,
            bytes_written,
        } = self;

        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("Failed to flush {}", tmp_path.display()))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!("Failed to move {} to {}", tmp_path.display(), final_path.display())
        })?;

        tracing::debug!(path = %final_path.display(), bytes = bytes_written, "output written");
        Ok(bytes_written)
    }

    /// Drop the temp file without touching the destination
    pub fn abort(self) {
        drop(self.writer);
        let _ = fs::remove_file(&self.tmp_path);
    }
}

/// Write a whole buffer atomically
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<usize> {
    let mut writer = AtomicFileWriter::create(path)?;
    if let Err(e) = writer.write_all(bytes) {
        writer.abort();
        return Err(e);
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web/data.json");

        write_atomic(&path, b"first").unwrap();
        let written = write_atomic(&path, b"second!").unwrap();

        assert_eq!(written, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "second!");
        assert!(!dir.path().join("web/data.json.tmp").exists());
    }

    #[test]
    fn test_abort_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vod.m3u");
        fs::write(&path, "old").unwrap();

        let mut writer = AtomicFileWriter::create(&path).unwrap();
        writer.write_all(b"new").unwrap();
        writer.abort();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!dir.path().join("vod.m3u.tmp").exists());
    }
}
