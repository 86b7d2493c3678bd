//! Durable async file writer

use plasmobackup_types::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};
use tracing::debug;

/// Buffered writer whose [`finish`](DurableFileWriter::finish) only returns once
/// the data has reached storage
#[derive(Debug)]
pub struct DurableFileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl DurableFileWriter {
    /// Create (or truncate) a file for writing
    pub async fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).await.map_err(|e| Error::Io {
            message: format!("Failed to create file '{}': {}", path.display(), e),
        })?;

        debug!("Created file for writing: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            bytes_written: 0,
        })
    }

    /// Stream everything from `reader` into the file
    pub async fn copy_from<R>(&mut self, reader: &mut R) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let copied = tokio::io::copy(reader, &mut self.writer)
            .await
            .map_err(|e| Error::Io {
                message: format!("Failed to write to '{}': {}", self.path.display(), e),
            })?;

        self.bytes_written += copied;
        Ok(copied)
    }

    /// Flush buffered data and sync the file to disk
    pub async fn finish(mut self) -> Result<u64> {
        self.writer.flush().await.map_err(|e| Error::Io {
            message: format!("Failed to flush '{}': {}", self.path.display(), e),
        })?;

        self.writer
            .get_mut()
            .sync_all()
            .await
            .map_err(|e| Error::Io {
                message: format!("Failed to sync '{}' to disk: {}", self.path.display(), e),
            })?;

        debug!(
            "Synced {} bytes to {}",
            self.bytes_written,
            self.path.display()
        );
        Ok(self.bytes_written)
    }
}
