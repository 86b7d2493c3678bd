//! Single-entry tree copier

use crate::DurableFileWriter;
use plasmobackup_types::{CopiedEntry, Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Copies one source entry into the mirrored position under the destination root
///
/// Cloning is cheap enough to hand a copy to every spawned task.
#[derive(Debug, Clone)]
pub struct TreeCopier {
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl TreeCopier {
    /// Create a copier for a pair of roots
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source_root: S, destination_root: D) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
        }
    }

    /// Source root this copier mirrors from
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Destination root this copier mirrors into
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Map a source path to its destination counterpart
    ///
    /// The first occurrence of the source root string is replaced with the
    /// destination root string, wherever it appears. Paths that are not valid
    /// UTF-8 are mapped by prefix instead.
    pub fn destination_for<P: AsRef<Path>>(&self, source: P) -> PathBuf {
        let source = source.as_ref();
        match (
            source.to_str(),
            self.source_root.to_str(),
            self.destination_root.to_str(),
        ) {
            (Some(path), Some(from), Some(to)) => PathBuf::from(path.replacen(from, to, 1)),
            _ => match source.strip_prefix(&self.source_root) {
                Ok(relative) if relative.as_os_str().is_empty() => self.destination_root.clone(),
                Ok(relative) => self.destination_root.join(relative),
                Err(_) => source.to_path_buf(),
            },
        }
    }

    /// Copy a single file or create a single directory
    ///
    /// Directories are created with all their parents and it is not an error if
    /// they already exist. Files get their parent directory created, are
    /// streamed byte for byte and synced to storage before this returns. A
    /// failed copy leaves whatever was written in place.
    pub async fn copy<P: AsRef<Path>>(&self, source: P) -> Result<CopiedEntry> {
        let source = source.as_ref();
        let destination = self.destination_for(source);

        let metadata = fs::metadata(source).await.map_err(|e| Error::Io {
            message: format!("Failed to read metadata of '{}': {}", source.display(), e),
        })?;

        if metadata.is_dir() {
            create_dir_all(&destination).await?;
            debug!("Ensured directory {}", destination.display());
            return Ok(CopiedEntry::directory());
        }

        if let Some(parent) = destination.parent() {
            create_dir_all(parent).await?;
        }

        let mut reader = fs::File::open(source).await.map_err(|e| Error::Io {
            message: format!("Failed to open '{}': {}", source.display(), e),
        })?;
        let mut writer = DurableFileWriter::create(&destination).await?;
        writer.copy_from(&mut reader).await?;
        let bytes = writer.finish().await?;

        debug!(
            "Copied {} bytes: {} -> {}",
            bytes,
            source.display(),
            destination.display()
        );
        Ok(CopiedEntry::file(bytes))
    }
}

async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await.map_err(|e| Error::Io {
        message: format!("Failed to create directory '{}': {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plasmobackup_types::EntryKind;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn roots() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        (temp_dir, src, dst)
    }

    #[test]
    fn test_destination_replaces_root_prefix() {
        let copier = TreeCopier::new("/data/src", "/backup");
        assert_eq!(
            copier.destination_for("/data/src/run1/a.csv"),
            PathBuf::from("/backup/run1/a.csv")
        );
        assert_eq!(copier.destination_for("/data/src"), PathBuf::from("/backup"));
    }

    #[test]
    fn test_destination_replaces_first_occurrence_only() {
        let copier = TreeCopier::new("/src", "/dst");
        assert_eq!(
            copier.destination_for("/src/nested/src/a.txt"),
            PathBuf::from("/dst/nested/src/a.txt")
        );
    }

    #[test]
    fn test_destination_replaces_root_string_anywhere() {
        // The mapping is a string replacement, not a prefix match.
        let copier = TreeCopier::new("src", "dst");
        assert_eq!(
            copier.destination_for("/home/srcdata/src/a.txt"),
            PathBuf::from("/home/dstdata/src/a.txt")
        );
    }

    proptest! {
        #[test]
        fn test_destination_keeps_relative_structure(
            parts in prop::collection::vec("[a-z0-9]{1,8}", 1..5)
        ) {
            let copier = TreeCopier::new("/root/source", "/mnt/out");
            let relative = parts.join("/");
            let source = format!("/root/source/{}", relative);
            prop_assert_eq!(
                copier.destination_for(&source),
                PathBuf::from(format!("/mnt/out/{}", relative))
            );
        }
    }

    #[tokio::test]
    async fn test_copy_file_byte_exact() {
        let (_temp, src, dst) = roots();
        let data: Vec<u8> = (0..200_000u32).map(|i| (i * 31 % 251) as u8).collect();
        std::fs::create_dir_all(src.join("run")).unwrap();
        std::fs::write(src.join("run/data.bin"), &data).unwrap();

        let copier = TreeCopier::new(&src, &dst);
        let entry = copier.copy(src.join("run/data.bin")).await.unwrap();

        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.bytes, data.len() as u64);
        assert_eq!(std::fs::read(dst.join("run/data.bin")).unwrap(), data);
    }

    #[tokio::test]
    async fn test_copy_file_overwrites_existing_destination() {
        let (_temp, src, dst) = roots();
        std::fs::write(src.join("a.txt"), b"hi").unwrap();
        std::fs::write(dst.join("a.txt"), b"a much longer old content").unwrap();

        let copier = TreeCopier::new(&src, &dst);
        copier.copy(src.join("a.txt")).await.unwrap();

        assert_eq!(std::fs::read(dst.join("a.txt")).unwrap(), b"hi");
    }

    #[tokio::test]
    async fn test_copy_directory_is_idempotent() {
        let (_temp, src, dst) = roots();
        std::fs::create_dir_all(src.join("a/b/c")).unwrap();

        let copier = TreeCopier::new(&src, &dst);
        let first = copier.copy(src.join("a/b/c")).await.unwrap();
        let second = copier.copy(src.join("a/b/c")).await.unwrap();

        assert_eq!(first, CopiedEntry::directory());
        assert_eq!(second, CopiedEntry::directory());
        assert!(dst.join("a/b/c").is_dir());
    }

    #[tokio::test]
    async fn test_copy_missing_source_fails() {
        let (_temp, src, dst) = roots();
        let copier = TreeCopier::new(&src, &dst);

        let err = copier.copy(src.join("gone.txt")).await.unwrap_err();
        assert!(err.to_string().contains("gone.txt"));
        assert!(!dst.join("gone.txt").exists());
    }
}
