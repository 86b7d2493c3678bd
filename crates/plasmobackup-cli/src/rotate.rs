//! Size-based log file rotation
//!
//! The active file is `<name>`; older generations are `<name>.1` (newest)
//! through `<name>.<max_files>` (oldest).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only writer that rotates its file once it would exceed `max_size`
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_size: u64,
    max_files: u32,
    file: Option<File>,
    size: u64,
}

impl RotatingFile {
    /// Open or create `path`, continuing from its current size
    pub fn open<P: AsRef<Path>>(path: P, max_size: u64, max_files: u32) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = Self::open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            max_size,
            max_files,
            file: Some(file),
            size,
        })
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_append(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// The active file, reopened if an earlier rotation failed half-way
    fn active(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = Self::open_append(&self.path)?;
            self.size = file.metadata()?.len();
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))
    }

    fn generation(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        // Windows refuses to rename a file that is still open.
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        match fs::remove_file(self.generation(self.max_files)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        for index in (1..self.max_files).rev() {
            let from = self.generation(index);
            if from.exists() {
                fs::rename(&from, self.generation(index + 1))?;
            }
        }
        fs::rename(&self.path, self.generation(1))?;

        self.file = Some(Self::open_append(&self.path)?);
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }
        let written = self.active()?.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plasmobackup.log");
        fs::write(&path, "earlier\n").unwrap();

        let mut file = RotatingFile::open(&path, 1024, 2).unwrap();
        file.write_all(b"later\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(path), "earlier\nlater\n");
    }

    #[test]
    fn test_rotates_when_full() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plasmobackup.log");
        let mut file = RotatingFile::open(&path, 10, 3).unwrap();

        file.write_all(b"aaaaaaaa\n").unwrap();
        file.write_all(b"bbbbbbbb\n").unwrap();
        file.write_all(b"cccccccc\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(path.clone()), "cccccccc\n");
        assert_eq!(read(file.generation(1)), "bbbbbbbb\n");
        assert_eq!(read(file.generation(2)), "aaaaaaaa\n");
        assert!(!file.generation(3).exists());
    }

    #[test]
    fn test_keeps_at_most_max_files_generations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plasmobackup.log");
        let mut file = RotatingFile::open(&path, 4, 2).unwrap();

        for line in ["one\n", "two\n", "six\n", "ten\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert_eq!(read(path), "ten\n");
        assert_eq!(read(file.generation(1)), "six\n");
        assert_eq!(read(file.generation(2)), "two\n");
        assert!(!file.generation(3).exists());
    }

    #[test]
    fn test_oversized_record_is_written_whole() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plasmobackup.log");
        let mut file = RotatingFile::open(&path, 4, 1).unwrap();

        file.write_all(b"a record longer than the limit\n").unwrap();
        file.flush().unwrap();

        assert_eq!(read(path), "a record longer than the limit\n");
        assert!(!file.generation(1).exists());
    }
}
