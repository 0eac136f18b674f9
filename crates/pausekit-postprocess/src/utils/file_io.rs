//! File I/O for G-code post-processing
//!
//! Reading validates the input path up front; writing goes through a
//! temporary file in the target directory that is renamed into place on
//! [`GcodeFileWriter::finish`], so a failed run never leaves a truncated
//! file behind and the input can be rewritten in place.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use pausekit_core::{GcodeError, Result};
use tempfile::NamedTempFile;

/// Buffer size for reading and writing large files (256 KB)
const IO_BUFFER_SIZE: usize = 256 * 1024;

/// G-code file reader
#[derive(Debug)]
pub struct GcodeFileReader {
    path: PathBuf,
    file_size: u64,
}

impl GcodeFileReader {
    /// Create a new G-code file reader
    ///
    /// # Errors
    /// Returns error if the file does not exist or is not a regular file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(GcodeError::FileError {
                reason: format!("File does not exist: {}", path.display()),
            }
            .into());
        }

        if !path.is_file() {
            return Err(GcodeError::FileError {
                reason: format!("Path is not a file: {}", path.display()),
            }
            .into());
        }

        let file_size = fs::metadata(&path)?.len();

        Ok(Self { path, file_size })
    }

    /// Get file size in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read entire file into memory
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD. Use
    /// [`open_buffered`](Self::open_buffered) with
    /// `PausePipeline::process_reader` to keep them as they are.
    pub fn read_all(&self) -> Result<String> {
        if self.file_size > 500 * 1024 * 1024 {
            tracing::warn!(
                "Reading very large file ({}MB) into memory",
                self.file_size / (1024 * 1024)
            );
        }

        let bytes = fs::read(&self.path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    offset = e.utf8_error().valid_up_to(),
                    "file is not valid UTF-8, replacing invalid bytes"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Ok(text)
    }

    /// Open the file for buffered line reading
    pub fn open_buffered(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path)?;
        Ok(BufReader::with_capacity(IO_BUFFER_SIZE, file))
    }
}

/// Atomic G-code file writer
///
/// Nothing is visible at the target path until [`finish`](Self::finish)
/// succeeds. Dropping the writer without finishing discards the output.
#[derive(Debug)]
pub struct GcodeFileWriter {
    target: PathBuf,
    inner: BufWriter<NamedTempFile>,
}

impl GcodeFileWriter {
    /// Prepare to write `target`
    ///
    /// # Errors
    /// Returns error if the temporary file cannot be created next to `target`
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = NamedTempFile::new_in(&dir)?;
        tracing::debug!(
            target = %target.display(),
            temp = %temp.path().display(),
            "writing output through temporary file"
        );

        Ok(Self {
            target,
            inner: BufWriter::with_capacity(IO_BUFFER_SIZE, temp),
        })
    }

    /// Target path
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush and move the output into place
    pub fn finish(self) -> Result<()> {
        let temp = self.inner.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Write for GcodeFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Write `contents` to `path` atomically
pub fn write_atomically(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let mut writer = GcodeFileWriter::create(path)?;
    writer.write_all(contents.as_bytes())?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reader_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let err = GcodeFileReader::new(dir.path().join("missing.gcode")).unwrap_err();
        assert!(err.is_gcode_error());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_reader_rejects_directory() {
        let dir = tempdir().unwrap();
        let err = GcodeFileReader::new(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn test_read_all() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("part.gcode");
        fs::write(&path, "G28\nG1 X1\n").unwrap();

        let reader = GcodeFileReader::new(&path).unwrap();
        assert_eq!(reader.file_size(), 10);
        assert_eq!(reader.read_all().unwrap(), "G28\nG1 X1\n");
    }

    #[test]
    fn test_read_all_tolerates_latin1() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.gcode");
        fs::write(&path, b";Bed 60\xB0C\nG28\n").unwrap();

        let text = GcodeFileReader::new(&path).unwrap().read_all().unwrap();
        assert_eq!(text, ";Bed 60\u{FFFD}C\nG28\n");
    }

    #[test]
    fn test_writer_is_invisible_until_finished() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.gcode");

        let mut writer = GcodeFileWriter::create(&path).unwrap();
        writer.write_all(b"M82\n").unwrap();
        assert!(!path.exists());

        writer.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "M82\n");
    }

    #[test]
    fn test_dropped_writer_leaves_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.gcode");
        fs::write(&path, "original\n").unwrap();

        {
            let mut writer = GcodeFileWriter::create(&path).unwrap();
            writer.write_all(b"partial").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "original\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.gcode");
        fs::write(&path, "old\n").unwrap();

        write_atomically(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }
}
