//! File-based script source.

use crate::model::error::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Navigation script read once from a file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    lines: Option<Vec<String>>,
}

impl FileSource {
    /// Open and read the whole file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(lines),
        })
    }

    /// All lines on the first call, empty afterwards.
    pub fn drain_lines(&mut self) -> Vec<String> {
        self.lines.take().unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_file_not_found() {
        let path = std::env::temp_dir().join("navshell_definitely_missing.jsonl");
        let result = FileSource::new(&path);
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
    }

    #[test]
    fn drain_returns_lines_once() {
        let path = std::env::temp_dir().join("navshell_file_source_drain.jsonl");
        fs::write(&path, "{\"event\":\"tick\",\"at_ms\":0}\n{\"event\":\"tick\",\"at_ms\":5}\n").unwrap();

        let mut source = FileSource::new(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.drain_lines().len(), 2);
        assert!(source.drain_lines().is_empty());
    }
}
