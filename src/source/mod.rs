//! Navigation script input.
//!
//! - File loading for a script on disk
//! - Stdin for piped scripts
//! - `script`: the JSONL event format

use crate::model::error::InputError;
use std::path::PathBuf;

pub mod file;
pub mod script;
pub mod stdin;

pub use file::FileSource;
pub use script::{parse_line, parse_script, ScriptEvent};
pub use stdin::StdinSource;

/// Where the script comes from. Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    File(FileSource),
    Stdin(StdinSource<std::io::Stdin>),
}

impl InputSource {
    /// Every line of the script. Empty on later calls.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn lines(&mut self) -> Result<Vec<String>, InputError> {
        match self {
            InputSource::File(f) => Ok(f.drain_lines()),
            InputSource::Stdin(s) => s.read_lines(),
        }
    }
}

/// Pick the input source.
///
/// A file path wins; otherwise stdin, which must be piped.
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::Io` for I/O errors during file reading.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_path_selects_file_source() {
        let path = std::env::temp_dir().join("navshell_detect_file.jsonl");
        fs::write(&path, "{\"event\":\"tick\",\"at_ms\":0}\n").unwrap();

        let mut source = detect_input_source(Some(path.clone())).unwrap();
        let _ = fs::remove_file(&path);

        assert!(matches!(source, InputSource::File(_)));
        assert_eq!(source.lines().unwrap().len(), 1);
        assert!(source.lines().unwrap().is_empty());
    }

    #[test]
    fn missing_file_propagates_error() {
        let path = std::env::temp_dir().join("navshell_detect_missing.jsonl");
        let result = detect_input_source(Some(path));
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
    }
}
