//! Output destination for rendered response blocks.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Error;

/// Where rendered text blocks go: the console, or an append-only file.
///
/// File-backed sinks open, append and close per write, so no handle is held
/// across concurrent writers; callers serialize whole-block writes (see
/// [`ResponseListener`](crate::ResponseListener)). Appends never truncate
/// previously written content.
#[derive(Debug, Clone)]
pub enum Sink {
    /// Write blocks to standard output.
    Stdout,
    /// Append blocks to the given file, creating it on first write.
    File(PathBuf),
}

impl Sink {
    /// Interpret the `--output` flag value: empty means standard output.
    pub fn from_output_arg(path: &str) -> Self {
        if path.is_empty() {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(path))
        }
    }

    /// Append one rendered block to the sink.
    pub fn append(&self, text: &str) -> Result<(), Error> {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            Self::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }
}
