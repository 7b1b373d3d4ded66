//! Source — a named input stream.

use std::fmt;
use std::io::Cursor;

use tokio::io::AsyncRead;

use crate::error::{GrouperError, GrouperResult};

/// Path value meaning "read standard input".
pub const STDIN_SENTINEL: &str = "-";

pub struct Source {
    name: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl Source {
    pub fn new<R>(name: impl Into<String>, reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// In-memory source, mostly for tests and embedding.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(name, Cursor::new(bytes.into()))
    }

    pub fn stdin() -> Self {
        Self::new("<stdin>", tokio::io::stdin())
    }

    /// Open a file, or standard input for `-`.
    pub async fn open(path: &str) -> GrouperResult<Self> {
        if path == STDIN_SENTINEL {
            return Ok(Self::stdin());
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| GrouperError::SourceOpen {
                source_name: path.to_string(),
                source,
            })?;
        Ok(Self::new(path, file))
    }

    /// Open every path before anything is read; the first failure aborts.
    /// No paths means standard input.
    pub async fn open_all(paths: &[String]) -> GrouperResult<Vec<Self>> {
        if paths.is_empty() {
            return Ok(vec![Self::stdin()]);
        }

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            sources.push(Self::open(path).await?);
        }
        Ok(sources)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_parts(self) -> (String, Box<dyn AsyncRead + Send + Unpin>) {
        (self.name, self.reader)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("name", &self.name).finish_non_exhaustive()
    }
}
