//! Source text storage.
//!
//! Diagnostics store spans, not text. The source map keeps every file so a
//! `Code` section can be rendered long after checking finished.

use rustc_hash::FxHashMap;

use crate::FileId;

/// Errors raised while building a [`SourceMap`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("source file '{0}' was added more than once")]
    DuplicatePath(String),
    #[error("source file '{path}' is {len} bytes, which exceeds the 4 GiB span limit")]
    TooLarge { path: String, len: usize },
}

/// One source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    pub path: String,
    pub text: String,
}

impl SourceFile {
    /// Empty or whitespace-only files are skipped by the driver.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered collection of source files, addressable by [`FileId`] or path.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    by_path: FxHashMap<String, FileId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning its id.
    ///
    /// Files keep insertion order; declaration order across files follows it.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<FileId, SourceError> {
        let path = path.into();
        let text = text.into();
        if self.by_path.contains_key(&path) {
            return Err(SourceError::DuplicatePath(path));
        }
        if u32::try_from(text.len()).is_err() {
            return Err(SourceError::TooLarge {
                len: text.len(),
                path,
            });
        }
        let raw = u32::try_from(self.files.len()).map_err(|_| SourceError::TooLarge {
            path: path.clone(),
            len: text.len(),
        })?;
        let id = FileId::from_raw(raw);
        self.by_path.insert(path.clone(), id);
        self.files.push(SourceFile { id, path, text });
        Ok(id)
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn path(&self, id: FileId) -> Option<&str> {
        self.get(id).map(|file| file.path.as_str())
    }

    pub fn text(&self, id: FileId) -> Option<&str> {
        self.get(id).map(|file| file.text.as_str())
    }

    pub fn lookup(&self, path: &str) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests;
