use std::path::PathBuf;

use crate::io;

/// Where the raw corpus text comes from.
pub trait CorpusSource {
    /// Human readable origin, used in errors and logs.
    fn describe(&self) -> String;

    fn fetch(&mut self) -> anyhow::Result<String>;
}

/// Reads the corpus from a UTF-8 text file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&mut self) -> anyhow::Result<String> {
        Ok(io::read_corpus(&self.path)?)
    }
}

/// Corpus text already held in memory.
#[derive(Debug, Clone)]
pub struct TextSource(pub String);

impl CorpusSource for TextSource {
    fn describe(&self) -> String {
        "<in-memory corpus>".to_string()
    }

    fn fetch(&mut self) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}
