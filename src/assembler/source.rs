//! Where program text comes from.
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use super::error::{Error, Result};

/// Supplies the full text of a named source.
pub trait SourceProvider {
    fn load(&self, name: &str) -> Result<String>;
}

/// Reads sources from the filesystem, `name` being a path.
#[derive(Copy, Clone, Debug, Default)]
pub struct FileSource;

impl SourceProvider for FileSource {
    fn load(&self, name: &str) -> Result<String> {
        let unavailable = |source: io::Error| Error::SourceUnavailable { name: name.to_owned(), source };

        let file = File::open(name).map_err(unavailable)?;
        let mut text = String::new();
        for line in BufReader::new(file).lines() {
            // Every line ends in a separator, including the last.
            text.push_str(&line.map_err(unavailable)?);
            text.push(' ');
        }

        debug!("loaded `{}` ({} bytes)", name, text.len());
        Ok(text)
    }
}

/// In-memory sources, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct StrSource {
    sources: HashMap<String, String>,
}

impl StrSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>, T: Into<String>>(&mut self, name: N, text: T) {
        self.sources.insert(name.into(), text.into());
    }
}

impl SourceProvider for StrSource {
    fn load(&self, name: &str) -> Result<String> {
        self.sources.get(name).cloned().ok_or_else(|| Error::SourceUnavailable {
            name: name.to_owned(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such source"),
        })
    }
}
