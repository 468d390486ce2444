//! Parsing many files at once.
//!
//! Each file is an independent unit of work on its own scoped thread; nothing
//! mutable is shared between them. Finished files go into a [`Registry`],
//! which is immutable and can be read from any number of threads.

use std::sync::Arc;
use std::thread;

use indexmap::IndexMap;

use crate::ast::FileNode;
use crate::diagnostics::Diagnostics;
use crate::{ParseConfig, Result, parse};

/// A parsed file and everything reported while parsing it.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: FileNode,
    pub diagnostics: Diagnostics,
}

impl ParsedFile {
    pub fn name(&self) -> &str {
        self.file.name()
    }
}

#[derive(Debug)]
pub struct ParseResult {
    pub parsed: ParsedFile,
    pub result: Result<()>,
}

impl ParseResult {
    pub fn name(&self) -> &str {
        self.parsed.name()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parses every `(name, source)` pair concurrently. Results keep the input
/// order.
///
/// A panic while parsing one file (an internal invariant violation) is
/// propagated once all threads have finished.
pub fn parse_all<N, S>(sources: &[(N, S)], config: &ParseConfig) -> Vec<ParseResult>
where
    N: AsRef<str> + Sync,
    S: AsRef<[u8]> + Sync,
{
    tracing::debug!(files = sources.len(), "parsing files");
    thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|(name, source)| {
                scope.spawn(move || parse_one(name.as_ref(), source.as_ref(), config))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

fn parse_one(name: &str, source: &[u8], config: &ParseConfig) -> ParseResult {
    let mut diagnostics = Diagnostics::new();
    let (file, result) = parse(name, source, &mut diagnostics, config);
    ParseResult {
        parsed: ParsedFile { file, diagnostics },
        result,
    }
}

/// Completed files by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    files: IndexMap<String, Arc<ParsedFile>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. A file with the same name is replaced.
    pub fn insert(&mut self, parsed: ParsedFile) -> Arc<ParsedFile> {
        let name = parsed.name().to_string();
        let parsed = Arc::new(parsed);
        if self.files.insert(name, Arc::clone(&parsed)).is_some() {
            tracing::warn!(file = parsed.name(), "replacing registered file");
        }
        parsed
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ParsedFile>> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ParsedFile>> {
        self.files.values()
    }

    /// Files that reported at least one error.
    pub fn failed(&self) -> impl Iterator<Item = &Arc<ParsedFile>> {
        self.files.values().filter(|f| f.diagnostics.has_errors())
    }
}

impl FromIterator<ParseResult> for Registry {
    fn from_iter<I: IntoIterator<Item = ParseResult>>(results: I) -> Self {
        let mut registry = Registry::new();
        for result in results {
            registry.insert(result.parsed);
        }
        registry
    }
}
