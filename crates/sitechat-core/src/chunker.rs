//! Word-window chunking with a fixed overlap.

use crate::config::ChunkingSettings;
use crate::error::{Error, Result};

pub const DEFAULT_WINDOW: usize = 400;
pub const DEFAULT_OVERLAP: usize = 50;

/// A validated `(window, overlap)` pair measured in whitespace-separated words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    window: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self { window: DEFAULT_WINDOW, overlap: DEFAULT_OVERLAP }
    }
}

impl Chunker {
    pub fn new(window: usize, overlap: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::Configuration("chunk window must be at least one word".to_string()));
        }
        if overlap >= window {
            return Err(Error::Configuration(format!(
                "chunk overlap ({overlap}) must be smaller than the window ({window})"
            )));
        }
        Ok(Self { window, overlap })
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.window, settings.overlap)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splits `text` into windows of `window` words, each starting
    /// `window - overlap` words after the previous one.
    ///
    /// Splitting stops once a window reaches the last word, so the final
    /// chunk may be shorter than `window` but is never fully contained in
    /// its predecessor. Whitespace-only text yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let step = self.window - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + self.window).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

/// Convenience wrapper validating `window`/`overlap` and chunking in one call.
pub fn chunk(text: &str, window: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(window, overlap)?.chunk(text))
}
