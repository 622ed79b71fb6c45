//! Recursive character splitter with exact overlap windows.
//!
//! Prefers breaking at semantic boundaries, in priority order: paragraph
//! break, line break, sentence-ending punctuation, word boundary. When no
//! boundary fits inside the window the chunk is hard-split at the character
//! limit (lossy for a single oversized semantic unit, but bounded).
//!
//! Consecutive chunks share exactly `overlap` characters, so stripping the
//! leading `overlap` characters of every chunk after the first reconstructs
//! the original text. All counts are in characters, not bytes.

use super::Chunk;
use crate::error::{Result, SvarError};

/// Separator classes, highest priority first.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
}

impl Boundary {
    const ALL: [Boundary; 4] = [
        Boundary::Paragraph,
        Boundary::Line,
        Boundary::Sentence,
        Boundary::Word,
    ];

    /// Whether a chunk may end just before index `p`.
    fn ends_at(&self, chars: &[char], p: usize) -> bool {
        match self {
            Boundary::Paragraph => p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n',
            Boundary::Line => chars[p - 1] == '\n',
            Boundary::Sentence => matches!(chars[p - 1], '.' | '!' | '?'),
            Boundary::Word => chars[p - 1].is_whitespace(),
        }
    }
}

/// Splits text into overlapping chunks of at most `chunk_size` characters.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl RecursiveSplitter {
    /// Create a splitter. Requires `0 <= overlap < chunk_size` so every
    /// step advances past the previous chunk's overlap region.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SvarError::Config("chunk_size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(SvarError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into chunk strings. Empty or whitespace-only input
    /// produces no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(n);
            let end = if hard_end == n {
                n
            } else {
                self.pick_break(&chars, start, hard_end)
            };

            chunks.push(chars[start..end].iter().collect());

            if end == n {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }

    /// Split a transcript into [`Chunk`]s for a video.
    pub fn split_video(&self, text: &str, video_id: &str) -> Vec<Chunk> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, i, video_id.to_string()))
            .collect()
    }

    /// Latest boundary of the highest-priority class inside the window.
    ///
    /// A boundary must leave the chunk longer than `overlap` characters,
    /// otherwise the next start would not advance. Falls back to a hard
    /// character cut when no class matches.
    fn pick_break(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let min_end = start + self.overlap + 1;
        for class in Boundary::ALL {
            let mut p = hard_end;
            while p >= min_end {
                if class.ends_at(chars, p) {
                    return p;
                }
                p -= 1;
            }
        }
        hard_end
    }
}
