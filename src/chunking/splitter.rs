//! Recursive token-aware text splitter.
//!
//! Fallback for transcript segments that are individually larger than the
//! chunk token budget. Splits on a separator preference order (paragraph
//! break, newline, sentence end, space) and greedily re-merges pieces up to
//! the budget, carrying a token-bounded overlap between chunks.

use crate::error::{Result, SitatError};
use tiktoken_rs::CoreBPE;

/// Separators tried most-preferred first. The empty string is the last
/// resort: character-by-character splitting.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", " ", ""];

/// Token-counting recursive splitter backed by the cl100k tokenizer.
pub struct TextSplitter {
    tokenizer: CoreBPE,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter with the given token budget and overlap.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_overlap >= chunk_size {
            return Err(SitatError::Chunking(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }

        let tokenizer = tiktoken_rs::cl100k_base()
            .map_err(|e| SitatError::Chunking(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            tokenizer,
            chunk_size,
            chunk_overlap,
        })
    }

    /// Count tokens in a piece of text.
    pub fn token_count(&self, text: &str) -> usize {
        self.tokenizer.encode_ordinary(text).len()
    }

    /// The configured token budget per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split text into chunks, each within the token budget.
    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut chunks = self.split_recursive(trimmed, SEPARATORS);
        chunks.retain(|c| !c.trim().is_empty());
        for chunk in &mut chunks {
            *chunk = chunk.trim().to_string();
        }
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if separators.is_empty() {
            return vec![text.to_string()];
        }

        // Pick the first separator that actually occurs in the text, so a
        // split always makes progress.
        let mut separator = separators[separators.len() - 1];
        let mut remaining: &[&str] = &[];
        for (i, s) in separators.iter().enumerate() {
            if s.is_empty() || text.contains(s) {
                separator = s;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<&str> = if separator.is_empty() {
            split_chars(text)
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut final_chunks = Vec::new();
        let mut fitting: Vec<(String, usize)> = Vec::new();

        for piece in pieces {
            let piece_tokens = self.token_count(piece);
            if piece_tokens < self.chunk_size {
                fitting.push((piece.to_string(), piece_tokens));
            } else {
                if !fitting.is_empty() {
                    final_chunks.extend(self.merge_pieces(&fitting, separator));
                    fitting.clear();
                }
                if remaining.is_empty() {
                    final_chunks.push(piece.to_string());
                } else {
                    final_chunks.extend(self.split_recursive(piece, remaining));
                }
            }
        }

        if !fitting.is_empty() {
            final_chunks.extend(self.merge_pieces(&fitting, separator));
        }

        final_chunks
    }

    /// Greedily merge under-budget pieces into chunks as large as possible,
    /// keeping a tail of pieces as overlap when a chunk closes.
    fn merge_pieces(&self, pieces: &[(String, usize)], separator: &str) -> Vec<String> {
        let separator_tokens = if separator.is_empty() {
            0
        } else {
            self.token_count(separator)
        };

        let mut merged = Vec::new();
        let mut current: Vec<(String, usize)> = Vec::new();
        let mut current_tokens = 0usize;

        for (piece, piece_tokens) in pieces {
            let joiner = if current.is_empty() { 0 } else { separator_tokens };

            if current_tokens + piece_tokens + joiner > self.chunk_size && !current.is_empty() {
                if let Some(chunk) = join_pieces(&current, separator) {
                    merged.push(chunk);
                }

                // Drop pieces from the front until the carried tail fits the
                // overlap budget. Greedy; may shed slightly more than needed.
                while current_tokens > self.chunk_overlap && !current.is_empty() {
                    let (_, front_tokens) = current.remove(0);
                    let front_joiner = if current.is_empty() { 0 } else { separator_tokens };
                    current_tokens = current_tokens.saturating_sub(front_tokens + front_joiner);
                }
            }

            current.push((piece.clone(), *piece_tokens));
            let joiner = if current.len() > 1 { separator_tokens } else { 0 };
            current_tokens += piece_tokens + joiner;
        }

        if let Some(chunk) = join_pieces(&current, separator) {
            merged.push(chunk);
        }

        merged
    }
}

fn join_pieces(pieces: &[(String, usize)], separator: &str) -> Option<String> {
    let joined = pieces
        .iter()
        .map(|(p, _)| p.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

/// Split into single-character slices without allocating per character.
fn split_chars(text: &str) -> Vec<&str> {
    let mut out = Vec::with_capacity(text.len());
    let mut start = 0;
    for (i, c) in text.char_indices() {
        out.push(&text[start..i + c.len_utf8()]);
        start = i + c.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overlap_larger_than_size() {
        assert!(TextSplitter::new(100, 100).is_err());
        assert!(TextSplitter::new(100, 10).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let splitter = TextSplitter::new(100, 10).unwrap();
        assert!(splitter.split("   \n  ").is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = TextSplitter::new(100, 10).unwrap();
        let chunks = splitter.split("A short sentence.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "A short sentence.");
    }

    #[test]
    fn test_all_chunks_within_budget() {
        let splitter = TextSplitter::new(40, 8).unwrap();
        let text = "The first paragraph talks about onboarding and timelines.\n\n\
                    The second paragraph covers pricing, contract terms, and renewals. \
                    It goes on for a while about the negotiation process and the \
                    discounts that were offered near the end of the quarter.\n\n\
                    The third paragraph is about support quality and response times.";
        let chunks = splitter.split(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                splitter.token_count(chunk) <= 40,
                "chunk over budget: {:?}",
                chunk
            );
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let splitter = TextSplitter::new(30, 10).unwrap();
        let words: Vec<String> = (0..120).map(|i| format!("word{}", i)).collect();
        let text = words.join(" ");
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev_tail: Vec<&str> = pair[0].split_whitespace().collect();
            let next_head = pair[1].split_whitespace().next().unwrap();
            assert!(
                prev_tail.contains(&next_head),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}
