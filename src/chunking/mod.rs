//! Token-budgeted chunking for LLM context windows.
//!
//! Regroups transcript text into overlapping chunks sized by a token budget,
//! preferring to cut at Q&A or speaker-turn boundaries so that whole
//! exchanges stay together in one LLM call.

mod splitter;

pub use splitter::TextSplitter;

use crate::error::Result;
use regex::Regex;
use tracing::debug;

/// Hard cap on segments per chunk. Very short turns would otherwise pack
/// dozens of exchanges under the token budget and erode per-chunk focus.
const MAX_SEGMENTS_PER_CHUNK: usize = 8;

/// Rough characters-per-token multiplier used to size the overlap window.
const OVERLAP_CHARS_PER_TOKEN: usize = 4;

/// Chunking parameters.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Token budget per chunk.
    pub target_tokens: usize,
    /// Token budget for the overlap carried into the next chunk.
    pub overlap_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_tokens: 2000,
            overlap_tokens: 200,
        }
    }
}

/// The chunks produced for one transcript.
#[derive(Debug, Clone)]
pub struct ChunkSet {
    /// Ordered chunk texts.
    pub chunks: Vec<String>,
    /// Whether explicit Q&A markers were found. When false the transcript
    /// was split on speaker turns instead, and downstream Q&A lexical
    /// filters do not apply.
    pub found_qa: bool,
}

/// Q&A-boundary-preserving token-budgeted chunker.
pub struct QaChunker {
    splitter: TextSplitter,
    qa_markers: Vec<Regex>,
    speaker_markers: Vec<Regex>,
    boundary: Regex,
}

impl QaChunker {
    /// Create a chunker with the given budget.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        let qa_markers = vec![
            Regex::new(r"(?m)^\s*(?:Q|A)\s*[:.]").expect("Invalid regex"),
            Regex::new(r"(?m)^\s*(?:Question|Answer)\s*[:.]").expect("Invalid regex"),
            Regex::new(r"(?m)^\s*(?:Interviewer|Interviewee|Moderator)\s*:").expect("Invalid regex"),
        ];
        let speaker_markers = vec![
            Regex::new(r"(?m)^Speaker \d+\s*\([^)]*\):").expect("Invalid regex"),
            Regex::new(r"(?m)^[A-Z][A-Za-z .'-]{0,40}\([^)]*\):").expect("Invalid regex"),
            Regex::new(r"(?m)^[A-Z][A-Za-z .'-]{0,40}:").expect("Invalid regex"),
        ];
        // Any recognizable boundary, for trimming the overlap window.
        let boundary = Regex::new(
            r"(?m)^\s*(?:Q|A|Question|Answer|Interviewer|Interviewee|Moderator)\s*[:.]|(?m)^[A-Z][A-Za-z .'-]{0,40}(?:\([^)]*\))?:",
        )
        .expect("Invalid regex");

        Ok(Self {
            splitter: TextSplitter::new(config.target_tokens, config.overlap_tokens)?,
            qa_markers,
            speaker_markers,
            boundary,
        })
    }

    /// Count tokens in a piece of text.
    pub fn token_count(&self, text: &str) -> usize {
        self.splitter.token_count(text)
    }

    /// Split a transcript into token-budgeted chunks.
    ///
    /// Segments are cut at explicit Q&A markers when present, otherwise at
    /// speaker-turn markers. Greedy accumulation closes a chunk when the next
    /// segment would exceed the budget or the chunk already holds
    /// [`MAX_SEGMENTS_PER_CHUNK`] segments. Each chunk after the first is
    /// seeded with a boundary-aligned overlap from its predecessor. Chunks
    /// that still exceed the budget (a single oversized segment) are re-split
    /// by the recursive token splitter.
    pub fn chunk(&self, text: &str, config: &ChunkingConfig) -> Result<ChunkSet> {
        let (segments, found_qa) = self.split_segments(text);
        if segments.is_empty() {
            return Ok(ChunkSet {
                chunks: Vec::new(),
                found_qa,
            });
        }

        let mut chunks: Vec<String> = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut buffer_tokens = 0usize;
        let mut buffer_segments = 0usize;

        for segment in segments {
            let segment_tokens = self.token_count(&segment);
            let joiner = if buffer.is_empty() { 0 } else { 1 };

            let over_budget = buffer_tokens + segment_tokens + joiner > config.target_tokens;
            let at_cap = buffer_segments >= MAX_SEGMENTS_PER_CHUNK;

            if !buffer.is_empty() && (over_budget || at_cap) {
                let chunk = buffer.join("\n");
                let seed = self.overlap_seed(&chunk, config.overlap_tokens);
                chunks.push(chunk);

                buffer.clear();
                buffer_tokens = 0;
                buffer_segments = 0;
                if !seed.is_empty() {
                    buffer_tokens = self.token_count(&seed);
                    buffer.push(seed);
                }
            }

            let joiner = if buffer.is_empty() { 0 } else { 1 };
            buffer_tokens += segment_tokens + joiner;
            buffer.push(segment);
            buffer_segments += 1;
        }

        if !buffer.is_empty() {
            chunks.push(buffer.join("\n"));
        }

        // A single source segment can be larger than the whole budget; those
        // chunks go through the recursive splitter.
        let mut bounded = Vec::new();
        for chunk in chunks {
            if self.token_count(&chunk) > config.target_tokens {
                bounded.extend(self.splitter.split(&chunk));
            } else {
                bounded.push(chunk);
            }
        }

        debug!(
            "Chunked transcript into {} chunks (found_qa: {})",
            bounded.len(),
            found_qa
        );

        Ok(ChunkSet {
            chunks: bounded,
            found_qa,
        })
    }

    /// Split text at Q&A markers, falling back to speaker-turn markers.
    fn split_segments(&self, text: &str) -> (Vec<String>, bool) {
        let qa_segments = split_at_markers(text, &self.qa_markers);
        if !qa_segments.is_empty() {
            return (qa_segments, true);
        }

        let speaker_segments = split_at_markers(text, &self.speaker_markers);
        if !speaker_segments.is_empty() {
            return (speaker_segments, false);
        }

        // No recognizable structure; the whole text is one segment.
        let trimmed = text.trim();
        if trimmed.is_empty() {
            (Vec::new(), false)
        } else {
            (vec![trimmed.to_string()], false)
        }
    }

    /// Take the trailing overlap window of a closed chunk, trimmed forward to
    /// the nearest Q&A/speaker boundary so it does not start mid-sentence
    /// when avoidable. The window is sized by a characters-per-token
    /// approximation rather than exact token slicing.
    fn overlap_seed(&self, chunk: &str, overlap_tokens: usize) -> String {
        if overlap_tokens == 0 {
            return String::new();
        }

        let window_chars = overlap_tokens * OVERLAP_CHARS_PER_TOKEN;
        let char_count = chunk.chars().count();
        let window: &str = if char_count <= window_chars {
            chunk
        } else {
            let skip = char_count - window_chars;
            match chunk.char_indices().nth(skip) {
                Some((byte_idx, _)) => &chunk[byte_idx..],
                None => chunk,
            }
        };

        match self.boundary.find(window) {
            Some(m) => window[m.start()..].trim().to_string(),
            None => window.trim().to_string(),
        }
    }
}

/// Slice text into pieces starting at each marker match, in document order.
/// Content before the first marker becomes a leading piece. Empty when no
/// marker from the set matches at all.
fn split_at_markers(text: &str, markers: &[Regex]) -> Vec<String> {
    let mut starts: Vec<usize> = markers
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.start()))
        .collect();

    if starts.is_empty() {
        return Vec::new();
    }

    starts.sort_unstable();
    starts.dedup();

    let mut pieces = Vec::new();
    if starts[0] > 0 {
        let head = text[..starts[0]].trim();
        if !head.is_empty() {
            pieces.push(head.to_string());
        }
    }

    for window in starts.windows(2) {
        let piece = text[window[0]..window[1]].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
    }

    if let Some(&last) = starts.last() {
        let tail = text[last..].trim();
        if !tail.is_empty() {
            pieces.push(tail.to_string());
        }
    }

    pieces
}
