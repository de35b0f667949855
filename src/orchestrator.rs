//! Pipeline orchestrator for Sitat.
//!
//! Coordinates the full path from raw transcript text to deduplicated
//! extracted responses: parse, chunk, extract concurrently with retries,
//! then dedup.

use crate::chunking::{ChunkingConfig, QaChunker};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::extraction::{
    clean_chunk, dedup_responses, is_low_value, looks_like_qa, parse_extraction, word_count,
    ExtractedResponse, InterviewContext, OpenAiExtractor, QuoteExtractor,
};
use crate::transcript::{self, detect_format, infer_missing_ends, FormatTag, Segment};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Quality grade attached to each processed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityGrade {
    Ok,
    Low,
}

/// Per-chunk processing note for the run report.
#[derive(Debug, Clone)]
pub struct QualityRecord {
    pub chunk_index: usize,
    pub grade: QualityGrade,
    pub notes: String,
}

/// Counters for one processing run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub chunks_total: usize,
    pub chunks_skipped: usize,
    pub chunks_failed: usize,
    pub rows_extracted: usize,
    pub rows_after_dedup: usize,
}

/// Everything one processing run produced.
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Deduplicated responses, in chunk order.
    pub responses: Vec<ExtractedResponse>,
    pub quality: Vec<QualityRecord>,
    pub stats: RunStats,
    /// The transcript format that was detected.
    pub format: FormatTag,
}

/// The main orchestrator for the Sitat pipeline.
pub struct Orchestrator {
    settings: Settings,
    chunker: QaChunker,
    extractor: Arc<dyn QuoteExtractor>,
}

/// What processing one chunk yielded.
struct ChunkResult {
    responses: Vec<ExtractedResponse>,
    record: QualityRecord,
    skipped: bool,
    failed: bool,
}

impl Orchestrator {
    /// Create an orchestrator with the OpenAI extractor.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let extractor: Arc<dyn QuoteExtractor> = Arc::new(
            OpenAiExtractor::with_model(&settings.extraction.model).with_prompts(prompts),
        );

        Self::with_components(settings, extractor)
    }

    /// Create an orchestrator with a custom extraction backend.
    pub fn with_components(settings: Settings, extractor: Arc<dyn QuoteExtractor>) -> Result<Self> {
        let chunker = QaChunker::new(&Self::chunking_config(&settings))?;
        Ok(Self {
            settings,
            chunker,
            extractor,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn chunking_config(settings: &Settings) -> ChunkingConfig {
        ChunkingConfig {
            target_tokens: settings.chunking.target_tokens,
            overlap_tokens: settings.chunking.overlap_tokens,
        }
    }

    /// Process one transcript end to end.
    ///
    /// A chunk that fails all its attempts contributes zero rows; the run
    /// itself still succeeds. An unstructured transcript with nothing worth
    /// extracting yields an outcome with no responses, not an error.
    #[instrument(skip(self, text), fields(company = %context.company))]
    pub async fn process_transcript(
        &self,
        text: &str,
        context: &InterviewContext,
    ) -> Result<ExtractionOutcome> {
        let format = detect_format(text);
        info!("Detected transcript format: {}", format);

        let mut segments = transcript::parse(text, format);
        infer_missing_ends(&mut segments);

        let normalized = segments
            .iter()
            .map(Segment::format_display)
            .collect::<Vec<_>>()
            .join("\n");

        let config = Self::chunking_config(&self.settings);
        let set = self.chunker.chunk(&normalized, &config)?;
        info!("Chunked transcript into {} chunks", set.chunks.len());

        let mut stats = RunStats {
            chunks_total: set.chunks.len(),
            ..Default::default()
        };

        let mut results: Vec<(usize, ChunkResult)> = Vec::with_capacity(set.chunks.len());
        let mut stream = stream::iter(set.chunks.iter().enumerate())
            .map(|(idx, chunk)| {
                let found_qa = set.found_qa;
                async move { (idx, self.process_chunk(idx, chunk, context, found_qa).await) }
            })
            .buffer_unordered(self.settings.extraction.max_concurrent.max(1));

        while let Some((idx, result)) = stream.next().await {
            results.push((idx, result));
        }

        // Restore chunk order before dedup so first-seen wins deterministically.
        results.sort_by_key(|(idx, _)| *idx);

        let mut responses = Vec::new();
        let mut quality = Vec::new();
        for (_, result) in results {
            if result.skipped {
                stats.chunks_skipped += 1;
            }
            if result.failed {
                stats.chunks_failed += 1;
            }
            stats.rows_extracted += result.responses.len();
            responses.extend(result.responses);
            quality.push(result.record);
        }

        let responses = dedup_responses(responses);
        stats.rows_after_dedup = responses.len();

        info!(
            "Run complete: {} chunks ({} skipped, {} failed), {} rows ({} after dedup)",
            stats.chunks_total,
            stats.chunks_skipped,
            stats.chunks_failed,
            stats.rows_extracted,
            stats.rows_after_dedup
        );

        Ok(ExtractionOutcome {
            responses,
            quality,
            stats,
            format,
        })
    }

    /// Run one chunk through cleaning, filtering, and the retry loop.
    async fn process_chunk(
        &self,
        chunk_index: usize,
        chunk: &str,
        context: &InterviewContext,
        found_qa: bool,
    ) -> ChunkResult {
        // The Q&A filter only applies when the transcript actually carries
        // Q&A markers; speaker-turn chunks go straight through.
        if found_qa && !looks_like_qa(chunk) {
            return ChunkResult {
                responses: Vec::new(),
                record: QualityRecord {
                    chunk_index,
                    grade: QualityGrade::Low,
                    notes: "No question/answer structure found".to_string(),
                },
                skipped: true,
                failed: false,
            };
        }

        let (cleaned, timestamps) = clean_chunk(chunk);
        if is_low_value(&cleaned) {
            return ChunkResult {
                responses: Vec::new(),
                record: QualityRecord {
                    chunk_index,
                    grade: QualityGrade::Low,
                    notes: "Cleaned text too short or pure acknowledgment".to_string(),
                },
                skipped: true,
                failed: false,
            };
        }

        let grade = if word_count(&cleaned) * 5 < word_count(chunk) {
            QualityGrade::Low
        } else {
            QualityGrade::Ok
        };

        let seed = context.response_id_seed(chunk_index);
        let max_retries = self.settings.extraction.max_retries.max(1);

        for attempt in 1..=max_retries {
            let raw = match self.extractor.extract(&cleaned, context).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Chunk {} attempt {}/{} failed: {}",
                        chunk_index, attempt, max_retries, e
                    );
                    continue;
                }
            };

            match parse_extraction(&raw) {
                Ok(parsed) => {
                    let responses: Vec<ExtractedResponse> = parsed
                        .into_items()
                        .into_iter()
                        .enumerate()
                        .map(|(item_idx, fields)| {
                            ExtractedResponse::from_fields(
                                fields,
                                context,
                                format!("{}_{}", seed, item_idx),
                                &timestamps,
                            )
                        })
                        .collect();

                    let notes = match grade {
                        QualityGrade::Ok => format!("{} rows", responses.len()),
                        QualityGrade::Low => "Cleaning removed most of the chunk".to_string(),
                    };

                    return ChunkResult {
                        responses,
                        record: QualityRecord {
                            chunk_index,
                            grade,
                            notes,
                        },
                        skipped: false,
                        failed: false,
                    };
                }
                Err(e) => {
                    warn!(
                        "Chunk {} attempt {}/{}: unparseable response: {}",
                        chunk_index, attempt, max_retries, e
                    );
                }
            }
        }

        let snippet: String = chunk.chars().take(120).collect();
        warn!(
            "Chunk {} dropped after {} attempts: {:?}",
            chunk_index, max_retries, snippet
        );

        ChunkResult {
            responses: Vec::new(),
            record: QualityRecord {
                chunk_index,
                grade: QualityGrade::Low,
                notes: format!("Dropped after {} failed attempts", max_retries),
            },
            skipped: false,
            failed: true,
        }
    }
}
