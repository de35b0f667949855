//! Sitat - Interview Quote Extraction
//!
//! A CLI tool for segmenting customer interview transcripts and extracting
//! verbatim quotes with LLMs.
//!
//! The name "Sitat" comes from the Norwegian/Scandinavian word for "quote."
//!
//! # Overview
//!
//! Sitat allows you to:
//! - Parse interview transcripts in several common speaker/timestamp layouts
//! - Pair interviewer questions with customer answers
//! - Split transcripts into token-budgeted chunks for LLM extraction
//! - Extract verbatim customer quotes with metadata into CSV, JSON, or SQLite
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `timestamp` - Timestamp normalization
//! - `transcript` - Format detection, segment parsing, and Q&A pairing
//! - `chunking` - Token-budgeted chunking for LLM context windows
//! - `extraction` - LLM-backed quote extraction, filtering, and dedup
//! - `store` - Local response store
//! - `export` - CSV/JSON output
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use sitat::config::Settings;
//! use sitat::extraction::InterviewContext;
//! use sitat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let transcript = std::fs::read_to_string("interview.txt")?;
//!     let context = InterviewContext::new("acme", "Acme Corp", "Brian", "closed won", "2024-01-15");
//!     let outcome = orchestrator.process_transcript(&transcript, &context).await?;
//!     println!("Extracted {} responses", outcome.responses.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod openai;
pub mod orchestrator;
pub mod store;
pub mod timestamp;
pub mod transcript;

pub use error::{Result, SitatError};
