//! Configuration module for Sitat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ExtractionPrompts, Prompts};
pub use settings::{
    ChunkingSettings, ExtractionSettings, GeneralSettings, PromptSettings, Settings,
    StoreSettings,
};
