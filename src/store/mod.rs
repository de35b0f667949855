//! Persistence for extraction runs and their rows.

mod sqlite;

pub use sqlite::{ResponseStore, RunRecord};
