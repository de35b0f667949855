//! SQLite-backed response store.
//!
//! One row per extracted response, keyed by response_id; one row per
//! processing run. Re-running a transcript replaces rows with the same ids
//! instead of duplicating them.

use crate::error::{Result, SitatError};
use crate::extraction::ExtractedResponse;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Metadata for one recorded processing run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub run_id: String,
    pub company: String,
    pub interviewee_name: String,
    pub response_count: usize,
    pub created_at: DateTime<Utc>,
}

/// SQLite store for extracted responses.
pub struct ResponseStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
    response_id TEXT PRIMARY KEY,
    run_id TEXT NOT NULL,
    verbatim_response TEXT NOT NULL,
    subject TEXT NOT NULL,
    question TEXT NOT NULL,
    deal_status TEXT NOT NULL,
    company TEXT NOT NULL,
    interviewee_name TEXT NOT NULL,
    date_of_interview TEXT NOT NULL,
    key_insight TEXT,
    start_timestamp TEXT,
    end_timestamp TEXT
);

CREATE INDEX IF NOT EXISTS idx_responses_run_id ON responses(run_id);
CREATE INDEX IF NOT EXISTS idx_responses_company ON responses(company);

CREATE TABLE IF NOT EXISTS runs (
    run_id TEXT PRIMARY KEY,
    company TEXT NOT NULL,
    interviewee_name TEXT NOT NULL,
    response_count INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;

impl ResponseStore {
    /// Open (or create) a store at the given path.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized response store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record one run and its rows in a single transaction. Returns the run id.
    #[instrument(skip(self, responses))]
    pub fn record_run(
        &self,
        company: &str,
        interviewee_name: &str,
        responses: &[ExtractedResponse],
    ) -> Result<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SitatError::Store(format!("Failed to acquire lock: {}", e)))?;

        let run_id = Uuid::new_v4().to_string();
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO runs (run_id, company, interviewee_name, response_count, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                run_id,
                company,
                interviewee_name,
                responses.len(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        for response in responses {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO responses
                (response_id, run_id, verbatim_response, subject, question, deal_status,
                 company, interviewee_name, date_of_interview, key_insight,
                 start_timestamp, end_timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    response.response_id,
                    run_id,
                    response.verbatim_response,
                    response.subject,
                    response.question,
                    response.deal_status,
                    response.company,
                    response.interviewee_name,
                    response.date_of_interview,
                    response.key_insight,
                    response.start_timestamp,
                    response.end_timestamp,
                ],
            )?;
        }

        tx.commit()?;
        info!("Recorded run {} with {} responses", run_id, responses.len());
        Ok(run_id)
    }

    /// List recorded runs, newest first.
    #[instrument(skip(self))]
    pub fn list_runs(&self) -> Result<Vec<RunRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SitatError::Store(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, company, interviewee_name, response_count, created_at
            FROM runs
            ORDER BY created_at DESC
            "#,
        )?;

        let runs = stmt.query_map([], |row| {
            let count: i64 = row.get(3)?;
            let created_at_str: String = row.get(4)?;
            Ok(RunRecord {
                run_id: row.get(0)?,
                company: row.get(1)?,
                interviewee_name: row.get(2)?,
                response_count: count as usize,
                created_at: DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(runs.filter_map(|r| r.ok()).collect())
    }

    /// Fetch all responses for a run, in id order.
    #[instrument(skip(self))]
    pub fn get_by_run(&self, run_id: &str) -> Result<Vec<ExtractedResponse>> {
        self.query_responses("run_id = ?1", run_id)
    }

    /// Fetch all responses recorded for a company, across runs.
    #[instrument(skip(self))]
    pub fn get_by_company(&self, company: &str) -> Result<Vec<ExtractedResponse>> {
        self.query_responses("company = ?1", company)
    }

    fn query_responses(&self, filter: &str, value: &str) -> Result<Vec<ExtractedResponse>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SitatError::Store(format!("Failed to acquire lock: {}", e)))?;

        let sql = format!(
            r#"
            SELECT response_id, verbatim_response, subject, question, deal_status,
                   company, interviewee_name, date_of_interview, key_insight,
                   start_timestamp, end_timestamp
            FROM responses
            WHERE {}
            ORDER BY response_id
            "#,
            filter
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![value], |row| {
            Ok(ExtractedResponse {
                response_id: row.get(0)?,
                verbatim_response: row.get(1)?,
                subject: row.get(2)?,
                question: row.get(3)?,
                deal_status: row.get(4)?,
                company: row.get(5)?,
                interviewee_name: row.get(6)?,
                date_of_interview: row.get(7)?,
                key_insight: row.get(8)?,
                start_timestamp: row.get(9)?,
                end_timestamp: row.get(10)?,
            })
        })?;

        let result: Vec<ExtractedResponse> = rows.filter_map(|r| r.ok()).collect();
        debug!("Found {} responses", result.len());
        Ok(result)
    }
}
