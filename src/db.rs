//! Survey response storage

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::models::SurveyResponse;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS survey_responses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            age_group TEXT NOT NULL,
            support TEXT NOT NULL,
            change TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_survey_responses_support ON survey_responses(support);
        "#,
    )?;
    Ok(())
}

/// Insert a single response
pub fn insert_response(conn: &Connection, response: &SurveyResponse) -> Result<()> {
    conn.execute(
        "INSERT INTO survey_responses (age_group, support, change) VALUES (?1, ?2, ?3)",
        (
            response.age_group.label(),
            response.support.label(),
            response.change.label(),
        ),
    )?;
    Ok(())
}

/// Insert a batch of responses in one transaction
pub fn insert_responses(conn: &mut Connection, responses: &[SurveyResponse]) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO survey_responses (age_group, support, change) VALUES (?1, ?2, ?3)",
        )?;
        for response in responses {
            stmt.execute((
                response.age_group.label(),
                response.support.label(),
                response.change.label(),
            ))?;
        }
    }
    tx.commit()?;

    info!(count = responses.len(), "stored survey responses");
    Ok(responses.len())
}

/// Remove every stored response
pub fn clear_responses(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM survey_responses", [])?;
    Ok(())
}

/// Oldest-first list of responses, at most `limit` rows
pub fn list_responses(conn: &Connection, limit: usize) -> Result<Vec<SurveyResponse>> {
    let mut stmt = conn.prepare(
        "SELECT age_group, support, change FROM survey_responses ORDER BY id LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit as i64], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (age_group, support, change) = row?;
        results.push(SurveyResponse {
            age_group: age_group.parse().context("corrupt age_group column")?,
            support: support.parse().context("corrupt support column")?,
            change: change.parse().context("corrupt change column")?,
        });
    }
    Ok(results)
}

pub fn count_responses(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM survey_responses", [], |row| {
        row.get(0)
    })?;
    Ok(count as usize)
}

/// Responses per support answer, most common first
pub fn count_by_support(conn: &Connection) -> Result<Vec<(String, usize)>> {
    let mut stmt = conn.prepare(
        "SELECT support, COUNT(*) AS n
         FROM survey_responses
         GROUP BY support
         ORDER BY n DESC, support",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as usize)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
