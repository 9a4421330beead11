//! Execution output tailing.
//!
//! The loop polls the output endpoint with the cursor the server handed back
//! on the previous poll, writes every returned entry to the sink in arrival
//! order, and stops after the first page that reports completion. Entries are
//! never deduplicated. Any fetch or write failure ends the tail immediately.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{OutputCursor, OutputPage};
use crate::session::{Api, Session};

/// Source of execution output pages.
#[async_trait]
pub trait OutputSource: Send + Sync {
    /// Fetch the page of output for `execution_id` starting at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or decoded.
    async fn fetch(&self, execution_id: u64, cursor: &OutputCursor) -> Result<OutputPage>;
}

#[async_trait]
impl OutputSource for Api {
    async fn fetch(&self, execution_id: u64, cursor: &OutputCursor) -> Result<OutputPage> {
        let id = execution_id.to_string();
        self.get_json(
            &["execution", id.as_str(), "output"],
            &[
                ("offset", cursor.offset.to_string()),
                ("lastmod", cursor.last_modified.to_string()),
            ],
        )
        .await
    }
}

/// Poll `source` until the execution completes, writing each log line to `out`.
///
/// Returns the final cursor, which always has `completed` set.
///
/// # Errors
///
/// Stops at the first fetch or write failure and returns it.
pub async fn tail_execution<S, W>(
    source: &S,
    execution_id: u64,
    out: &mut W,
    interval: Duration,
) -> Result<OutputCursor>
where
    S: OutputSource + ?Sized,
    W: Write,
{
    let mut cursor = OutputCursor::default();
    loop {
        let page = source.fetch(execution_id, &cursor).await?;

        for entry in &page.entries {
            writeln!(out, "{}", entry.log)?;
        }
        out.flush()?;

        if cursor.regressed_by(&page) {
            tracing::warn!(
                execution_id,
                offset = page.offset,
                last_modified = page.last_modified,
                previous_offset = cursor.offset,
                "server moved the output cursor backwards"
            );
        }
        cursor.advance(&page);

        if cursor.completed {
            tracing::debug!(execution_id, offset = cursor.offset, "execution output complete");
            return Ok(cursor);
        }

        tracing::debug!(
            execution_id,
            offset = cursor.offset,
            last_modified = cursor.last_modified,
            entries = page.entries.len(),
            "output pending"
        );
        tokio::time::sleep(interval).await;
    }
}

impl<W: Write> Session<W> {
    /// Tail the output of execution `execution_id` into the session's sink.
    ///
    /// # Errors
    ///
    /// Fails like [`tail_execution`].
    pub async fn tail(&mut self, execution_id: u64) -> Result<OutputCursor> {
        let interval = self.poll_interval();
        tail_execution(&self.api, execution_id, &mut self.out, interval).await
    }
}
