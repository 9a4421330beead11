//! Job dispatch.

use std::io::Write;

use crate::error::Result;
use crate::model::{Activity, Job};
use crate::session::{Session, decode_json};

/// Join job arguments into the server's single `argString` value.
#[must_use]
pub fn arg_string<S: AsRef<str>>(options: &[S]) -> String {
    options
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W> Session<W> {
    /// Start `job` with `options` joined into one argument string.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an
    /// execution record.
    pub async fn run_job<S: AsRef<str>>(&self, job: &Job, options: &[S]) -> Result<Activity> {
        let args = arg_string(options);
        let (body, path) = self
            .api
            .post_form(
                &["job", job.id.as_str(), "executions"],
                &[("argString", args.as_str())],
            )
            .await?;
        let activity: Activity = decode_json(&path, &body)?;
        tracing::debug!(job = %job.label, execution_id = activity.id, "execution started");
        Ok(activity)
    }
}

impl<W: Write> Session<W> {
    /// Resolve `label`, start the job, and tail its output until completion.
    ///
    /// # Errors
    ///
    /// Returns the first failure from lookup, dispatch, tailing, or writing
    /// to the sink.
    pub async fn run<S: AsRef<str>>(&mut self, label: &str, options: &[S]) -> Result<()> {
        let job = self.resolve_job(label).await?;
        let activity = self.run_job(&job, options).await?;

        writeln!(self.out, "job is running ({})", activity.permalink)?;
        self.tail(activity.id).await?;
        writeln!(self.out, "done")?;
        self.out.flush()?;
        Ok(())
    }
}
