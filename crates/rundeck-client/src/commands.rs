//! The interactive command grammar.
//!
//! ```text
//! run <job> [arg ...]
//! help jobs
//! help job <job>
//! ```

use std::io::Write;

use crate::error::{Result, RundeckError};
use crate::output::{render_job_definition, render_job_list};
use crate::session::Session;

/// Start a job and tail its output.
pub const CMD_RUN: &str = "run";
/// Describe jobs.
pub const CMD_HELP: &str = "help";
/// `help` topic for a single job definition.
pub const SUB_CMD_JOB: &str = "job";
/// `help` topic for the job listing.
pub const SUB_CMD_JOBS: &str = "jobs";

/// Top-level verbs in completion order.
#[must_use]
pub fn commands() -> Vec<&'static str> {
    vec![CMD_RUN, CMD_HELP]
}

/// `help` sub-verbs in completion order.
#[must_use]
pub fn sub_commands() -> Vec<&'static str> {
    vec![SUB_CMD_JOB, SUB_CMD_JOBS]
}

/// What `help` should describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpTopic {
    /// Every job in the project.
    Jobs,
    /// One job's definition.
    Job {
        /// Job label.
        job: String,
    },
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `run <job> [arg ...]`
    Run {
        /// Job label.
        job: String,
        /// Arguments forwarded to the job.
        options: Vec<String>,
    },
    /// `help jobs` or `help job <job>`
    Help(HelpTopic),
}

impl Command {
    /// Parse a verb and its arguments.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a required job name or sub-command is
    /// missing, and a command error for an unknown verb or sub-verb.
    pub fn parse<S: AsRef<str>>(command: &str, args: &[S]) -> Result<Self> {
        match command {
            CMD_RUN => {
                let (job, options) = args
                    .split_first()
                    .ok_or(RundeckError::Validation {
                        message: "job name required",
                    })?;
                Ok(Self::Run {
                    job: job.as_ref().to_string(),
                    options: options.iter().map(|arg| arg.as_ref().to_string()).collect(),
                })
            }
            CMD_HELP => {
                let (sub, rest) = args
                    .split_first()
                    .ok_or(RundeckError::Validation {
                        message: "sub command required",
                    })?;
                match sub.as_ref() {
                    SUB_CMD_JOBS => Ok(Self::Help(HelpTopic::Jobs)),
                    SUB_CMD_JOB => {
                        let job = rest
                            .first()
                            .ok_or(RundeckError::Validation {
                                message: "job name required",
                            })?;
                        Ok(Self::Help(HelpTopic::Job {
                            job: job.as_ref().to_string(),
                        }))
                    }
                    other => Err(RundeckError::UnknownSubCommand {
                        command: other.to_string(),
                    }),
                }
            }
            other => Err(RundeckError::UnknownCommand {
                command: other.to_string(),
            }),
        }
    }
}

impl<W: Write> Session<W> {
    /// Parse and run one command, writing its results to the session's sink.
    ///
    /// # Errors
    ///
    /// Returns parse errors before any request is made, then whatever the
    /// dispatched command fails with.
    pub async fn execute<S: AsRef<str>>(&mut self, command: &str, args: &[S]) -> Result<()> {
        let command = Command::parse(command, args)?;
        tracing::debug!(?command, "dispatching command");
        self.dispatch(command).await
    }

    /// Run an already parsed command.
    ///
    /// # Errors
    ///
    /// Returns the first lookup, network, decode, or output failure.
    pub async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Run { job, options } => self.run(&job, options.as_slice()).await,
            Command::Help(HelpTopic::Jobs) => {
                let jobs = self.list_jobs().await?;
                render_job_list(&mut self.out, &jobs)?;
                Ok(())
            }
            Command::Help(HelpTopic::Job { job }) => {
                let definition = self.get_definition(&job).await?;
                render_job_definition(&mut self.out, &definition)?;
                Ok(())
            }
        }
    }
}
