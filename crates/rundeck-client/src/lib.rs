#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client for the Rundeck job-orchestration REST API.
//!
//! Layout:
//! - `session.rs`: authentication and the shared HTTP transport
//! - `jobs.rs`: job listing, label lookup, and definition retrieval
//! - `executions.rs`: job dispatch and the `run` composition
//! - `tail.rs`: the execution output polling loop
//! - `commands.rs`: the `run` / `help` command grammar and dispatch
//! - `output.rs`: renderers writing to the session's output sink
//! - `model.rs`: wire types shared by the modules above
//! - `normalize.rs`: job name to label conversion

pub mod commands;
pub mod error;
pub mod executions;
pub mod jobs;
pub mod model;
pub mod normalize;
pub mod output;
pub mod session;
pub mod tail;

pub use commands::{
    CMD_HELP, CMD_RUN, Command, HelpTopic, SUB_CMD_JOB, SUB_CMD_JOBS, commands, sub_commands,
};
pub use error::{ErrorKind, Result, RundeckError};
pub use jobs::find_by_label;
pub use model::{Activity, Job, JobDefinition, JobOption, LogEntry, OutputCursor, OutputPage};
pub use normalize::normalize;
pub use session::{API_VERSION, AuthMode, ServerTarget, Session};
pub use tail::{OutputSource, tail_execution};
