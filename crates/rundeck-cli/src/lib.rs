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
#![allow(clippy::redundant_pub_crate)]

//! Interactive shell for running Rundeck jobs and tailing their output.
//!
//! Layout:
//! - `cli.rs`: argument parsing, startup, and authentication
//! - `config.rs`: JSON config file loading
//! - `repl.rs`: prompt loop and interruptible command execution
//! - `completion.rs`: tab completion for commands and job labels
//! - `logging.rs`: tracing subscriber setup
//! - `error.rs`: CLI error type and exit codes
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod completion;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod logging;
pub(crate) mod repl;

pub use cli::run;
