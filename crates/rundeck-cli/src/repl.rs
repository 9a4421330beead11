//! Prompt loop, credential prompts, and interruptible command execution.

use std::future::Future;
use std::io::Write;

use anyhow::anyhow;
use rundeck_client::{RundeckError, Session};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::completion::ShellHelper;
use crate::error::{CliError, CliResult};

const PROMPT: &str = "rundeck> ";
const EXIT: &str = "exit";

pub(crate) type ShellEditor = Editor<ShellHelper, DefaultHistory>;

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    Empty,
    Exit,
    Command { verb: &'a str, args: Vec<&'a str> },
}

pub(crate) fn parse_input(line: &str) -> Input<'_> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => Input::Empty,
        Some(EXIT) => Input::Exit,
        Some(verb) => Input::Command {
            verb,
            args: words.collect(),
        },
    }
}

/// How a command ended.
#[derive(Debug)]
pub(crate) enum Outcome {
    Completed(Result<(), RundeckError>),
    Interrupted,
}

/// Run one command until it finishes or `interrupt` resolves.
///
/// An interrupt drops the in-flight command (including any output tail) and
/// leaves the session usable for the next prompt.
pub(crate) async fn execute_interruptible<W, F>(
    session: &mut Session<W>,
    verb: &str,
    args: &[&str],
    interrupt: F,
) -> Outcome
where
    W: Write,
    F: Future,
{
    tokio::select! {
        biased;
        _ = interrupt => Outcome::Interrupted,
        result = session.execute(verb, args) => Outcome::Completed(result),
    }
}

pub(crate) fn editor() -> CliResult<ShellEditor> {
    let mut editor = ShellEditor::new()
        .map_err(|err| CliError::failure(anyhow!("failed to initialise line editor: {err}")))?;
    editor.set_helper(Some(ShellHelper::new(Vec::new())));
    Ok(editor)
}

/// Ask for a username on the prompt and a password without echo.
pub(crate) fn prompt_credentials(editor: &mut ShellEditor) -> CliResult<(String, String)> {
    let user = editor
        .readline("username: ")
        .map_err(|err| CliError::failure(anyhow!("failed to read username: {err}")))?;
    let user = user.trim();
    if user.is_empty() {
        return Err(CliError::validation("username cannot be empty"));
    }

    let pass = rpassword::prompt_password("password: ")
        .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))?;
    Ok((user.to_string(), pass))
}

async fn refresh_job_labels<W>(editor: &mut ShellEditor, session: &Session<W>) {
    match session.job_labels().await {
        Ok(labels) => {
            tracing::debug!(count = labels.len(), "loaded job labels for completion");
            if let Some(helper) = editor.helper_mut() {
                helper.set_jobs(labels);
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not load job labels for completion");
        }
    }
}

/// Read commands until `exit`, Ctrl-D, or Ctrl-C at the prompt.
///
/// Failed commands print their error and the loop continues.
pub(crate) async fn run_loop<W: Write>(
    editor: &mut ShellEditor,
    session: &mut Session<W>,
) -> CliResult<()> {
    refresh_job_labels(editor, session).await;

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(CliError::failure(anyhow!("failed to read input: {err}"))),
        };

        let (verb, args) = match parse_input(&line) {
            Input::Empty => continue,
            Input::Exit => return Ok(()),
            Input::Command { verb, args } => (verb, args),
        };

        let interrupt = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "interrupt handler unavailable");
                std::future::pending::<()>().await;
            }
        };
        match execute_interruptible(session, verb, &args, interrupt).await {
            Outcome::Completed(Ok(())) => {}
            Outcome::Completed(Err(err)) => {
                eprintln!("error: {}", CliError::from(err).display_message());
            }
            Outcome::Interrupted => eprintln!("interrupted"),
        }

        if let Err(err) = editor.add_history_entry(line.trim()) {
            tracing::debug!(error = %err, "failed to record history entry");
        }
    }
}
