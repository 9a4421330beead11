//! Tab completion over commands, `help` topics, and job labels.

use rundeck_client::{CMD_HELP, CMD_RUN, SUB_CMD_JOB, commands, sub_commands};
use rustyline::completion::Completer;
use rustyline::{Context, Helper, Highlighter, Hinter, Validator};

/// Line-editor helper providing prefix completion.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub(crate) struct ShellHelper {
    commands: Vec<String>,
    sub_commands: Vec<String>,
    jobs: Vec<String>,
}

impl ShellHelper {
    pub(crate) fn new(jobs: Vec<String>) -> Self {
        Self {
            commands: commands().into_iter().map(str::to_string).collect(),
            sub_commands: sub_commands().into_iter().map(str::to_string).collect(),
            jobs,
        }
    }

    pub(crate) fn set_jobs(&mut self, jobs: Vec<String>) {
        self.jobs = jobs;
    }

    /// Completions for the word ending at the end of `prefix`.
    ///
    /// Returns the byte offset where that word starts and the matching
    /// candidates. A lone candidate gets a trailing space.
    pub(crate) fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(|ch: char| ch.is_ascii_whitespace())
            .map_or(0, |pos| pos + 1);
        let target = &prefix[start..];
        let previous: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: &[String] = match previous.as_slice() {
            [] => &self.commands,
            [command] if *command == CMD_RUN => &self.jobs,
            [command] if *command == CMD_HELP => &self.sub_commands,
            [command, sub] if *command == CMD_HELP && *sub == SUB_CMD_JOB => &self.jobs,
            _ => &[],
        };

        let mut matches: Vec<String> = pool
            .iter()
            .filter(|candidate| candidate.starts_with(target))
            .cloned()
            .collect();
        if let [only] = matches.as_mut_slice() {
            only.push(' ');
        }
        (start, matches)
    }
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.candidates(&line[..pos]))
    }
}
