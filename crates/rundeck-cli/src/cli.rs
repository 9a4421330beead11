//! Argument parsing, startup, and authentication.

use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rundeck_client::{ServerTarget, Session};

use crate::config::{Conf, default_config_path};
use crate::error::{CliError, CliResult};
use crate::logging::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use crate::repl::{self, ShellEditor};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "rundeck", about = "Interactive shell for running Rundeck jobs")]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long, env = "RUNDECK_CLI_CONF")]
    conf: Option<PathBuf>,
    /// API token; overrides the token in the config file.
    #[arg(long, env = "RUNDECK_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(
        long,
        env = "RUNDECK_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

/// Parse arguments, start the shell, and return the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format,
    }) {
        eprintln!("warning: {err:#}");
    }

    match start(cli).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code(), "shell exited with error");
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn start(cli: Cli) -> CliResult<()> {
    if !io::stdin().is_terminal() {
        return Err(CliError::validation(
            "no support: stdin is not an interactive terminal",
        ));
    }

    let Cli {
        conf,
        token,
        timeout,
        ..
    } = cli;
    let path = conf.unwrap_or_else(default_config_path);
    tracing::debug!(path = %path.display(), "loading config");
    let conf = Conf::load(&path)?.with_token_override(token);
    let target = server_target(&conf, timeout)?;

    let mut editor = repl::editor()?;
    let mut session = authenticate(&conf, &target, &mut editor).await?;
    tracing::info!(
        project = session.project(),
        base_url = %session.base_url(),
        auth = ?session.auth_mode(),
        "session established"
    );
    repl::run_loop(&mut editor, &mut session).await
}

fn server_target(conf: &Conf, timeout_secs: u64) -> CliResult<ServerTarget> {
    if timeout_secs == 0 {
        return Err(CliError::validation("timeout must be at least one second"));
    }
    Ok(
        ServerTarget::new(conf.scheme.as_str(), conf.host.as_str(), conf.project.as_str())
            .with_timeout(Duration::from_secs(timeout_secs)),
    )
}

async fn authenticate(
    conf: &Conf,
    target: &ServerTarget,
    editor: &mut ShellEditor,
) -> CliResult<Session<Stdout>> {
    if let Some(token) = conf.token() {
        return Ok(Session::auth_with_token(token, target, io::stdout())?);
    }

    let (user, pass) = repl::prompt_credentials(editor)?;
    Ok(Session::auth_with_credentials(&user, &pass, target, io::stdout()).await?)
}
