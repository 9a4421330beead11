//! Binary entrypoint for the `rundeck` shell.

use std::process;

#[tokio::main]
async fn main() {
    process::exit(rundeck_cli::run().await);
}
