//! End-to-end command flow against a mock Rundeck server.

use std::time::Duration;

use anyhow::{Result, anyhow};
use httpmock::prelude::*;
use reqwest::Url;
use rundeck_client::{ErrorKind, ServerTarget, Session};
use serde_json::json;

const PROJECT: &str = "test-rundeck";

fn target_for(server: &MockServer) -> Result<ServerTarget> {
    let base: Url = server
        .base_url()
        .parse()
        .map_err(|_| anyhow!("valid URL"))?;
    let host = format!(
        "{}:{}",
        base.host_str().ok_or_else(|| anyhow!("host"))?,
        base.port().ok_or_else(|| anyhow!("port"))?
    );
    Ok(ServerTarget::new(base.scheme(), host, PROJECT).with_poll_interval(Duration::ZERO))
}

fn mock_server_api(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/16/project/{PROJECT}/jobs"))
            .header("x-rundeck-auth-token", "token");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([
                {
                    "id": "test-id-0",
                    "name": "deploy",
                    "group": null,
                    "project": PROJECT,
                    "description": "deploy",
                    "href": "",
                    "permalink": "http://test.rundeck.in/project/test-rundeck/job/show/test-id-0"
                },
                {
                    "id": "test-id-1",
                    "name": "done",
                    "group": null,
                    "project": PROJECT,
                    "description": "done deploy",
                    "href": "",
                    "permalink": "http://test.rundeck.in/project/test-rundeck/job/show/test-id-1"
                }
            ]));
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/16/job/test-id-0")
            .query_param("format", "yaml");
        then.status(200).body(
            "- description: 'deploy'\n  executionEnabled: true\n  id: test-id-0\n  loglevel: INFO\n  name: deploy\n  scheduleEnabled: true\n  sequence:\n    commands:\n    - exec: deploy\n    keepgoing: false\n    strategy: node-first\n  uuid: test-uuid-0\n",
        );
    });

    server.mock(|when, then| {
        when.method(POST)
            .path("/api/16/job/test-id-0/executions")
            .body("argString=");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": 0,
                "href": "",
                "permalink": "http://test.rundeck.in/project/test-rundeck/execution/show/0",
                "status": "running",
                "project": PROJECT,
                "argstring": null
            }));
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/api/16/execution/0/output")
            .query_param("offset", "0")
            .query_param("lastmod", "0");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "0",
                "offset": "2260",
                "completed": true,
                "execCompleted": true,
                "execState": "succeeded",
                "lastModified": "1478336400000",
                "entries": [
                    {"time": "15:00:00", "log": "test-log-1", "level": "NORMAL"},
                    {"time": "15:00:00", "log": "test-log-2", "level": "NORMAL"}
                ]
            }));
    });
}

#[tokio::test]
async fn help_jobs_lists_labels_and_descriptions() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_server_api(&server);

    let mut session = Session::auth_with_token("token", &target_for(&server)?, Vec::new())?;
    session.execute("help", &["jobs"]).await?;

    assert_eq!(
        String::from_utf8_lossy(session.sink()),
        "available jobs:\n\n\t deploy\n\t\t deploy\n\n\t done\n\t\t done deploy\n"
    );
    Ok(())
}

#[tokio::test]
async fn help_job_describes_definition() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_server_api(&server);

    let mut session = Session::auth_with_token("token", &target_for(&server)?, Vec::new())?;
    session.execute("help", &["job", "deploy"]).await?;

    assert_eq!(
        String::from_utf8_lossy(session.sink()),
        "deploy\n\t deploy\n\n\toptions\n"
    );
    Ok(())
}

#[tokio::test]
async fn run_job_prints_permalink_logs_and_done() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_server_api(&server);

    let mut session = Session::auth_with_token("token", &target_for(&server)?, Vec::new())?;
    session.execute("run", &["deploy"]).await?;

    assert_eq!(
        String::from_utf8_lossy(&session.into_sink()),
        "job is running (http://test.rundeck.in/project/test-rundeck/execution/show/0)\ntest-log-1\ntest-log-2\ndone\n"
    );
    Ok(())
}

#[tokio::test]
async fn failed_command_leaves_session_usable() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_server_api(&server);

    let mut session = Session::auth_with_token("token", &target_for(&server)?, Vec::new())?;
    let err = session
        .execute("run", &["rollback"])
        .await
        .expect_err("unknown job");
    assert_eq!(err.kind(), ErrorKind::Lookup);

    session.execute("help", &["jobs"]).await?;
    assert!(String::from_utf8_lossy(session.sink()).starts_with("available jobs:"));
    Ok(())
}
