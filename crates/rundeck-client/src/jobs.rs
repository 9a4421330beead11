//! Job listing, label lookup, and definition retrieval.

use crate::error::{Result, RundeckError};
use crate::model::{Job, JobDefinition};
use crate::normalize::normalize;
use crate::session::Session;

/// First job whose label equals `label`.
#[must_use]
pub fn find_by_label<'a>(jobs: &'a [Job], label: &str) -> Option<&'a Job> {
    jobs.iter().find(|job| job.label == label)
}

impl<W> Session<W> {
    /// List the project's jobs in server order, each with its label filled.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a JSON job list.
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let project = self.api.project();
        let jobs: Vec<Job> = self
            .api
            .get_json(&["project", project, "jobs"], &[])
            .await?;
        tracing::debug!(count = jobs.len(), project, "listed jobs");
        Ok(jobs.into_iter().map(Job::labelled).collect())
    }

    /// Labels of every job, in server order.
    ///
    /// # Errors
    ///
    /// Fails like [`Session::list_jobs`].
    pub async fn job_labels(&self) -> Result<Vec<String>> {
        let jobs = self.list_jobs().await?;
        Ok(jobs.into_iter().map(|job| job.label).collect())
    }

    /// Resolve `label` against the current job listing.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty label and
    /// [`RundeckError::JobNotFound`] when no job carries it. Listing failures
    /// are passed through.
    pub async fn resolve_job(&self, label: &str) -> Result<Job> {
        if label.is_empty() {
            return Err(RundeckError::validation("job name required"));
        }
        let jobs = self.list_jobs().await?;
        find_by_label(&jobs, label)
            .cloned()
            .ok_or_else(|| RundeckError::JobNotFound {
                label: label.to_string(),
            })
    }

    /// Fetch the full definition of the job labelled `label`.
    ///
    /// The definition is requested in YAML form and is expected to be a
    /// one-element list.
    ///
    /// # Errors
    ///
    /// Fails like [`Session::resolve_job`], and with a decode error when the
    /// YAML is malformed or the list is empty.
    pub async fn get_definition(&self, label: &str) -> Result<JobDefinition> {
        let job = self.resolve_job(label).await?;
        let (body, path) = self
            .api
            .get(&["job", job.id.as_str()], &[("format", "yaml".to_string())])
            .await?;

        let definitions: Vec<JobDefinition> =
            serde_yaml::from_slice(&body)
                .map_err(|source| RundeckError::DecodeYaml { path, source })?;

        let mut definition =
            definitions
                .into_iter()
                .next()
                .ok_or_else(|| RundeckError::EmptyDefinition {
                    label: label.to_string(),
                })?;
        definition.label = normalize(&definition.name);
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::session::ServerTarget;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use reqwest::Url;

    const JOBS_BODY: &str = r#"[
  {
    "id": "test-id-0",
    "name": "deploy",
    "group": null,
    "project": "test-rundeck",
    "description": "deploy",
    "href": "",
    "permalink": "http://test.rundeck.in/project/test-rundeck/job/show/test-id-0"
  },
  {
    "id": "test-id-1",
    "name": "done",
    "group": null,
    "project": "test-rundeck",
    "description": "done deploy",
    "href": "",
    "permalink": "http://test.rundeck.in/project/test-rundeck/job/show/test-id-1"
  }
]"#;

    fn session_for(server: &MockServer) -> Result<Session<Vec<u8>>> {
        let base: Url = server
            .base_url()
            .parse()
            .map_err(|_| anyhow!("valid URL"))?;
        let host = format!(
            "{}:{}",
            base.host_str().ok_or_else(|| anyhow!("host"))?,
            base.port().ok_or_else(|| anyhow!("port"))?
        );
        let target = ServerTarget::new(base.scheme(), host, "test-rundeck");
        Ok(Session::auth_with_token("token", &target, Vec::new())?)
    }

    fn mock_jobs(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(GET).path("/api/16/project/test-rundeck/jobs");
            then.status(200)
                .header("content-type", "application/json")
                .body(JOBS_BODY);
        })
    }

    fn job(name: &str) -> Job {
        Job {
            id: format!("id-{name}"),
            name: name.to_string(),
            description: String::new(),
            permalink: String::new(),
            label: String::new(),
        }
        .labelled()
    }

    #[test]
    fn find_by_label_returns_first_match() {
        let jobs = vec![job("Deploy App"), job("deploy app!"), job("done")];
        let found = find_by_label(&jobs, "deploy-app").expect("label present");
        assert_eq!(found.id, "id-Deploy App");
        assert!(find_by_label(&jobs, "missing").is_none());
    }

    #[test]
    fn find_by_label_on_empty_list_is_none() {
        assert!(find_by_label(&[], "deploy").is_none());
        assert!(find_by_label(&[], "").is_none());
    }

    #[tokio::test]
    async fn list_jobs_labels_in_server_order() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = mock_jobs(&server);

        let session = session_for(&server)?;
        let labels = session.job_labels().await?;
        assert_eq!(labels, vec!["deploy".to_string(), "done".to_string()]);

        let jobs = session.list_jobs().await?;
        assert_eq!(jobs[1].description, "done deploy");
        assert_eq!(jobs[0].id, "test-id-0");
        mock.assert_calls(2);
        Ok(())
    }

    #[tokio::test]
    async fn list_jobs_surfaces_decode_errors() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/16/project/test-rundeck/jobs");
            then.status(200).body("<html>not json</html>");
        });

        let err = session_for(&server)?
            .list_jobs()
            .await
            .expect_err("html body must not decode");
        assert_eq!(err.kind(), ErrorKind::Decode);
        Ok(())
    }

    #[tokio::test]
    async fn list_jobs_reports_error_status() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/16/project/test-rundeck/jobs");
            then.status(403).body(r#"{"error": true}"#);
        });

        let err = session_for(&server)?
            .list_jobs()
            .await
            .expect_err("forbidden must fail");
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().contains("403"));
        Ok(())
    }

    #[tokio::test]
    async fn get_definition_decodes_yaml_and_stamps_label() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_jobs(&server);
        let definition_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/16/job/test-id-0")
                .query_param("format", "yaml");
            then.status(200).body(
                "- description: 'Deploy the app'\n  id: test-id-0\n  name: Deploy App\n  options:\n  - name: version\n    required: true\n    description: release tag\n  - name: dry-run\n    description: skip the switch\n  sequence:\n    commands:\n    - exec: deploy\n",
            );
        });

        let definition = session_for(&server)?.get_definition("deploy").await?;
        assert_eq!(definition.label, "deploy-app");
        assert_eq!(definition.description, "Deploy the app");
        assert_eq!(definition.options.len(), 2);
        assert_eq!(definition.options[0].name, "version");
        assert!(definition.options[0].required);
        assert!(!definition.options[1].required);
        definition_mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn get_definition_requires_name() -> Result<()> {
        let server = MockServer::start_async().await;
        let jobs = mock_jobs(&server);

        let err = session_for(&server)?
            .get_definition("")
            .await
            .expect_err("empty name must fail");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "job name required");
        jobs.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn get_definition_reports_unknown_label() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_jobs(&server);

        let err = session_for(&server)?
            .get_definition("rollback")
            .await
            .expect_err("unknown job must fail");
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.to_string(), "job 'rollback' not found");
        Ok(())
    }

    #[tokio::test]
    async fn get_definition_rejects_empty_document() -> Result<()> {
        let server = MockServer::start_async().await;
        mock_jobs(&server);
        server.mock(|when, then| {
            when.method(GET).path("/api/16/job/test-id-1");
            then.status(200).body("[]\n");
        });

        let err = session_for(&server)?
            .get_definition("done")
            .await
            .expect_err("empty list must fail");
        assert!(matches!(err, RundeckError::EmptyDefinition { .. }));
        assert_eq!(err.kind(), ErrorKind::Decode);
        Ok(())
    }
}
