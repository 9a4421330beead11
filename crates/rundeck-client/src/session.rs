//! Authentication and the HTTP transport shared by every API call.

use std::io::Write;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::{Result, RundeckError};

/// API version segment appended to every base URL.
pub const API_VERSION: u32 = 16;
/// Request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between two polls of an execution's output.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Rundeck's API token header, not the generic `X-Auth-Token`.
const HEADER_AUTH_TOKEN: &str = "X-Rundeck-Auth-Token";
const LOGIN_PATH: &str = "j_security_check";
const LOGIN_FAILURE_PAGES: [&str; 2] = ["/user/error", "/user/login"];

/// Server and project a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    /// URL scheme, usually `https`.
    pub scheme: String,
    /// Host with optional port.
    pub host: String,
    /// Project whose jobs are listed and run.
    pub project: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between output polls.
    pub poll_interval: Duration,
}

impl ServerTarget {
    /// Target with the default timeout and poll interval.
    #[must_use]
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            project: project.into(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the pause between output polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// `scheme://host/api/<version>`.
    ///
    /// # Errors
    ///
    /// Returns [`RundeckError::InvalidBaseUrl`] when scheme and host do not
    /// form an absolute URL.
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("{}://{}/api/{API_VERSION}", self.scheme, self.host);
        let url = raw
            .parse::<Url>()
            .map_err(|source| RundeckError::InvalidBaseUrl {
                url: raw.clone(),
                source,
            })?;
        if url.cannot_be_a_base() {
            return Err(RundeckError::InvalidBaseUrl {
                url: raw,
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(url)
    }
}

/// How the session authenticated. Chosen once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Static API token sent on every request.
    Token,
    /// Form login; a session cookie rides along on every request.
    Credential {
        /// Username used to log in.
        user: String,
    },
}

/// HTTP plumbing bound to one server and project.
#[derive(Debug, Clone)]
pub(crate) struct Api {
    client: Client,
    base_url: Url,
    project: String,
}

impl Api {
    pub(crate) fn project(&self) -> &str {
        &self.project
    }

    fn endpoint(&self, segments: &[&str]) -> Result<(Url, String)> {
        let path = format!("/{}", segments.join("/"));
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RundeckError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok((url, path))
    }

    /// GET `segments` with `query`, returning the raw body and its path.
    pub(crate) async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<(Vec<u8>, String)> {
        let (url, path) = self.endpoint(segments)?;
        tracing::debug!(%path, ?query, "GET");
        let body = send(&path, self.client.get(url).query(query)).await?;
        Ok((body, path))
    }

    /// POST `form` to `segments`, returning the raw body and its path.
    pub(crate) async fn post_form(
        &self,
        segments: &[&str],
        form: &[(&str, &str)],
    ) -> Result<(Vec<u8>, String)> {
        let (url, path) = self.endpoint(segments)?;
        tracing::debug!(%path, "POST");
        let body = send(&path, self.client.post(url).form(form)).await?;
        Ok((body, path))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let (body, path) = self.get(segments, query).await?;
        decode_json(&path, &body)
    }
}

async fn send(path: &str, builder: RequestBuilder) -> Result<Vec<u8>> {
    let response = builder.send().await.map_err(|source| RundeckError::Network {
        path: path.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(RundeckError::UnexpectedStatus {
            path: path.to_string(),
            status,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| RundeckError::Network {
            path: path.to_string(),
            source,
        })?;
    Ok(bytes.to_vec())
}

pub(crate) fn decode_json<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| RundeckError::DecodeJson {
        path: path.to_string(),
        source,
    })
}

/// Authenticated connection to one server and project.
///
/// The session owns the HTTP transport and the output sink that command
/// results and execution logs are written to.
pub struct Session<W> {
    pub(crate) api: Api,
    pub(crate) out: W,
    auth: AuthMode,
    poll_interval: Duration,
}

impl<W: Write> Session<W> {
    /// Build a session that authenticates every request with `token`.
    ///
    /// No request is made; the token is first exercised by the next API call.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the token is not a valid
    /// header value, or the HTTP client cannot be built.
    pub fn auth_with_token(token: &str, target: &ServerTarget, out: W) -> Result<Self> {
        let base_url = target.base_url()?;

        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| RundeckError::validation("token contains invalid characters"))?;
        token_value.set_sensitive(true);
        headers.insert(HEADER_AUTH_TOKEN, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(target.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| RundeckError::ClientBuild { source })?;

        tracing::debug!(base_url = %base_url, project = %target.project, "token session ready");
        Ok(Self {
            api: Api {
                client,
                base_url,
                project: target.project.clone(),
            },
            out,
            auth: AuthMode::Token,
            poll_interval: target.poll_interval,
        })
    }

    /// Log in with a username and password and keep the session cookie.
    ///
    /// The login is rejected when the server answers with a non-success
    /// status or lands the request on its login or error page.
    ///
    /// # Errors
    ///
    /// Returns [`RundeckError::LoginRejected`] when the server refuses the
    /// credentials, and a network or setup error when the login request
    /// cannot be made.
    pub async fn auth_with_credentials(
        user: &str,
        pass: &str,
        target: &ServerTarget,
        out: W,
    ) -> Result<Self> {
        let base_url = target.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(target.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|source| RundeckError::ClientBuild { source })?;

        let api = Api {
            client,
            base_url,
            project: target.project.clone(),
        };

        let (login_url, path) = api.endpoint(&[LOGIN_PATH])?;
        tracing::debug!(%path, user, "logging in");
        let response = api
            .client
            .post(login_url)
            .form(&[("j_username", user), ("j_password", pass)])
            .send()
            .await
            .map_err(|source| RundeckError::Network { path, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RundeckError::LoginRejected {
                user: user.to_string(),
                reason: format!("status {status}"),
            });
        }
        let landing = response.url().path();
        if LOGIN_FAILURE_PAGES
            .iter()
            .any(|page| landing.ends_with(page))
        {
            return Err(RundeckError::LoginRejected {
                user: user.to_string(),
                reason: format!("redirected to {landing}"),
            });
        }

        tracing::debug!(project = %target.project, "credential session ready");
        Ok(Self {
            api,
            out,
            auth: AuthMode::Credential {
                user: user.to_string(),
            },
            poll_interval: target.poll_interval,
        })
    }
}

impl<W> Session<W> {
    /// Project the session is bound to.
    #[must_use]
    pub fn project(&self) -> &str {
        self.api.project()
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.api.base_url
    }

    /// Authentication mode chosen at construction.
    #[must_use]
    pub const fn auth_mode(&self) -> &AuthMode {
        &self.auth
    }

    /// Pause between output polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Output sink.
    #[must_use]
    pub const fn sink(&self) -> &W {
        &self.out
    }

    /// Consume the session and return its output sink.
    #[must_use]
    pub fn into_sink(self) -> W {
        self.out
    }
}
