// VMS HTTP client
//
// Wraps `reqwest::Client` with the VMS URL layout (`<base>/<method>`),
// loose-JSON decoding, and the `sid` session that every query carries.
// Endpoint helpers (login, channels, ...) live in sibling modules as
// inherent methods to keep this one focused on the query protocol.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::vms::models::{NO_SESSION, error_code, parse_loose, response_succeeded};

/// Whether a query already spent its one re-authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retried,
}

/// Raw HTTP client for the VMS query API.
///
/// Holds the credentials and the current session id. The session is
/// acquired lazily on the first query and renewed at most once per query
/// when the VMS reports `no session`.
pub struct VmsClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    sid: Mutex<Option<SecretString>>,
}

impl VmsClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the SDK root, e.g. `https://trassir.local:8080`.
    pub fn new(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
            sid: Mutex::new(None),
        }
    }

    /// The VMS base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// Whether a session id is currently held.
    pub async fn has_session(&self) -> bool {
        self.sid.lock().await.is_some()
    }

    pub(crate) async fn session_id(&self) -> Option<SecretString> {
        self.sid.lock().await.clone()
    }

    pub(crate) async fn set_session(&self, sid: Option<SecretString>) {
        *self.sid.lock().await = sid;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{method}`.
    pub(crate) fn method_url(&self, method: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{method}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue a GET for `method` and decode the loose-JSON body, without
    /// looking at `success`.
    pub(crate) async fn fetch(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        let url = self.method_url(method)?;
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        trace!(method, bytes = body.len(), "VMS response");
        parse_loose(&body)
    }

    /// Run an authenticated query.
    ///
    /// Logs in first when no session is held. If the VMS answers
    /// `no session` and this call has not re-authenticated yet, logs in
    /// once more and repeats the request; a second session failure
    /// surfaces as [`Error::SessionExpired`]. Other VMS failures surface
    /// as [`Error::Vms`] without retry.
    pub async fn query(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        let mut attempt = if self.has_session().await {
            Attempt::First
        } else {
            self.login().await?;
            Attempt::Retried
        };

        loop {
            let sid = self.session_id().await.ok_or(Error::SessionExpired)?;
            let mut query = params.to_vec();
            query.push(("sid", sid.expose_secret()));

            let body = self.fetch(method, &query).await?;
            if response_succeeded(&body) {
                return Ok(body);
            }

            let code = error_code(&body);
            match (code == NO_SESSION, attempt) {
                (true, Attempt::First) => {
                    debug!(method, "VMS session expired, re-authenticating");
                    self.login().await?;
                    attempt = Attempt::Retried;
                }
                (true, Attempt::Retried) => return Err(Error::SessionExpired),
                (false, _) => {
                    return Err(Error::Vms {
                        method: method.to_owned(),
                        code: code.to_owned(),
                    });
                }
            }
        }
    }
}
