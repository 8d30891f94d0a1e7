// MediaMTX control API client
//
// Thin, unretried wrapper over the v3 HTTP API. Every non-2xx answer
// becomes `Error::MediaServer`; the caller decides what aborts.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::mediamtx::models::{PathConf, PathEntry, PathList};
use crate::transport::TransportConfig;

/// Items requested per `paths/list` page.
const PAGE_SIZE: u64 = 500;

/// MediaMTX answers errors as `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ApiError {
    error: String,
}

/// HTTP client for the MediaMTX control API.
#[derive(Clone)]
pub struct MediaMtxClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MediaMtxClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API listener, e.g. `http://localhost:9997`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/v3/{path}`. Path names may contain `/` and are
    /// appended verbatim.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/v3/{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every path MediaMTX knows about, keyed by name.
    ///
    /// Walks all pages of `paths/list`.
    pub async fn list_paths(&self) -> Result<IndexMap<String, PathEntry>, Error> {
        let url = self.api_url("paths/list")?;
        let mut paths = IndexMap::new();
        let mut page = 0_u64;

        loop {
            debug!(page, "GET {}", url);
            let resp = self
                .http
                .get(url.clone())
                .query(&[("page", page), ("itemsPerPage", PAGE_SIZE)])
                .send()
                .await?;
            let list: PathList = Self::parse(resp).await?;

            for entry in list.items {
                paths.insert(entry.name.clone(), entry);
            }

            page += 1;
            if page >= list.page_count {
                break;
            }
        }

        trace!(count = paths.len(), "listed MediaMTX paths");
        Ok(paths)
    }

    /// Create a path pulling from `source`.
    pub async fn create_path(&self, name: &str, source: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("config/paths/add/{name}"))?;
        debug!("POST {}", url);

        let resp = self.http.post(url).json(&PathConf { source }).send().await?;
        Self::check(resp).await.map(drop)
    }

    /// Remove a path from the configuration.
    pub async fn delete_path(&self, name: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("config/paths/delete/{name}"))?;
        debug!("DELETE {}", url);

        let resp = self.http.delete(url).send().await?;
        Self::check(resp).await.map(drop)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        Err(Error::MediaServer {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::check(resp).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(e, &body))
    }
}
