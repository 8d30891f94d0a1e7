// MediaMTX API response types

use serde::{Deserialize, Serialize};

/// One entry of `GET /v3/paths/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub name: String,
    /// `true` while the upstream source is connected and publishing.
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub source: Option<PathSource>,
}

/// The source MediaMTX reports for a path (`{"type": "rtspSource", "id": ""}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
}

/// Paginated list envelope used by every MediaMTX `list` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PathList {
    #[serde(rename = "pageCount", default)]
    pub page_count: u64,
    #[serde(default)]
    pub items: Vec<PathEntry>,
}

/// Body of `POST /v3/config/paths/add/{name}`.
#[derive(Debug, Serialize)]
pub(crate) struct PathConf<'a> {
    pub source: &'a str,
}
