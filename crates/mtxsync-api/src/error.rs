use thiserror::Error;

/// Top-level error type for the `mtxsync-api` crate.
///
/// Covers every failure mode across both API surfaces: VMS authentication
/// and queries, MediaMTX configuration calls, and the shared transport.
/// `mtxsync-core` maps these into reconciliation-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the VMS (wrong credentials, disabled user, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The VMS reported `no session` again right after re-authenticating.
    #[error("Session expired -- re-authentication did not help")]
    SessionExpired,

    // ── VMS ─────────────────────────────────────────────────────────
    /// The VMS answered with `success: 0` for a reason other than session expiry.
    #[error("VMS query '{method}' failed: {code}")]
    Vms { method: String, code: String },

    /// The VMS answered with a non-2xx HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    // ── MediaMTX ────────────────────────────────────────────────────
    /// Non-2xx answer from the MediaMTX control API.
    #[error("MediaMTX API error (HTTP {status}): {message}")]
    MediaServer { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the VMS session could not be
    /// (re-)established.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    pub(crate) fn deserialization(err: impl std::fmt::Display, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}
