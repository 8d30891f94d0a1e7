// ── Core error types ──
//
// Reconciliation-level errors. Every variant aborts the current cycle;
// the loop logs it and starts over on the next tick. The
// `From<mtxsync_api::Error>` impl folds transport-layer detail into these.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── VMS errors ───────────────────────────────────────────────────
    #[error("VMS authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("VMS session expired again after re-authentication")]
    SessionExpired,

    #[error("VMS query '{method}' failed: {code}")]
    UpstreamQuery { method: String, code: String },

    // ── MediaMTX errors ──────────────────────────────────────────────
    #[error("MediaMTX rejected the request (HTTP {status}): {message}")]
    MediaServer { status: u16, message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Path '{path}' does not belong to any channel in the directory")]
    UnknownChannel { path: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures that stem from VMS credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::SessionExpired)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mtxsync_api::Error> for CoreError {
    fn from(err: mtxsync_api::Error) -> Self {
        match err {
            mtxsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            mtxsync_api::Error::SessionExpired => CoreError::SessionExpired,
            mtxsync_api::Error::Vms { method, code } => CoreError::UpstreamQuery { method, code },
            mtxsync_api::Error::HttpStatus { url, status } => CoreError::ConnectionFailed {
                url,
                reason: format!("server answered HTTP {status}"),
            },
            mtxsync_api::Error::MediaServer { status, message } => {
                CoreError::MediaServer { status, message }
            }
            mtxsync_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            mtxsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mtxsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            mtxsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_connection_failure() {
        let err = CoreError::from(mtxsync_api::Error::HttpStatus {
            url: "https://vms.local/channels".into(),
            status: 502,
        });

        assert!(
            matches!(err, CoreError::ConnectionFailed { ref url, ref reason }
                if url == "https://vms.local/channels" && reason.contains("502")),
            "unexpected mapping: {err:?}"
        );
        assert!(!err.is_auth());
    }

    #[test]
    fn rejected_login_maps_to_auth_failure() {
        let err = CoreError::from(mtxsync_api::Error::Authentication {
            message: "login rejected by VMS: HTTP 401".into(),
        });

        assert!(err.is_auth());
    }
}
