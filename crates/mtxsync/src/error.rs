//! Daemon error types with miette diagnostics.
//!
//! Only startup failures (and `--once` cycle failures) surface here; the
//! long-running loop logs its errors and keeps going.

use miette::Diagnostic;
use thiserror::Error;

use mtxsync_config::ConfigError;
use mtxsync_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum AppError {
    #[error(transparent)]
    #[diagnostic(
        code(mtxsync::config),
        help(
            "Set api_host, rtsp_host, login and password in the config file,\n\
             or through API_HOST, RTSP_HOST, LOGIN and PASSWORD."
        )
    )]
    Config(#[from] ConfigError),

    #[error("VMS authentication failed: {message}")]
    #[diagnostic(
        code(mtxsync::auth_failed),
        help("Check the login and password of the VMS SDK user.")
    )]
    AuthFailed { message: String },

    #[error("Could not connect to {url}: {reason}")]
    #[diagnostic(
        code(mtxsync::connection_failed),
        help(
            "Check that the VMS and MediaMTX are running and reachable.\n\
             MediaMTX must have its API enabled (api: yes)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(code(mtxsync::timeout), help("Increase the timeout setting."))]
    Timeout { url: String },

    #[error(transparent)]
    #[diagnostic(code(mtxsync::sync))]
    Sync(CoreError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Sync(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::AuthFailed {
                message: "session rejected right after logging in".into(),
            },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { url } => Self::Timeout { url },
            other => Self::Sync(other),
        }
    }
}
