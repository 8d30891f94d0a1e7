// ── Runtime configuration ──
//
// These types describe *what* to synchronize and *how* to reach both
// services. They never touch disk or the environment: the binary builds a
// `SyncConfig` through `mtxsync-config` and hands it in.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use mtxsync_api::{TlsMode, TransportConfig};

/// Which desired paths the reconciler may create or recreate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PathSelection {
    /// Every desired path (`*`).
    #[default]
    All,
    /// Only the listed path names.
    Only(BTreeSet<String>),
}

impl PathSelection {
    /// Parse `*` or a comma-separated allow-list such as `cam_1, cam_2/sub`.
    pub fn parse(list: &str) -> Self {
        if list.trim() == "*" {
            return Self::All;
        }
        Self::Only(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn contains(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(path),
        }
    }
}

/// TLS verification strategy for the VMS connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Default, since VMS servers use self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Tuning knobs of the reconciliation loop.
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Sub-stream names to publish next to the main stream.
    pub streams: Vec<String>,
    /// Paths the reconciler manages.
    pub selection: PathSelection,
    /// Pause between two cycles.
    pub check_interval: Duration,
    /// How long a channel directory snapshot stays valid.
    pub reload_interval: Duration,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            streams: vec!["sub".into()],
            selection: PathSelection::All,
            check_interval: Duration::from_secs(15),
            reload_interval: Duration::from_secs(600),
        }
    }
}

/// Everything needed to run the synchronizer.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// VMS SDK base URL (e.g., `https://trassir.local:8080`).
    pub vms_url: Url,
    /// Prefix the VMS video tokens are appended to (e.g., `rtsp://trassir.local:555`).
    pub stream_host: String,
    pub username: String,
    pub password: SecretString,
    /// MediaMTX API listener.
    pub media_url: Url,
    /// TLS verification for the VMS.
    pub tls: TlsVerification,
    /// HTTP request timeout for both services.
    pub timeout: Duration,
    pub options: ReconcilerOptions,
}

impl SyncConfig {
    /// Transport settings for the VMS client.
    pub fn vms_transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        }
    }

    /// Transport settings for the MediaMTX client.
    pub fn media_transport(&self) -> TransportConfig {
        self.vms_transport().with_tls(TlsMode::System)
    }
}
