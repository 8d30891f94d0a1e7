//! Configuration for the mtxsync daemon.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. the bare `API_HOST` / `RTSP_HOST` / `LOGIN` / `PASSWORD` / `PATHS`
//!    environment variables,
//! 4. `MTXSYNC_`-prefixed environment variables (e.g. `MTXSYNC_CHECK_INTERVAL`).
//!
//! [`Settings::into_sync_config`] validates the result and produces the
//! `mtxsync_core::SyncConfig` the reconciler runs on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

use mtxsync_core::{MAIN_STREAM, PathSelection, ReconcilerOptions, SyncConfig, TlsVerification};

/// Environment variables read without a prefix.
const LEGACY_ENV: [&str; 5] = ["API_HOST", "RTSP_HOST", "LOGIN", "PASSWORD", "PATHS"];

/// Prefix of the namespaced environment variables.
pub const ENV_PREFIX: &str = "MTXSYNC_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{field}'")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Raw, merged settings before validation.
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    /// VMS SDK base URL.
    pub api_host: Option<String>,
    /// Prefix resolved video tokens are appended to.
    pub rtsp_host: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    pub password: Option<String>,
    /// `*` or a comma-separated allow-list of path names.
    #[serde(default, deserialize_with = "lenient_string")]
    pub paths: Option<String>,
    /// MediaMTX API base URL.
    pub media_api: String,
    pub streams: Vec<String>,
    pub check_interval: u64,
    pub reload_interval: u64,
    pub timeout: u64,
    /// Accept invalid VMS certificates.
    pub insecure: bool,
    /// CA certificate for the VMS, used when `insecure` is off.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_host: None,
            rtsp_host: None,
            login: None,
            password: None,
            paths: Some("*".into()),
            media_api: "http://localhost:9997".into(),
            streams: vec!["sub".into()],
            check_interval: 15,
            reload_interval: 600,
            timeout: 30,
            insecure: true,
            ca_cert: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_host", &self.api_host)
            .field("rtsp_host", &self.rtsp_host)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("paths", &self.paths)
            .field("media_api", &self.media_api)
            .field("streams", &self.streams)
            .field("check_interval", &self.check_interval)
            .field("reload_interval", &self.reload_interval)
            .field("timeout", &self.timeout)
            .field("insecure", &self.insecure)
            .field("ca_cert", &self.ca_cert)
            .finish()
    }
}

/// Accept numbers and booleans where a string is expected, since
/// environment values like `PASSWORD=12345` arrive already typed.
fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(de)?.map(|v| match v {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

// ── Loading ─────────────────────────────────────────────────────────

/// The figment stack for a given config file. The file may be absent.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::raw().only(&LEGACY_ENV))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]))
}

/// Load settings from `path` and the environment.
pub fn load(path: &Path) -> Result<Settings, ConfigError> {
    Ok(figment(path).extract()?)
}

// ── Validation ──────────────────────────────────────────────────────

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing { field })
}

fn parse_url(value: &str, field: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Validation {
        field,
        reason: format!("'{value}' is not a valid URL ({e})"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Validation {
            field,
            reason: format!("'{value}' is not a base URL"),
        });
    }
    Ok(url)
}

fn positive_secs(value: u64, field: &'static str) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_secs(value))
}

impl Settings {
    /// Validate and convert into the reconciler's runtime configuration.
    pub fn into_sync_config(self) -> Result<SyncConfig, ConfigError> {
        let vms_url = parse_url(&required(self.api_host, "api_host")?, "api_host")?;
        let stream_host = required(self.rtsp_host, "rtsp_host")?;
        let username = required(self.login, "login")?;
        let password = SecretString::from(required(self.password, "password")?);
        let media_url = parse_url(&self.media_api, "media_api")?;

        let unusable = |s: &&String| s.is_empty() || s.contains('/') || s.as_str() == MAIN_STREAM;
        if let Some(stream) = self.streams.iter().find(unusable) {
            return Err(ConfigError::Validation {
                field: "streams",
                reason: format!("'{stream}' is not a usable sub-stream name"),
            });
        }

        let tls = if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ca) = self.ca_cert {
            TlsVerification::CustomCa(ca)
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(SyncConfig {
            vms_url,
            stream_host,
            username,
            password,
            media_url,
            tls,
            timeout: positive_secs(self.timeout, "timeout")?,
            options: ReconcilerOptions {
                streams: self.streams,
                selection: PathSelection::parse(self.paths.as_deref().unwrap_or("*")),
                check_interval: positive_secs(self.check_interval, "check_interval")?,
                reload_interval: Duration::from_secs(self.reload_interval),
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn base() -> Settings {
        Settings {
            api_host: Some("https://vms.local:8080".into()),
            rtsp_host: Some("rtsp://vms.local:555".into()),
            login: Some("admin".into()),
            password: Some("hunter2".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_apply_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("API_HOST", "https://vms.local:8080");
            let settings: Settings = figment(Path::new("missing.toml")).extract()?;

            assert_eq!(settings.api_host.as_deref(), Some("https://vms.local:8080"));
            assert_eq!(settings.paths.as_deref(), Some("*"));
            assert_eq!(settings.media_api, "http://localhost:9997");
            assert_eq!(settings.streams, ["sub"]);
            assert_eq!(settings.check_interval, 15);
            assert_eq!(settings.reload_interval, 600);
            assert!(settings.insecure);
            Ok(())
        });
    }

    #[test]
    fn layers_merge_in_priority_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mtxsync.toml",
                r#"
                    api_host = "https://file.local"
                    rtsp_host = "rtsp://file.local:555"
                    login = "file-user"
                    check_interval = 30
                    streams = ["sub", "third"]
                "#,
            )?;
            jail.set_env("LOGIN", "env-user");
            jail.set_env("PASSWORD", "12345");
            jail.set_env("MTXSYNC_CHECK_INTERVAL", "5");
            jail.set_env("MTXSYNC_LOGIN", "prefixed-user");

            let settings: Settings = figment(Path::new("mtxsync.toml")).extract()?;

            assert_eq!(settings.api_host.as_deref(), Some("https://file.local"));
            assert_eq!(settings.login.as_deref(), Some("prefixed-user"));
            assert_eq!(settings.password.as_deref(), Some("12345"));
            assert_eq!(settings.check_interval, 5);
            assert_eq!(settings.streams, ["sub", "third"]);
            Ok(())
        });
    }

    #[test]
    fn streams_accept_env_array_syntax() {
        Jail::expect_with(|jail| {
            jail.set_env("MTXSYNC_STREAMS", "[sub,third]");
            let settings: Settings = figment(Path::new("mtxsync.toml")).extract()?;
            assert_eq!(settings.streams, ["sub", "third"]);
            Ok(())
        });
    }

    #[test]
    fn converts_into_sync_config() {
        let mut settings = base();
        settings.paths = Some("cam_1, cam_2/sub".into());

        let config = settings.into_sync_config().unwrap();

        assert_eq!(config.vms_url.as_str(), "https://vms.local:8080/");
        assert_eq!(config.stream_host, "rtsp://vms.local:555");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.options.selection.contains("cam_2/sub"));
        assert!(!config.options.selection.contains("cam_2"));
    }

    #[test]
    fn strict_tls_uses_ca_when_given() {
        let mut settings = base();
        settings.insecure = false;
        assert_eq!(
            settings.clone().into_sync_config().unwrap().tls,
            TlsVerification::SystemDefaults
        );

        settings.ca_cert = Some("/etc/vms-ca.pem".into());
        assert_eq!(
            settings.into_sync_config().unwrap().tls,
            TlsVerification::CustomCa("/etc/vms-ca.pem".into())
        );
    }

    #[test]
    fn missing_required_setting_is_reported() {
        let mut settings = base();
        settings.rtsp_host = None;
        let err = settings.into_sync_config().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "rtsp_host" }));

        let mut settings = base();
        settings.password = Some("  ".into());
        let err = settings.into_sync_config().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "password" }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut settings = base();
        settings.api_host = Some("not a url".into());
        assert!(matches!(
            settings.into_sync_config().unwrap_err(),
            ConfigError::Validation { field: "api_host", .. }
        ));

        let mut settings = base();
        settings.check_interval = 0;
        assert!(matches!(
            settings.into_sync_config().unwrap_err(),
            ConfigError::Validation { field: "check_interval", .. }
        ));

        let mut settings = base();
        settings.streams = vec!["main".into()];
        assert!(matches!(
            settings.into_sync_config().unwrap_err(),
            ConfigError::Validation { field: "streams", .. }
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", base());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }
}
