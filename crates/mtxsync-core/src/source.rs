// ── Collaborator seams ──
//
// The reconciler talks to the VMS and to MediaMTX only through these two
// traits, so cycles can run against in-memory fakes. The production
// implementations wrap the `mtxsync-api` clients.

use indexmap::IndexMap;
use tracing::debug;

use mtxsync_api::{Channel, MediaMtxClient, PathEntry, VmsClient};

use crate::error::CoreError;

/// Upstream channel authority.
#[allow(async_fn_in_trait)]
pub trait ChannelSource {
    /// Fetch the full, unordered channel list.
    async fn list_channels(&self) -> Result<Vec<Channel>, CoreError>;

    /// Resolve a pullable URL for one stream of a channel.
    async fn stream_url(&self, channel: &Channel, stream: &str) -> Result<String, CoreError>;

    /// Release any upstream session on shutdown.
    async fn close(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Media server path configuration.
#[allow(async_fn_in_trait)]
pub trait PathStore {
    async fn list_paths(&self) -> Result<IndexMap<String, PathEntry>, CoreError>;

    async fn create_path(&self, name: &str, source: &str) -> Result<(), CoreError>;

    async fn delete_path(&self, name: &str) -> Result<(), CoreError>;
}

// ── VMS ─────────────────────────────────────────────────────────────

/// [`ChannelSource`] backed by the VMS query API.
pub struct VmsSource {
    client: VmsClient,
    stream_host: String,
}

impl VmsSource {
    /// `stream_host` is the prefix video tokens are appended to,
    /// e.g. `rtsp://trassir.local:555`.
    pub fn new(client: VmsClient, stream_host: impl Into<String>) -> Self {
        Self {
            client,
            stream_host: stream_host.into(),
        }
    }
}

impl ChannelSource for VmsSource {
    async fn list_channels(&self) -> Result<Vec<Channel>, CoreError> {
        Ok(self.client.channels().await?)
    }

    async fn stream_url(&self, channel: &Channel, stream: &str) -> Result<String, CoreError> {
        let token = self.client.video_token(&channel.guid, stream).await?;
        debug!(guid = %channel.guid, stream, "resolved video token");
        Ok(format!("{}/{token}", self.stream_host.trim_end_matches('/')))
    }

    async fn close(&self) -> Result<(), CoreError> {
        Ok(self.client.logout().await?)
    }
}

// ── MediaMTX ────────────────────────────────────────────────────────

impl PathStore for MediaMtxClient {
    async fn list_paths(&self) -> Result<IndexMap<String, PathEntry>, CoreError> {
        Ok(MediaMtxClient::list_paths(self).await?)
    }

    async fn create_path(&self, name: &str, source: &str) -> Result<(), CoreError> {
        Ok(MediaMtxClient::create_path(self, name, source).await?)
    }

    async fn delete_path(&self, name: &str) -> Result<(), CoreError> {
        Ok(MediaMtxClient::delete_path(self, name).await?)
    }
}
