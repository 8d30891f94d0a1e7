// Channel directory and video token endpoints

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::vms::client::VmsClient;
use crate::vms::models::{Channel, ChannelList, VideoToken};

/// Container requested from `get_video`.
pub const VIDEO_CONTAINER: &str = "rtsp";
/// Audio codec requested from `get_video`.
pub const VIDEO_AUDIO: &str = "pcmu";

impl VmsClient {
    /// List every channel the session can see.
    pub async fn channels(&self) -> Result<Vec<Channel>, Error> {
        let body = self.query("channels", &[]).await?;
        let list = ChannelList::deserialize(&body)
            .map_err(|e| Error::deserialization(e, &body.to_string()))?;
        debug!(count = list.channels.len(), "fetched VMS channel list");
        Ok(list.channels)
    }

    /// Request a playback token for one stream of a channel.
    ///
    /// `stream` is `main` or a sub-stream name such as `sub`. The token is
    /// appended to the streaming host by the caller.
    pub async fn video_token(&self, guid: &str, stream: &str) -> Result<String, Error> {
        let params = [
            ("channel", guid),
            ("stream", stream),
            ("container", VIDEO_CONTAINER),
            ("audio", VIDEO_AUDIO),
        ];
        let body = self.query("get_video", &params).await?;
        let token = VideoToken::deserialize(&body)
            .map_err(|e| Error::deserialization(e, &body.to_string()))?;
        Ok(token.token)
    }
}
