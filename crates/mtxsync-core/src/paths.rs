// ── Desired path set ──
//
// Every channel yields its main stream as `<id>` and each advertised
// sub-stream as `<id>/<stream>`.

use std::fmt;

use crate::channel_id::{ChannelId, ChannelMap};

/// Stream name the VMS uses for the primary stream.
pub const MAIN_STREAM: &str = "main";

/// A MediaMTX path derived from one channel stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamPath {
    pub channel: ChannelId,
    /// `None` for the main stream.
    pub stream: Option<String>,
}

impl StreamPath {
    pub fn main(channel: ChannelId) -> Self {
        Self {
            channel,
            stream: None,
        }
    }

    pub fn sub(channel: ChannelId, stream: &str) -> Self {
        Self {
            channel,
            stream: Some(stream.to_owned()),
        }
    }

    /// Stream name to request from the VMS.
    pub fn stream_name(&self) -> &str {
        self.stream.as_deref().unwrap_or(MAIN_STREAM)
    }
}

impl fmt::Display for StreamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stream {
            Some(stream) => write!(f, "{}/{stream}", self.channel),
            None => write!(f, "{}", self.channel),
        }
    }
}

/// List the paths a channel snapshot calls for, in snapshot order.
pub fn compute_paths(channels: &ChannelMap, streams: &[String]) -> Vec<StreamPath> {
    let mut paths = Vec::new();

    for (id, channel) in channels {
        if channel.has_mainstream() {
            paths.push(StreamPath::main(id.clone()));
        }
        for stream in streams {
            if channel.has_stream(stream) {
                paths.push(StreamPath::sub(id.clone(), stream));
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel_id::assign_ids;
    use mtxsync_api::Channel;
    use pretty_assertions::assert_eq;

    fn names(channels: Vec<Channel>, streams: &[&str]) -> Vec<String> {
        let streams: Vec<String> = streams.iter().map(ToString::to_string).collect();
        compute_paths(&assign_ids(channels), &streams)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn main_stream_only() {
        let cam = Channel::new("g1", "Cam 1")
            .with_flag("have_mainstream", "1")
            .with_flag("have_substream", "0");

        assert_eq!(names(vec![cam], &["sub"]), ["cam_1"]);
    }

    #[test]
    fn main_and_sub_stream() {
        let cam = Channel::new("g1", "Cam 1")
            .with_flag("have_mainstream", "1")
            .with_flag("have_substream", "1");

        assert_eq!(names(vec![cam], &["sub"]), ["cam_1", "cam_1/sub"]);
    }

    #[test]
    fn unconfigured_streams_are_ignored() {
        let cam = Channel::new("g1", "Cam 1")
            .with_flag("have_mainstream", "1")
            .with_flag("have_substream", "1");

        assert_eq!(names(vec![cam], &[]), ["cam_1"]);
    }

    #[test]
    fn missing_or_odd_flags_mean_absent() {
        let silent = Channel::new("g1", "Silent");
        let odd = Channel::new("g2", "Odd")
            .with_flag("have_mainstream", "true")
            .with_flag("have_substream", "yes");

        assert!(names(vec![silent, odd], &["sub"]).is_empty());
    }

    #[test]
    fn colliding_channels_both_appear() {
        let channels = vec![
            Channel::new("g1", "Cam 1").with_flag("have_mainstream", "1"),
            Channel::new("g2", "cam 1")
                .with_flag("have_mainstream", "1")
                .with_flag("have_substream", "1"),
        ];

        assert_eq!(
            names(channels, &["sub"]),
            ["cam_1", "cam_1_2", "cam_1_2/sub"]
        );
    }

    #[test]
    fn stream_names() {
        let id = assign_ids(vec![Channel::new("g1", "Cam")])
            .keys()
            .next()
            .cloned();
        let Some(id) = id else {
            panic!("no id assigned");
        };
        assert_eq!(StreamPath::main(id.clone()).stream_name(), "main");
        assert_eq!(StreamPath::sub(id, "sub").stream_name(), "sub");
    }
}
