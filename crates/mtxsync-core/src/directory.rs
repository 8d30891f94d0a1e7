// ── Channel directory cache ──
//
// Holds one channel snapshot plus the instant it was fetched. Access past
// the reload window refetches; a failed refetch leaves the cache expired so
// the next access tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::channel_id::{ChannelMap, assign_ids};
use crate::error::CoreError;
use crate::source::ChannelSource;

struct Snapshot {
    fetched_at: Instant,
    channels: Arc<ChannelMap>,
}

/// Time-windowed cache of the VMS channel directory.
pub struct ChannelDirectory {
    reload_interval: Duration,
    snapshot: Option<Snapshot>,
}

impl ChannelDirectory {
    pub fn new(reload_interval: Duration) -> Self {
        Self {
            reload_interval,
            snapshot: None,
        }
    }

    /// Whether the held snapshot is still inside the reload window.
    pub fn is_fresh(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|snap| snap.fetched_at.elapsed() < self.reload_interval)
    }

    /// Force the next [`channels`](Self::channels) call to refetch.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// The id-assigned channel snapshot, refetched when the window expired.
    pub async fn channels<S: ChannelSource>(
        &mut self,
        source: &S,
    ) -> Result<Arc<ChannelMap>, CoreError> {
        if self.is_fresh() {
            if let Some(snap) = &self.snapshot {
                return Ok(Arc::clone(&snap.channels));
            }
        }

        debug!("refreshing channel directory");
        let channels = Arc::new(assign_ids(source.list_channels().await?));
        debug!(count = channels.len(), "channel directory refreshed");

        self.snapshot = Some(Snapshot {
            fetched_at: Instant::now(),
            channels: Arc::clone(&channels),
        });
        Ok(channels)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use mtxsync_api::Channel;

    struct CountingSource {
        calls: AtomicUsize,
        fail: Mutex<bool>,
        channels: Mutex<Vec<Channel>>,
    }

    impl CountingSource {
        fn new(channels: Vec<Channel>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: Mutex::new(false),
                channels: Mutex::new(channels),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChannelSource for CountingSource {
        async fn list_channels(&self) -> Result<Vec<Channel>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(CoreError::UpstreamQuery {
                    method: "channels".into(),
                    code: "unavailable".into(),
                });
            }
            Ok(self.channels.lock().unwrap().clone())
        }

        async fn stream_url(&self, _: &Channel, _: &str) -> Result<String, CoreError> {
            unreachable!("the directory never resolves streams")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_reused_inside_the_window() {
        let source = CountingSource::new(vec![Channel::new("g1", "Cam 1")]);
        let mut directory = ChannelDirectory::new(Duration::from_secs(600));

        let first = directory.channels(&source).await.unwrap();
        tokio::time::advance(Duration::from_secs(599)).await;
        let second = directory.channels(&source).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_refetched_after_the_window() {
        let source = CountingSource::new(vec![Channel::new("g1", "Cam 1")]);
        let mut directory = ChannelDirectory::new(Duration::from_secs(600));

        directory.channels(&source).await.unwrap();
        source
            .channels
            .lock()
            .unwrap()
            .push(Channel::new("g2", "Cam 2"));
        tokio::time::advance(Duration::from_secs(601)).await;
        let refreshed = directory.channels(&source).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(refreshed.len(), 2);
        assert!(refreshed.contains_key("cam_2"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_propagates_and_retries() {
        let source = CountingSource::new(vec![Channel::new("g1", "Cam 1")]);
        let mut directory = ChannelDirectory::new(Duration::from_secs(600));

        directory.channels(&source).await.unwrap();
        tokio::time::advance(Duration::from_secs(601)).await;
        *source.fail.lock().unwrap() = true;

        assert!(directory.channels(&source).await.is_err());
        assert!(!directory.is_fresh());

        *source.fail.lock().unwrap() = false;
        assert_eq!(directory.channels(&source).await.unwrap().len(), 1);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let source = CountingSource::new(Vec::new());
        let mut directory = ChannelDirectory::new(Duration::from_secs(600));

        directory.channels(&source).await.unwrap();
        directory.invalidate();
        directory.channels(&source).await.unwrap();

        assert_eq!(source.calls(), 2);
    }
}
