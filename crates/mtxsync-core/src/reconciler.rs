// ── Reconciliation loop ──
//
// One cycle converges MediaMTX's configured paths toward the paths the
// channel directory calls for:
//
// - paths that vanished since the previous cycle are deleted,
// - selected paths that are missing get created with a fresh source URL,
// - selected paths whose source is not ready are deleted and recreated,
// - selected paths that are ready are left alone.
//
// Any error aborts the cycle without rollback. Re-running converges the
// same way, so the next tick simply starts over.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use mtxsync_api::{MediaMtxClient, VmsClient};

use crate::config::{PathSelection, ReconcilerOptions, SyncConfig};
use crate::directory::ChannelDirectory;
use crate::error::CoreError;
use crate::paths::compute_paths;
use crate::source::{ChannelSource, PathStore, VmsSource};

/// What a single cycle observed and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Desired paths that were not desired in the previous cycle.
    pub added: Vec<String>,
    /// Paths desired in the previous cycle that no longer are.
    pub removed: Vec<String>,
    /// Paths created on the media server.
    pub created: Vec<String>,
    /// Paths deleted from the media server.
    pub deleted: Vec<String>,
    /// Selected paths left untouched because their source is ready.
    pub healthy: usize,
}

impl CycleReport {
    /// Whether the cycle changed anything on the media server.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Drives the VMS → MediaMTX synchronization.
pub struct Reconciler<C, P> {
    source: C,
    store: P,
    directory: ChannelDirectory,
    streams: Vec<String>,
    selection: PathSelection,
    check_interval: Duration,
    /// Desired path names of the last completed cycle.
    previous: BTreeSet<String>,
}

impl Reconciler<VmsSource, MediaMtxClient> {
    /// Build a reconciler wired to the real VMS and MediaMTX clients.
    pub fn from_config(config: &SyncConfig) -> Result<Self, CoreError> {
        let vms = VmsClient::new(
            config.vms_url.clone(),
            config.username.clone(),
            config.password.clone(),
            &config.vms_transport(),
        )?;
        let media = MediaMtxClient::new(config.media_url.clone(), &config.media_transport())?;

        Ok(Self::new(
            VmsSource::new(vms, config.stream_host.clone()),
            media,
            config.options.clone(),
        ))
    }
}

impl<C: ChannelSource, P: PathStore> Reconciler<C, P> {
    pub fn new(source: C, store: P, options: ReconcilerOptions) -> Self {
        Self {
            source,
            store,
            directory: ChannelDirectory::new(options.reload_interval),
            streams: options.streams,
            selection: options.selection,
            check_interval: options.check_interval,
            previous: BTreeSet::new(),
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Desired path names recorded by the last completed cycle.
    pub fn previous_paths(&self) -> &BTreeSet<String> {
        &self.previous
    }

    /// Run one reconciliation cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CoreError> {
        let channels = self.directory.channels(&self.source).await?;
        let desired = compute_paths(&channels, &self.streams);
        let desired_names: BTreeSet<String> = desired.iter().map(ToString::to_string).collect();

        let added: Vec<String> = desired_names.difference(&self.previous).cloned().collect();
        let removed: Vec<String> = self.previous.difference(&desired_names).cloned().collect();

        let mut report = CycleReport::default();
        let mut configured = self.store.list_paths().await?;

        if !removed.is_empty() {
            for path in &removed {
                if configured.contains_key(path) {
                    info!(path = %path, "removing path: no longer available");
                    self.store.delete_path(path).await?;
                    report.deleted.push(path.clone());
                }
            }
            configured = self.store.list_paths().await?;
        }

        if !added.is_empty() {
            info!(paths = %added.join(", "), "new paths available");
        }

        for path in &desired {
            let name = path.to_string();
            if !self.selection.contains(&name) {
                continue;
            }

            if let Some(entry) = configured.get(&name) {
                if entry.ready {
                    report.healthy += 1;
                    continue;
                }
                info!(path = %name, "removing path: source is not ready");
                self.store.delete_path(&name).await?;
                report.deleted.push(name.clone());
            }

            let channel = channels
                .get(&path.channel)
                .ok_or_else(|| CoreError::UnknownChannel { path: name.clone() })?;
            let source = self.source.stream_url(channel, path.stream_name()).await?;

            info!(path = %name, source = %source, "adding path");
            self.store.create_path(&name, &source).await?;
            report.created.push(name);
        }

        report.added = added;
        report.removed = removed;
        self.previous = desired_names;
        Ok(report)
    }

    /// Run cycles every `check_interval` until `cancel` fires, then release
    /// the upstream session.
    pub async fn run(&mut self, cancel: CancellationToken) {
        info!(
            interval_secs = self.check_interval.as_secs(),
            "starting path synchronization"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                result = self.run_cycle() => match result {
                    Ok(report) => debug!(
                        created = report.created.len(),
                        deleted = report.deleted.len(),
                        healthy = report.healthy,
                        "cycle complete"
                    ),
                    Err(e) if e.is_auth() => error!(error = %e, "cycle aborted: VMS rejected credentials"),
                    Err(e) => warn!(error = %e, "cycle aborted"),
                },
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.check_interval) => {}
            }
        }

        if let Err(e) = self.source.close().await {
            debug!(error = %e, "failed to close VMS session");
        }
        info!("path synchronization stopped");
    }
}
