//! Reconciliation between a Trassir VMS channel directory and MediaMTX paths.
//!
//! - **[`derive_id`] / [`assign_ids`]** turn channel names into unique,
//!   URL-safe [`ChannelId`]s.
//! - **[`ChannelDirectory`]** caches the channel snapshot for a reload window.
//! - **[`compute_paths`]** lists the [`StreamPath`]s a snapshot calls for.
//! - **[`Reconciler`]** runs the periodic cycle that converges MediaMTX's
//!   configured paths toward the desired set, through the [`ChannelSource`]
//!   and [`PathStore`] seams.

pub mod channel_id;
pub mod config;
pub mod directory;
pub mod error;
pub mod paths;
pub mod reconciler;
pub mod source;

pub use channel_id::{ChannelId, ChannelMap, assign_ids, derive_id};
pub use config::{PathSelection, ReconcilerOptions, SyncConfig, TlsVerification};
pub use directory::ChannelDirectory;
pub use error::CoreError;
pub use paths::{MAIN_STREAM, StreamPath, compute_paths};
pub use reconciler::{CycleReport, Reconciler};
pub use source::{ChannelSource, PathStore, VmsSource};

pub use mtxsync_api::{Channel, PathEntry};
