use std::path::PathBuf;

use clap::Parser;

/// Keep MediaMTX paths in sync with the channels of a Trassir VMS.
///
/// Every VMS channel is published as `<id>` (main stream) plus
/// `<id>/<stream>` for each configured sub-stream the channel offers.
/// Settings come from the config file and the environment; see
/// `API_HOST`, `RTSP_HOST`, `LOGIN`, `PASSWORD`, `PATHS` and the
/// `MTXSYNC_*` variables.
#[derive(Debug, Parser)]
#[command(name = "mtxsync", version, about, long_about)]
pub struct Cli {
    /// TOML config file. A missing file is not an error.
    #[arg(
        short,
        long,
        env = "MTXSYNC_CONFIG",
        default_value = "mtxsync.toml",
        value_name = "FILE"
    )]
    pub config: PathBuf,

    /// Run a single reconciliation cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
