// Trassir VMS client modules
//
// Hand-written client for the VMS SDK query API: session login, the
// `sid`-authenticated query loop, and the handful of methods the
// reconciler needs (channel list, video tokens).

pub mod auth;
pub mod channels;
pub mod client;
pub mod models;

pub use client::VmsClient;
pub use models::Channel;
