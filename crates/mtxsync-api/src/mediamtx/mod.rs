// MediaMTX control API client (v3)
//
// Path listing plus the `config/paths` add/delete endpoints.

pub mod client;
pub mod models;

pub use client::MediaMtxClient;
pub use models::{PathEntry, PathSource};
