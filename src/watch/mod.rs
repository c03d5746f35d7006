//! Pod event source.
//!
//! # Data Flow
//! ```text
//! kube watcher (list + watch, re-list on reconnect)
//!     → default backoff on errors
//!     → Init / InitDone      → ListingStarted / ListingDone
//!     → Apply / InitApply / Delete → Pod(PodSnapshot)
//!                                   (or UnexpectedPayload, which is fatal)
//! ```
//!
//! # Design Decisions
//! - Connection, retry and credentials are left entirely to kube's defaults
//! - Every (re)connect re-lists; the markers around the listing let the
//!   tracker forget pods deleted while the watch was down

pub mod source;

pub use source::{connect, pod_events, pods_api, watch_item, WatchItem};
