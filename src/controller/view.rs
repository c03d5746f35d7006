//! Read-only membership snapshot shared with the admin API.

use std::net::SocketAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::membership::MembershipTracker;

/// Immutable copy of the tracker state after an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipView {
    pub front_end_available: bool,
    pub members: Vec<SocketAddr>,
    pub events_processed: u64,
}

impl MembershipView {
    pub fn capture(tracker: &MembershipTracker, events_processed: u64) -> Self {
        Self {
            front_end_available: tracker.front_end_available(),
            members: tracker.members().copied().collect(),
            events_processed,
        }
    }
}

/// Handle readers use to load the latest view without locking.
pub type SharedView = Arc<ArcSwap<MembershipView>>;

pub fn shared_view() -> SharedView {
    Arc::new(ArcSwap::from_pointee(MembershipView::default()))
}
