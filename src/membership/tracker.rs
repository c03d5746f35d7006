//! Membership state machine.
//!
//! # States
//! - Front end: available / unavailable
//! - Backend address: tracked / untracked
//!
//! # Transitions
//! ```text
//! FrontEnd active               → available; EnsurePresent for every tracked member
//! FrontEnd inactive             → unavailable; no pool operation
//! Backend tracked + inactive    → untracked; EnsureAbsent if front end available
//! Backend untracked + active    → probe; on success tracked,
//!                                 EnsurePresent if front end available (else deferred)
//! Backend untracked + inactive  → nothing
//!
//! Listing (watch re-list):
//! begin                         → start recording what the listing shows
//! FrontEnd active during list   → available; member flush deferred to finish
//! finish                        → drop members the listing never showed;
//!                                 front end unavailable if it never showed;
//!                                 EnsureAbsent for dropped, EnsurePresent for
//!                                 survivors if a flush was deferred
//! ```
//!
//! # Design Decisions
//! - Tracked backends are never re-probed
//! - Members added while the front end is down are pushed on its next active event
//! - All state lives in the tracker instance; nothing is process-global

use std::collections::BTreeSet;
use std::net::SocketAddr;

use crate::health::HealthProbe;
use crate::load_balancer::PoolOperation;

/// What a full pod listing has shown so far.
#[derive(Debug, Default)]
struct Listing {
    backends: BTreeSet<SocketAddr>,
    front_end_seen: bool,
    flush_pending: bool,
}

/// Tracks which backends are trusted and whether the front end is up.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    members: BTreeSet<SocketAddr>,
    front_end_available: bool,
    listing: Option<Listing>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front_end_available(&self) -> bool {
        self.front_end_available
    }

    pub fn is_tracked(&self, addr: &SocketAddr) -> bool {
        self.members.contains(addr)
    }

    /// Tracked members in address order.
    pub fn members(&self) -> impl Iterator<Item = &SocketAddr> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_listing(&self) -> bool {
        self.listing.is_some()
    }

    /// A full pod listing starts. Every live pod is re-delivered before
    /// [`finish_listing`](Self::finish_listing).
    pub fn begin_listing(&mut self) {
        tracing::debug!(members = self.members.len(), "Pod listing started");
        self.listing = Some(Listing::default());
    }

    /// The listing is complete: forget whatever it did not show.
    pub fn finish_listing(&mut self) -> Vec<PoolOperation> {
        let Some(listing) = self.listing.take() else {
            return Vec::new();
        };

        if !listing.front_end_seen && self.front_end_available {
            tracing::info!("Front end missing from pod listing, treating it as offline");
            self.front_end_available = false;
        }

        let stale: Vec<SocketAddr> = self
            .members
            .difference(&listing.backends)
            .copied()
            .collect();
        for addr in &stale {
            tracing::info!(%addr, "Backend missing from pod listing, forgetting it");
            self.members.remove(addr);
        }

        if !self.front_end_available {
            return Vec::new();
        }

        let mut ops: Vec<PoolOperation> =
            stale.into_iter().map(PoolOperation::EnsureAbsent).collect();
        if listing.flush_pending {
            ops.extend(self.members.iter().copied().map(PoolOperation::EnsurePresent));
        }
        ops
    }

    /// Apply a front-end event.
    pub fn observe_front_end(&mut self, active: bool, deleting: bool) -> Vec<PoolOperation> {
        if let Some(listing) = self.listing.as_mut() {
            listing.front_end_seen = true;
            listing.flush_pending = active;
        }

        if active {
            if self.front_end_available {
                tracing::info!("Front end modified");
            } else {
                tracing::info!("Front end is online");
            }
            self.front_end_available = true;

            if self.is_listing() {
                return Vec::new();
            }
            if !self.members.is_empty() {
                tracing::info!(members = self.members.len(), "Checking for missing balancer members");
            }
            return self
                .members
                .iter()
                .copied()
                .map(PoolOperation::EnsurePresent)
                .collect();
        }

        if deleting {
            tracing::info!("Front end is being deleted");
        } else {
            tracing::info!("Front end is offline");
        }
        self.front_end_available = false;
        Vec::new()
    }

    /// Apply a backend event, probing the candidate when it first appears active.
    pub async fn observe_backend<P>(
        &mut self,
        addr: SocketAddr,
        active: bool,
        deleting: bool,
        probe: &P,
    ) -> Vec<PoolOperation>
    where
        P: HealthProbe + ?Sized,
    {
        if let Some(listing) = self.listing.as_mut() {
            listing.backends.insert(addr);
        }
        let tracked = self.members.contains(&addr);

        match (tracked, active) {
            (true, false) => {
                self.members.remove(&addr);
                if self.front_end_available {
                    tracing::info!(%addr, "Backend went offline, removing it from the pool");
                    vec![PoolOperation::EnsureAbsent(addr)]
                } else {
                    tracing::info!(%addr, "Backend went offline while the front end is unavailable");
                    Vec::new()
                }
            }
            (true, true) => Vec::new(),
            (false, true) => {
                if !probe.probe(addr).await {
                    tracing::warn!(%addr, "Can't get a response from backend, not admitting it");
                    return Vec::new();
                }

                self.members.insert(addr);
                if self.front_end_available {
                    tracing::info!(%addr, "Backend is online, adding it to the pool");
                    vec![PoolOperation::EnsurePresent(addr)]
                } else {
                    tracing::info!(
                        %addr,
                        "Backend is online, but the front end isn't; it will be added when the front end is back"
                    );
                    Vec::new()
                }
            }
            (false, false) => {
                if deleting {
                    tracing::debug!(%addr, "Backend is being deleted");
                } else {
                    tracing::debug!(%addr, "Backend is offline");
                }
                Vec::new()
            }
        }
    }
}
