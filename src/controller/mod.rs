//! Reconciliation controller.
//!
//! # Data Flow
//! ```text
//! WatchItem stream
//!     → ListingStarted / ListingDone → tracker listing bookkeeping
//!     → Pod → RoleClassifier
//!     → front end: activity → tracker.observe_front_end
//!     → backend:   activity → tracker.observe_backend (probe if new)
//!     → BalancerReconciler.apply(ops)
//!     → publish MembershipView
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: each event completes (probe included) before the next
//! - Incomplete snapshots are skipped and logged; store failures end the loop

pub mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::health::HealthProbe;
use crate::load_balancer::{BalancerReconciler, PoolOperation, PoolStore};
use crate::membership::{is_active, Role, RoleClassifier, MembershipTracker};
use crate::observability::metrics;
use crate::pod::{PodSnapshot, SnapshotError};
use crate::watch::WatchItem;

pub use view::{shared_view, MembershipView, SharedView};

/// Owns the membership state and drives it from pod events.
pub struct Controller {
    classifier: RoleClassifier,
    tracker: MembershipTracker,
    probe: Arc<dyn HealthProbe>,
    reconciler: BalancerReconciler,
    front_end_container: String,
    view: SharedView,
    events_processed: u64,
}

impl Controller {
    pub fn new(
        config: &ControllerConfig,
        probe: Arc<dyn HealthProbe>,
        store: Arc<dyn PoolStore>,
    ) -> ControllerResult<Self> {
        Ok(Self {
            classifier: RoleClassifier::from_config(config)?,
            tracker: MembershipTracker::new(),
            probe,
            reconciler: BalancerReconciler::new(store),
            front_end_container: config.frontend.container_name.clone(),
            view: shared_view(),
            events_processed: 0,
        })
    }

    pub fn tracker(&self) -> &MembershipTracker {
        &self.tracker
    }

    /// Handle for readers of the published membership view.
    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    /// Process one snapshot to completion.
    pub async fn handle(&mut self, pod: &PodSnapshot) -> ControllerResult<()> {
        let span = tracing::info_span!("pod_event", namespace = %pod.namespace, pod = %pod.name);
        self.dispatch(pod).instrument(span).await
    }

    async fn dispatch(&mut self, pod: &PodSnapshot) -> ControllerResult<()> {
        for role in self.classifier.classify(pod).roles() {
            let result = match role {
                Role::FrontEnd => {
                    metrics::record_event("front_end");
                    self.handle_front_end(pod).await
                }
                Role::Backend => {
                    metrics::record_event("backend");
                    self.handle_backend(pod).await
                }
                Role::Other => Ok(()),
            };
            result?;
        }

        self.events_processed += 1;
        self.publish();
        Ok(())
    }

    /// Process one watch item to completion.
    pub async fn handle_item(&mut self, item: &WatchItem) -> ControllerResult<()> {
        match item {
            WatchItem::Pod(pod) => self.handle(pod).await,
            WatchItem::ListingStarted => {
                self.tracker.begin_listing();
                Ok(())
            }
            WatchItem::ListingDone => {
                let ops = self.tracker.finish_listing();
                self.apply(ops).await?;
                self.publish();
                Ok(())
            }
        }
    }

    /// Consume events until the stream ends, a fatal error occurs, or shutdown
    /// is signalled.
    pub async fn run<S>(
        mut self,
        events: S,
        mut shutdown: broadcast::Receiver<()>,
    ) -> ControllerResult<()>
    where
        S: Stream<Item = ControllerResult<WatchItem>>,
    {
        tracing::info!("Controller starting");
        let mut events = std::pin::pin!(events);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Controller received shutdown signal, exiting loop");
                    break;
                }
                next = events.next() => match next {
                    Some(Ok(item)) => self.handle_item(&item).await?,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Fatal event stream error");
                        return Err(e);
                    }
                    None => {
                        tracing::info!("Event stream ended");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    async fn handle_front_end(&mut self, pod: &PodSnapshot) -> ControllerResult<()> {
        if let Err(e) = pod.ready_address() {
            skip(&e);
            return Ok(());
        }

        let active = is_active(pod, pod.container_status(&self.front_end_container));
        let ops = self.tracker.observe_front_end(active, pod.is_deleting());
        self.apply(ops).await
    }

    async fn handle_backend(&mut self, pod: &PodSnapshot) -> ControllerResult<()> {
        let ip = match pod.ready_address() {
            Ok(ip) => ip,
            Err(e) => {
                skip(&e);
                return Ok(());
            }
        };

        // Classified as backend, so a matching container exists.
        let Some(spec) = self.classifier.backend_container(pod) else {
            return Ok(());
        };
        let Some(&port) = spec.ports.first() else {
            skip(&SnapshotError::NoPort(spec.name.clone()));
            return Ok(());
        };

        let active = is_active(pod, self.classifier.backend_status(pod, spec));
        let addr = SocketAddr::new(ip, port);
        let ops = self
            .tracker
            .observe_backend(addr, active, pod.is_deleting(), self.probe.as_ref())
            .await;
        self.apply(ops).await
    }

    async fn apply(&self, ops: Vec<PoolOperation>) -> ControllerResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        self.reconciler
            .apply(&ops)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(error = %e, "Pool store operation failed");
                ControllerError::from(e)
            })
    }

    fn publish(&self) {
        metrics::record_membership(self.tracker.len(), self.tracker.front_end_available());
        self.view
            .store(Arc::new(MembershipView::capture(&self.tracker, self.events_processed)));
    }
}

fn skip(error: &SnapshotError) {
    tracing::info!(reason = %error, "Skipping incomplete pod snapshot");
    metrics::record_skipped(error.reason());
}
