//! Kubernetes pod watch.

use futures_util::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};

use crate::config::WatchConfig;
use crate::error::ControllerResult;
use crate::pod::PodSnapshot;

/// Build a client from an explicit kubeconfig, or by kube's usual inference
/// (in-cluster service account, then `~/.kube/config`).
pub async fn connect(config: &WatchConfig) -> ControllerResult<Client> {
    let client = match &config.kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)?;
            let options = KubeConfigOptions::default();
            let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?;
            Client::try_from(client_config)?
        }
        None => Client::try_default().await?,
    };

    tracing::info!(
        namespace = config.namespace.as_deref().unwrap_or("<all>"),
        "Kubernetes client ready"
    );
    Ok(client)
}

/// Pod API scoped to one namespace, or to all of them.
pub fn pods_api(client: Client, namespace: Option<&str>) -> Api<Pod> {
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}

/// One step of the pod watch, as the controller sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchItem {
    /// A pod was created, changed, deleted, or re-delivered by a listing.
    Pod(PodSnapshot),
    /// A full listing begins; every live pod follows before `ListingDone`.
    ListingStarted,
    ListingDone,
}

/// Translate a watch event. A pod that cannot be converted is an error.
pub fn watch_item(event: watcher::Event<Pod>) -> ControllerResult<WatchItem> {
    match event {
        watcher::Event::Apply(pod)
        | watcher::Event::InitApply(pod)
        | watcher::Event::Delete(pod) => Ok(WatchItem::Pod(PodSnapshot::try_from(&pod)?)),
        watcher::Event::Init => {
            tracing::debug!("Listing pods");
            Ok(WatchItem::ListingStarted)
        }
        watcher::Event::InitDone => {
            tracing::info!("Pod listing complete");
            Ok(WatchItem::ListingDone)
        }
    }
}

/// Stream of watch items for every pod change.
///
/// Watch errors are logged and retried by kube's backoff; they never end the
/// stream. Each (re)connect is bracketed by listing markers so the consumer can
/// drop state for pods that vanished while disconnected.
pub fn pod_events(api: Api<Pod>) -> impl Stream<Item = ControllerResult<WatchItem>> + Send {
    watcher(api, watcher::Config::default())
        .default_backoff()
        .filter_map(|event| async move {
            match event {
                Ok(event) => Some(watch_item(event)),
                Err(e) => {
                    tracing::warn!(error = %e, "Pod watch error, retrying");
                    None
                }
            }
        })
}
