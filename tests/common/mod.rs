//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pod_balancer::config::{ControllerConfig, ProbeConfig};
use pod_balancer::pod::{
    ConditionStatus, ContainerSpec, ContainerState, ContainerStatus, DeletionMarkers, PodSnapshot,
};

/// Handle to a running mock backend.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock backend on an ephemeral port that always answers `status`.
pub async fn start_mock_backend(status: u16) -> MockBackend {
    start_programmable_backend(move |_| async move { status }).await
}

/// Start a mock backend whose status is computed per request.
///
/// The closure receives the zero-based request number.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let status = f(n).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status, reason
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, hits }
}

/// A listener that accepts connections and never answers them.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Probe settings that keep failing tests fast.
pub fn fast_probe(attempts: u32) -> ProbeConfig {
    ProbeConfig {
        attempts,
        interval_ms: 250,
        path: "/".to_string(),
    }
}

pub fn test_config() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    config.probe = fast_probe(2);
    config
}

fn conditions(ready: bool) -> BTreeMap<String, ConditionStatus> {
    let status = if ready {
        ConditionStatus::True
    } else {
        ConditionStatus::False
    };
    BTreeMap::from([
        ("Initialized".to_string(), ConditionStatus::True),
        ("Ready".to_string(), status),
        ("ContainersReady".to_string(), status),
        ("PodScheduled".to_string(), ConditionStatus::True),
    ])
}

fn status(name: &str, image: &str, active: bool) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        image: image.to_string(),
        ready: active,
        state: if active {
            ContainerState::Running
        } else {
            ContainerState::Waiting
        },
    }
}

/// Snapshot of a tomcat backend pod listening on `addr`.
pub fn backend_pod(name: &str, addr: SocketAddr, active: bool) -> PodSnapshot {
    PodSnapshot {
        namespace: "default".to_string(),
        name: name.to_string(),
        ip: addr.ip().to_string(),
        labels: BTreeMap::from([("app".to_string(), "tomcat".to_string())]),
        containers: vec![ContainerSpec {
            name: "tomcat".to_string(),
            image: "tomcat:9.0".to_string(),
            ports: vec![addr.port()],
        }],
        statuses: vec![status("tomcat", "tomcat:9.0", active)],
        conditions: conditions(active),
        deletion: DeletionMarkers::default(),
    }
}

/// Snapshot of the front-end pod under the default configuration.
pub fn frontend_pod(active: bool, deleting: bool) -> PodSnapshot {
    PodSnapshot {
        namespace: "default".to_string(),
        name: "httpd".to_string(),
        ip: "10.0.0.2".to_string(),
        labels: BTreeMap::new(),
        containers: vec![ContainerSpec {
            name: "httpd".to_string(),
            image: "httpd:2.4".to_string(),
            ports: vec![80],
        }],
        statuses: vec![status("httpd", "httpd:2.4", active)],
        conditions: conditions(active),
        deletion: DeletionMarkers {
            grace_period_set: deleting,
            timestamp_set: deleting,
        },
    }
}

/// Mark a snapshot as being deleted.
pub fn deleting(mut pod: PodSnapshot) -> PodSnapshot {
    pod.deletion = DeletionMarkers {
        grace_period_set: true,
        timestamp_set: true,
    };
    pod
}
