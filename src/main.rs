//! Pod balancer controller.
//!
//! # Architecture Overview
//!
//! ```text
//!     Kubernetes API                      front-end pod (httpd)
//!          │                                     ▲
//!          │ pod watch                           │ kubectl exec: grep / sed / graceful
//!          ▼                                     │
//!     ┌─────────┐   ┌────────────┐   ┌────────────────┐   ┌────────────────┐
//!     │  watch  │──▶│ membership │──▶│ load_balancer  │──▶│   PoolStore    │
//!     │ source  │   │  tracker   │   │  reconciler    │   │ kubectl/memory │
//!     └─────────┘   └─────┬──────┘   └────────────────┘   └────────────────┘
//!                         │ probe new backends
//!                         ▼
//!                   ┌────────────┐
//!                   │   health   │──── HTTP GET ────▶ backend pods
//!                   └────────────┘
//!
//!     Cross-cutting: config, observability (tracing + metrics), admin API, lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use pod_balancer::admin::{self, AdminState};
use pod_balancer::config::{load_config, ControllerConfig};
use pod_balancer::controller::Controller;
use pod_balancer::error::ControllerResult;
use pod_balancer::health::{HealthProbe, HttpProbe};
use pod_balancer::lifecycle::{wait_for_signal, Shutdown};
use pod_balancer::load_balancer::{KubectlPoolStore, MemoryPoolStore, PoolStore};
use pod_balancer::observability::{logging, metrics};
use pod_balancer::watch;

#[derive(Parser, Debug)]
#[command(name = "pod-balancer")]
#[command(about = "Keeps an httpd balancer pool in step with Kubernetes pods", long_about = None)]
struct Args {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Kubeconfig to use instead of in-cluster or default credentials
    #[arg(long)]
    kubeconfig: Option<String>,

    /// Overrides observability.log_level
    #[arg(long)]
    log_level: Option<String>,

    /// Log pool changes without touching the front-end pod
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(kubeconfig) = args.kubeconfig {
        config.watch.kubeconfig = Some(kubeconfig);
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        front_end = %config.frontend.pod_name,
        backend_image = %config.backend.image_pattern,
        dry_run = args.dry_run,
        "pod-balancer starting"
    );

    if let Err(e) = run(config, args.dry_run).await {
        tracing::error!(error = %e, "Controller stopped");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run(config: ControllerConfig, dry_run: bool) -> ControllerResult<()> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signals"),
        }
        signal_shutdown.trigger();
    });

    let store: Arc<dyn PoolStore> = if dry_run {
        Arc::new(MemoryPoolStore::new())
    } else {
        Arc::new(KubectlPoolStore::new(&config.frontend))
    };
    let probe: Arc<dyn HealthProbe> = Arc::new(HttpProbe::new(&config.probe));
    let controller = Controller::new(&config, probe, store)?;

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState::new(controller.view(), &config.admin.api_key);
        let admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API failed");
            }
        });
    }

    let client = watch::connect(&config.watch).await?;
    let pods = watch::pods_api(client, config.watch.namespace.as_deref());
    controller
        .run(watch::pod_events(pods), shutdown.subscribe())
        .await
}
