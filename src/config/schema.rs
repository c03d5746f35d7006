//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the controller.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the balancer controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    /// The reverse-proxy pod whose balancer pool is kept in sync.
    pub frontend: FrontendConfig,

    /// Criteria selecting application-server pods.
    pub backend: BackendConfig,

    /// Health probe applied to new backend candidates.
    pub probe: ProbeConfig,

    /// Pod watch settings.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Read-only status API.
    pub admin: AdminConfig,
}

/// Front-end (reverse proxy) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Exact name of the front-end pod.
    pub pod_name: String,

    /// Container inside the front-end pod running the proxy.
    pub container_name: String,

    /// Proxy binary used for graceful reloads.
    pub binary: String,

    /// Balancer member file inside the front-end container.
    pub pool_file: String,

    /// Namespace of the front-end pod, passed to `kubectl exec`.
    pub namespace: Option<String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            pod_name: "httpd".to_string(),
            container_name: "httpd".to_string(),
            binary: "/usr/local/apache2/bin/httpd".to_string(),
            pool_file: "/usr/local/apache2/conf/balancer/proxy_balancer.conf".to_string(),
            namespace: None,
        }
    }
}

/// Backend selection criteria.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Regex the container image must match in full.
    pub image_pattern: String,

    /// Labels a backend pod must carry. Empty matches every pod.
    pub labels: BTreeMap<String, String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            image_pattern: "tomcat:.*".to_string(),
            labels: BTreeMap::new(),
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Maximum number of GET attempts before giving up.
    pub attempts: u32,

    /// Slot each attempt gets, in milliseconds. A failed attempt waits out the
    /// rest of its slot; an attempt still running at the end is abandoned.
    pub interval_ms: u64,

    /// Request path probed on the backend.
    pub path: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval_ms: 1000,
            path: "/".to_string(),
        }
    }
}

/// Pod watch configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Restrict the watch to one namespace. `None` watches all namespaces.
    pub namespace: Option<String>,

    /// Explicit kubeconfig path. `None` uses in-cluster or default inference.
    pub kubeconfig: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin status API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Flat `config.yml` layout used by earlier deployments.
///
/// Keys are camelCase and only cover the front end and backend selection.
/// Missing keys fall back to the sectioned defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyConfig {
    pub httpd_pod_name: String,
    pub httpd_container_name: String,
    pub httpd_binary: String,
    pub proxy_balancer_conf: String,
    #[serde(rename = "tomcatImage")]
    pub tomcat_image_pattern: String,
    pub tomcat_labels: Option<BTreeMap<String, String>>,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        let frontend = FrontendConfig::default();
        let backend = BackendConfig::default();
        Self {
            httpd_pod_name: frontend.pod_name,
            httpd_container_name: frontend.container_name,
            httpd_binary: frontend.binary,
            proxy_balancer_conf: frontend.pool_file,
            tomcat_image_pattern: backend.image_pattern,
            tomcat_labels: None,
        }
    }
}

impl From<LegacyConfig> for ControllerConfig {
    fn from(legacy: LegacyConfig) -> Self {
        Self {
            frontend: FrontendConfig {
                pod_name: legacy.httpd_pod_name,
                container_name: legacy.httpd_container_name,
                binary: legacy.httpd_binary,
                pool_file: legacy.proxy_balancer_conf,
                namespace: None,
            },
            backend: BackendConfig {
                image_pattern: legacy.tomcat_image_pattern,
                labels: legacy.tomcat_labels.unwrap_or_default(),
            },
            ..Self::default()
        }
    }
}
