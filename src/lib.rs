//! Pod balancer controller library.
//!
//! Watches Kubernetes pods and keeps an Apache httpd `mod_proxy_balancer`
//! member list in step with the healthy backend pods.

pub mod admin;
pub mod config;
pub mod controller;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod membership;
pub mod observability;
pub mod pod;
pub mod watch;

pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::{ControllerError, ControllerResult};
pub use lifecycle::Shutdown;
