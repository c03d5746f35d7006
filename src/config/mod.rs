//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML)
//!     → loader.rs (parse & deserialize, legacy flat YAML accepted)
//!     → validation.rs (semantic checks)
//!     → ControllerConfig (validated, immutable)
//!     → handed to the controller, probe and pool store at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, BackendConfig, ControllerConfig, FrontendConfig, ObservabilityConfig,
    ProbeConfig, WatchConfig,
};
