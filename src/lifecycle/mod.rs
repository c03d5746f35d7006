//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Logging → Metrics → Kube client → Admin API → Event loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → broadcast → event loop and admin API exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The event loop finishes the event in hand before observing shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
