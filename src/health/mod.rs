//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Backend pod observed active, not yet tracked:
//!     → probe.rs (HTTP GET http://ip:port/, up to N attempts)
//!     → true: tracker admits the backend
//!     → false: candidate dropped until its next event
//! ```
//!
//! # Design Decisions
//! - Probing happens once, at admission; tracked backends are not re-checked
//! - The probe sits behind a trait so the state machine can be tested without
//!   a network

pub mod probe;

pub use probe::{retry_probe, AttemptOutcome, HealthProbe, HttpProbe, RetryPolicy};
