//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → in-flight requests finish
//!
//! Background tasks (tasks.rs):
//!     POST /init → BackgroundTasks::spawn
//!     after server stop → BackgroundTasks::drain(grace) → abort leftovers
//! ```
//!
//! # Design Decisions
//! - Shutdown has a deadline: background work is aborted after the grace period
//! - Background failures are logged, never returned to the request that started them

pub mod shutdown;
pub mod signals;
pub mod tasks;

pub use shutdown::Shutdown;
pub use tasks::BackgroundTasks;
