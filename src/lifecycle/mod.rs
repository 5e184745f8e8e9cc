//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build resolver → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Cancel in-flight upstream calls → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
