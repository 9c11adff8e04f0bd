//! Ad-hoc Profiling Timers
//!
//! Quick and dirty named stopwatches for profiling sections of a codebase:
//! - Resume and accumulate any number of named timers, several at once
//! - Count events against a timer independently of its duration
//! - Reset timers and report totals as text or JSON
//! - RAII scope timing and a process-wide default registry
//!
//! # Example
//!
//! ```rust
//! use proftimer::TimerRegistry;
//!
//! let timers = TimerRegistry::new();
//!
//! timers.resume(["mytimer"]);
//! // Code that takes some time...
//! timers.accum(["mytimer"]);
//!
//! timers.report(std::io::stdout(), ["mytimer"]).unwrap();
//! ```
//!
//! The same operations exist as free functions over a shared registry:
//!
//! ```rust
//! proftimer::resume(["startup"]);
//! proftimer::accum(["startup"]);
//! proftimer::report_all(std::io::stdout()).unwrap();
//! ```

mod config;
mod error;
mod shared;
mod registry;
mod scope;
mod snapshot;

pub use config::*;
pub use error::*;
pub use shared::*;
pub use registry::*;
pub use scope::*;
pub use snapshot::*;

/// Re-export for convenience
pub use std::time::Duration;
