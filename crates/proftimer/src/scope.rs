//! RAII scope timing on top of a registry

use crate::registry::TimerRegistry;

/// Resumes a timer when created and accumulates it when dropped.
///
/// # Example
///
/// ```rust
/// use proftimer::{ScopedTimer, TimerRegistry};
///
/// let timers = TimerRegistry::new();
/// {
///     let _timer = ScopedTimer::new(&timers, "load");
///     // ... loading ...
/// } // accumulated here
///
/// assert!(timers.contains("load"));
/// ```
#[derive(Debug)]
pub struct ScopedTimer<'a> {
    registry: &'a TimerRegistry,
    name: String,
}

impl<'a> ScopedTimer<'a> {
    /// Resume `name` on `registry` and return the guard.
    pub fn new(registry: &'a TimerRegistry, name: impl Into<String>) -> Self {
        let name = name.into();
        registry.resume([name.as_str()]);
        Self { registry, name }
    }

    /// Get the name of the timer.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record an event on the timer without stopping it.
    pub fn event(&self) {
        self.registry.event([self.name.as_str()]);
    }

    /// Accumulate now instead of waiting for the end of the scope.
    pub fn finish(self) {
        // Drop does the work
    }
}

impl ScopedTimer<'static> {
    /// Resume `name` on the shared registry.
    pub fn global(name: impl Into<String>) -> Self {
        Self::new(crate::global(), name)
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        self.registry.accum([self.name.as_str()]);
    }
}

/// Time the rest of the enclosing scope.
///
/// With one argument the shared registry is used; pass a registry first to
/// time against it instead.
///
/// # Example
///
/// ```rust
/// use proftimer::{time_scope, TimerRegistry};
///
/// fn do_work(timers: &TimerRegistry) {
///     time_scope!(timers, "work");
///     // ... work ...
/// } // accumulated here
///
/// let timers = TimerRegistry::new();
/// do_work(&timers);
/// assert!(timers.contains("work"));
/// ```
#[macro_export]
macro_rules! time_scope {
    ($name:expr) => {
        let _timer = $crate::ScopedTimer::global($name);
    };
    ($registry:expr, $name:expr) => {
        let _timer = $crate::ScopedTimer::new($registry, $name);
    };
}
