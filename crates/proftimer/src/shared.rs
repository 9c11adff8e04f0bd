//! Process-wide default registry
//!
//! Convenience wrappers for code that just wants one set of timers for the
//! whole program. Anything that needs isolation, such as tests running in
//! parallel, should own a [`TimerRegistry`] instead.

use crate::registry::TimerRegistry;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Global registry instance
static GLOBAL_TIMERS: OnceLock<TimerRegistry> = OnceLock::new();

/// Get the shared registry.
///
/// Created empty on first use and never torn down.
pub fn global() -> &'static TimerRegistry {
    GLOBAL_TIMERS.get_or_init(TimerRegistry::new)
}

/// Resume the named timers on the shared registry.
pub fn resume<I, S>(names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().resume(names);
}

/// Accumulate the named timers on the shared registry.
pub fn accum<I, S>(names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().accum(names);
}

/// Record an event on the named timers of the shared registry.
pub fn event<I, S>(names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().event(names);
}

/// Remove the named timers from the shared registry.
pub fn reset<I, S>(names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().reset(names);
}

/// Report timers from the shared registry. No names means all, sorted.
pub fn report<W, I, S>(writer: W, names: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global().report(writer, names)
}

/// Report every timer in the shared registry, sorted by name.
pub fn report_all<W: Write>(writer: W) -> io::Result<()> {
    global().report_all(writer)
}
