//! Named timer registry

use crate::config::RegistryConfig;
use crate::error::{ProfTimerError, ProfTimerResult};
use crate::snapshot::TimerSnapshot;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// State of a single named timer.
#[derive(Debug, Clone, Copy)]
struct Timer {
    /// Instant of the most recent resume
    start: Instant,
    /// Time accumulated over all resume/accum cycles
    total: Duration,
    /// Number of recorded events
    count: u64,
}

impl Timer {
    fn started_at(start: Instant) -> Self {
        Self {
            start,
            total: Duration::ZERO,
            count: 0,
        }
    }
}

/// A store of named, accumulating stopwatches.
///
/// Every operation takes a single lock over the whole map for its full
/// duration, including [`report`](Self::report) and all of its writes, so a
/// report never interleaves with a mutation. Unrelated names still contend on
/// that one lock; this is a known throughput limit for heavy concurrent use.
///
/// Operations on names that are not registered are silent no-ops, except
/// [`resume`](Self::resume) which creates the timer.
///
/// # Example
///
/// ```rust
/// use proftimer::TimerRegistry;
///
/// let timers = TimerRegistry::new();
/// timers.resume(["parse", "total"]);
/// // ... parsing ...
/// timers.accum(["parse"]);
/// timers.event(["parse"]);
/// timers.accum(["total"]);
///
/// let mut out = Vec::new();
/// timers.report(&mut out, ["parse", "total"]).unwrap();
/// ```
#[derive(Debug)]
pub struct TimerRegistry {
    timers: Mutex<HashMap<String, Timer>>,
    config: RegistryConfig,
}

impl TimerRegistry {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            timers: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Get the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // The map only ever holds plain values, so a panic in another holder
    // (e.g. a caller's writer during `report`) cannot leave it inconsistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Timer>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resume all the named timers, creating any that do not exist.
    ///
    /// All of them record the same starting instant. Time already
    /// accumulated is kept.
    pub fn resume<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut timers = self.lock();
        let now = Instant::now();

        for name in names {
            let name = name.as_ref();
            match timers.get_mut(name) {
                Some(timer) => timer.start = now,
                None => {
                    timers.insert(name.to_owned(), Timer::started_at(now));
                    if self.config.trace_events {
                        tracing::debug!(target: "proftimer", name, "timer created");
                    }
                }
            }

            if self.config.trace_events {
                tracing::trace!(target: "proftimer", name, "timer resumed");
            }
        }
    }

    /// Add the time elapsed since each timer's last resume to its total.
    ///
    /// Unknown timers are ignored. Calling this again without resuming in
    /// between adds the time since the same, older start instant once more.
    pub fn accum<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut timers = self.lock();
        let now = Instant::now();

        for name in names {
            let name = name.as_ref();
            let Some(timer) = timers.get_mut(name) else {
                continue;
            };

            let elapsed = now.saturating_duration_since(timer.start);
            timer.total = timer.total.saturating_add(elapsed);

            if self.config.trace_events {
                tracing::trace!(
                    target: "proftimer",
                    name,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    total_ms = timer.total.as_secs_f64() * 1000.0,
                    "timer accumulated"
                );
            }
        }
    }

    /// Increase the event count on all named timers. Unknown timers are ignored.
    pub fn event<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut timers = self.lock();

        for name in names {
            let name = name.as_ref();
            let Some(timer) = timers.get_mut(name) else {
                continue;
            };

            timer.count = timer.count.saturating_add(1);

            if self.config.trace_events {
                tracing::trace!(target: "proftimer", name, count = timer.count, "event recorded");
            }
        }
    }

    /// Remove the named timers, discarding their totals and counts.
    pub fn reset<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut timers = self.lock();

        for name in names {
            let name = name.as_ref();
            if timers.remove(name).is_some() && self.config.trace_events {
                tracing::debug!(target: "proftimer", name, "timer removed");
            }
        }
    }

    /// Remove every timer.
    pub fn clear(&self) {
        let mut timers = self.lock();
        if self.config.trace_events {
            tracing::debug!(target: "proftimer", removed = timers.len(), "registry cleared");
        }
        timers.clear();
    }

    /// Write one line per timer to `writer`.
    ///
    /// With no names, every registered timer is reported in ascending name
    /// order. Otherwise exactly the given names are reported in the given
    /// order; unknown names show a zero duration and are not created.
    ///
    /// Each line is the name right-aligned to the configured width, `": "`,
    /// and the accumulated duration:
    ///
    /// ```text
    ///                parse: 50.212ms
    /// ```
    ///
    /// The lock is held until the last line is written. Errors from the
    /// writer are returned as-is.
    pub fn report<W, I, S>(&self, mut writer: W, names: I) -> io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let timers = self.lock();
        let width = self.config.name_width;

        for snap in select(&timers, names) {
            writeln!(writer, "{:>width$}: {:?}", snap.name, snap.total)?;
        }

        Ok(())
    }

    /// Report every registered timer, sorted by name.
    pub fn report_all<W: Write>(&self, writer: W) -> io::Result<()> {
        self.report(writer, std::iter::empty::<&str>())
    }

    /// Take owned copies of the selected timers.
    ///
    /// Selection and ordering follow the same rules as [`report`](Self::report).
    pub fn snapshot<I, S>(&self, names: I) -> Vec<TimerSnapshot>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let timers = self.lock();
        select(&timers, names)
    }

    /// Write the selected timers to `writer` as a JSON array.
    pub fn write_json<W, I, S>(&self, mut writer: W, names: I) -> ProfTimerResult<()>
    where
        W: Write,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshots = self.snapshot(names);
        serde_json::to_writer_pretty(&mut writer, &snapshots).map_err(|e| {
            // serde_json wraps sink failures; surface them as I/O errors
            if e.is_io() {
                ProfTimerError::Io(e.into())
            } else {
                e.into()
            }
        })?;
        writeln!(writer)?;
        Ok(())
    }

    /// Accumulated duration of a timer, zero if it does not exist.
    pub fn total(&self, name: &str) -> Duration {
        self.lock().get(name).map_or(Duration::ZERO, |t| t.total)
    }

    /// Event count of a timer, zero if it does not exist.
    pub fn count(&self, name: &str) -> u64 {
        self.lock().get(name).map_or(0, |t| t.count)
    }

    /// Check whether a timer is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no timers are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Names of all registered timers, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a name selection against the map. The lock MUST be held.
fn select<I, S>(timers: &HashMap<String, Timer>, names: I) -> Vec<TimerSnapshot>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let to_snapshot = |name: &str, timer: &Timer| TimerSnapshot {
        name: name.to_owned(),
        total: timer.total,
        count: timer.count,
    };

    let requested: Vec<S> = names.into_iter().collect();
    if requested.is_empty() {
        let mut all: Vec<TimerSnapshot> = timers
            .iter()
            .map(|(name, timer)| to_snapshot(name.as_str(), timer))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        return all;
    }

    requested
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match timers.get(name) {
                Some(timer) => to_snapshot(name, timer),
                None => TimerSnapshot::zero(name),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const NONE: [&str; 0] = [];

    fn report_string(registry: &TimerRegistry, names: &[&str]) -> String {
        let mut out = Vec::new();
        registry.report(&mut out, names).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Writer that fails on the first write.
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_resume_creates_timer() {
        let registry = TimerRegistry::new();
        registry.resume(["a"]);

        assert!(registry.contains("a"));
        assert_eq!(registry.total("a"), Duration::ZERO);
        assert_eq!(registry.count("a"), 0);
    }

    #[test]
    fn test_resume_empty_is_noop() {
        let registry = TimerRegistry::new();
        registry.resume(NONE);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resume_shares_start_instant() {
        let registry = TimerRegistry::new();
        registry.resume(["a", "b"]);

        let timers = registry.lock();
        assert_eq!(timers["a"].start, timers["b"].start);
    }

    #[test]
    fn test_accum_adds_elapsed() {
        let registry = TimerRegistry::new();
        registry.resume(["t"]);
        sleep(Duration::from_millis(10));
        registry.accum(["t"]);

        let total = registry.total("t");
        assert!(total >= Duration::from_millis(10), "total should be at least 10ms, got {:?}", total);
    }

    #[test]
    fn test_accum_without_resume_is_stale() {
        let registry = TimerRegistry::new();
        registry.resume(["t"]);
        sleep(Duration::from_millis(5));
        registry.accum(["t"]);
        let first = registry.total("t");

        sleep(Duration::from_millis(5));
        registry.accum(["t"]);
        let second = registry.total("t");

        // The second accum re-adds everything since the original start
        assert!(second >= first * 2, "expected {:?} >= 2 * {:?}", second, first);
    }

    #[test]
    fn test_accum_unknown_is_noop() {
        let registry = TimerRegistry::new();
        registry.accum(["missing"]);
        assert!(!registry.contains("missing"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resume_keeps_total() {
        let registry = TimerRegistry::new();
        registry.resume(["t"]);
        sleep(Duration::from_millis(5));
        registry.accum(["t"]);
        let first = registry.total("t");

        registry.resume(["t"]);
        assert_eq!(registry.total("t"), first);
    }

    #[test]
    fn test_event_counts() {
        let registry = TimerRegistry::new();
        registry.resume(["a", "b"]);
        registry.event(["a", "b"]);
        registry.event(["a"]);
        registry.event(["a", "a"]);

        assert_eq!(registry.count("a"), 4);
        assert_eq!(registry.count("b"), 1);
    }

    #[test]
    fn test_event_unknown_is_noop() {
        let registry = TimerRegistry::new();
        registry.event(["missing"]);
        assert!(!registry.contains("missing"));
        assert_eq!(registry.count("missing"), 0);
    }

    #[test]
    fn test_reset_removes_timer() {
        let registry = TimerRegistry::new();
        registry.resume(["a", "b"]);
        registry.event(["a"]);
        registry.reset(["a", "missing"]);

        assert!(!registry.contains("a"));
        assert!(registry.contains("b"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reset_then_resume_is_fresh() {
        let registry = TimerRegistry::new();
        registry.resume(["t"]);
        sleep(Duration::from_millis(5));
        registry.accum(["t"]);
        registry.event(["t"]);
        registry.reset(["t"]);

        registry.accum(["t"]);
        registry.event(["t"]);
        assert!(!registry.contains("t"));

        registry.resume(["t"]);
        assert_eq!(registry.total("t"), Duration::ZERO);
        assert_eq!(registry.count("t"), 0);
    }

    #[test]
    fn test_clear() {
        let registry = TimerRegistry::new();
        registry.resume(["a", "b", "c"]);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_report_all_sorted() {
        let registry = TimerRegistry::new();
        registry.resume(["zeta", "alpha", "mid"]);

        let report = report_string(&registry, &[]);
        let names: Vec<&str> = report
            .lines()
            .map(|line| line.split(':').next().unwrap().trim())
            .collect();

        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_report_explicit_order_and_unknown() {
        let registry = TimerRegistry::new();
        registry.resume(["a", "b"]);

        let report = report_string(&registry, &["b", "missing", "a"]);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("b:"));
        assert_eq!(lines[1], format!("{:>20}: 0ns", "missing"));
        assert!(lines[2].trim_start().starts_with("a:"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_report_line_format() {
        let registry = TimerRegistry::new();
        registry.resume(["short"]);

        let report = report_string(&registry, &["short"]);
        assert_eq!(report, "               short: 0ns\n");
    }

    #[test]
    fn test_report_long_name_not_truncated() {
        let registry = TimerRegistry::new();
        let name = "a_really_long_timer_name_over_twenty";

        let report = report_string(&registry, &[name]);
        assert_eq!(report, format!("{}: 0ns\n", name));
    }

    #[test]
    fn test_report_custom_width() {
        let registry = TimerRegistry::with_config(RegistryConfig::quiet().with_name_width(6));
        let report = report_string(&registry, &["io"]);
        assert_eq!(report, "    io: 0ns\n");
    }

    #[test]
    fn test_report_empty_registry() {
        let registry = TimerRegistry::new();
        assert_eq!(report_string(&registry, &[]), "");
    }

    #[test]
    fn test_report_propagates_writer_error() {
        let registry = TimerRegistry::new();
        registry.resume(["a"]);

        let err = registry.report_all(BrokenSink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_snapshot_matches_report_selection() {
        let registry = TimerRegistry::new();
        registry.resume(["b", "a"]);
        registry.event(["b"]);

        let all = registry.snapshot(NONE);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "a");
        assert_eq!(all[1].name, "b");
        assert_eq!(all[1].count, 1);

        let picked = registry.snapshot(["b", "nope"]);
        assert_eq!(picked[0].name, "b");
        assert_eq!(picked[1], TimerSnapshot::zero("nope"));
    }

    #[test]
    fn test_write_json() {
        let registry = TimerRegistry::new();
        registry.resume(["a"]);
        registry.event(["a"]);

        let mut out = Vec::new();
        registry.write_json(&mut out, NONE).unwrap();

        let parsed: Vec<TimerSnapshot> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "a");
        assert_eq!(parsed[0].count, 1);
    }

    #[test]
    fn test_write_json_broken_sink() {
        let registry = TimerRegistry::new();
        registry.resume(["a"]);

        let err = registry.write_json(BrokenSink, ["a"]).unwrap_err();
        match err {
            ProfTimerError::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_names_sorted() {
        let registry = TimerRegistry::new();
        registry.resume(["c", "a", "b"]);
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_recovers_after_writer_panic() {
        struct PanickingSink;

        impl Write for PanickingSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                panic!("writer exploded");
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let registry = TimerRegistry::new();
        registry.resume(["a"]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = registry.report_all(PanickingSink);
        }));
        assert!(result.is_err());

        registry.event(["a"]);
        assert_eq!(registry.count("a"), 1);
    }
}
