//! Registry configuration

use serde::{Deserialize, Serialize};

/// Width of the right-aligned name column in textual reports.
pub const DEFAULT_NAME_WIDTH: usize = 20;

/// Configuration for a [`TimerRegistry`](crate::TimerRegistry).
///
/// Deserializable so hosts can embed it in their own settings files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Minimum width of the name field in report lines.
    ///
    /// Names are right-aligned and padded to this width. Longer names are
    /// printed in full, never truncated.
    pub name_width: usize,

    /// Emit `tracing` events for every registry mutation.
    pub trace_events: bool,
}

impl RegistryConfig {
    /// Create a new configuration with custom settings.
    pub fn new(name_width: usize, trace_events: bool) -> Self {
        Self {
            name_width,
            trace_events,
        }
    }

    /// Builder method to set the report name width.
    pub fn with_name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    /// Builder method to toggle tracing of registry mutations.
    pub fn with_trace_events(mut self, enabled: bool) -> Self {
        self.trace_events = enabled;
        self
    }

    /// A configuration that never emits tracing events.
    pub fn quiet() -> Self {
        Self::default().with_trace_events(false)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name_width: DEFAULT_NAME_WIDTH,
            trace_events: true,
        }
    }
}
