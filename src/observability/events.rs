//! Observable pagination events

use std::fmt;

use super::logger::Severity;

/// Lifecycle events of a paging request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,
    /// Paging arguments rejected by validation
    ArgsRejected,
    /// Cursor token could not be decoded or verified
    CursorRejected,
    /// Paging state resolved from arguments or cursor
    ContextResolved,
    /// Query plan applied to a builder
    PlanBuilt,
    /// Edges and page info computed from result rows
    ResultAssembled,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ArgsRejected => "ARGS_REJECTED",
            Event::CursorRejected => "CURSOR_REJECTED",
            Event::ContextResolved => "CONTEXT_RESOLVED",
            Event::PlanBuilt => "PLAN_BUILT",
            Event::ResultAssembled => "RESULT_ASSEMBLED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::ArgsRejected => Severity::Info,
            Event::CursorRejected => Severity::Warn,
            Event::ContextResolved | Event::PlanBuilt | Event::ResultAssembled => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
