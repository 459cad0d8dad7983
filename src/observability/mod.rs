//! Observability for the pagination engine
//!
//! Structured JSON logging of request lifecycle events. Logging is read-only:
//! it never changes a result and never fails a request.
//!
//! # Usage
//!
//! ```ignore
//! use cursor_pagination::observability::{log_event, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event(Event::PlanBuilt, &[("limit", "11")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
