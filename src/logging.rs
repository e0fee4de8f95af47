use std::fmt;

/// Request-scoped logger for authentication decisions.
///
/// Every event carries the request id and path as structured fields, so a
/// decision can be traced without repeating them at each call site. Token
/// values must never be passed in; wrap them in [`Secret`](crate::Secret).
#[derive(Debug, Clone, Copy)]
pub struct DecisionLog<'a> {
    request_id: &'a str,
    path: &'a str,
}

impl<'a> DecisionLog<'a> {
    /// Creates a logger bound to one request.
    pub fn new(request_id: &'a str, path: &'a str) -> Self {
        Self { request_id, path }
    }

    /// Returns the request id attached to every event.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level event.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs a warning-level event.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs an error-level event.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs a debug-level event.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, path = %self.path, "{}", args);
    }
}
