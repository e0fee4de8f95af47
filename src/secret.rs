use std::fmt;

/// A wrapper that keeps bearer material out of logs.
///
/// Access and delegation tokens are wrapped as soon as they are read from the
/// request headers. Formatting a `Secret` always yields `[REDACTED]`; the
/// token itself is only reachable through [`expose_secret`](Self::expose_secret),
/// which the verifier adapters call right before handing it to a verifier.
///
/// # Examples
///
/// ```
/// use identity_gate::Secret;
///
/// let token = Secret::new("eyJhbGciOiJSUzI1NiJ9.payload.sig".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(format!("{}", token), "[REDACTED]");
/// assert!(token.expose_secret().starts_with("eyJ"));
/// ```
// Do not derive Clone, Copy or Default: a token should have exactly one owner.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the wrapped value.
    ///
    /// Callers must not log or format the returned reference.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Secret<String> {
    /// Wraps a header value, treating empty values as absent.
    ///
    /// Only the delegation header reads this way; an empty access token is
    /// still a token and goes to the verifier.
    pub(crate) fn from_header(value: Option<&str>) -> Option<Self> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| Self::new(v.to_string()))
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
