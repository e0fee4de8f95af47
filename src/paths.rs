//! Path classification: public (excluded) and private endpoints.
//!
//! Both checks run before any token work. Excluded and private paths use the
//! best-effort protocol; everything else requires authentication.

use std::collections::HashSet;

use crate::identity::PathClass;

/// Public endpoints reachable without authentication.
pub const DEFAULT_EXCLUDED_PATHS: [&str; 2] = ["/service/health", "/health"];

/// Substring marking internal endpoints.
pub const DEFAULT_PRIVATE_MARKER: &str = "private";

/// Decides how a request path is authenticated.
///
/// Implement this to swap the static tables for another source of truth.
pub trait PathClassifier: Send + Sync {
    /// True if the path is a public endpoint.
    fn is_excluded(&self, path: &str) -> bool;

    /// True if the path is an internal endpoint.
    fn is_private(&self, path: &str) -> bool;

    /// Classifies the path. Exclusion wins over privacy.
    fn classify(&self, path: &str) -> PathClass {
        if self.is_excluded(path) {
            PathClass::Excluded
        } else if self.is_private(path) {
            PathClass::Private
        } else {
            PathClass::Required
        }
    }
}

/// Immutable table of public paths.
///
/// Entries are registered without their trailing path parameter, so an entry
/// `/res/excluded` also covers `/res/excluded/{id}`.
///
/// # Examples
///
/// ```
/// use identity_gate::ExcludeList;
///
/// let list = ExcludeList::new(["/service/health", "/res/excluded"]);
/// assert!(list.is_excluded("/service/health"));
/// assert!(list.is_excluded("/res/excluded/42"));
/// assert!(!list.is_excluded("/res/excluded/42/extra"));
/// assert!(!list.is_excluded(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeList {
    entries: HashSet<String>,
}

impl ExcludeList {
    /// Builds the table from its entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the path, or the path without its last segment, is registered.
    pub fn is_excluded(&self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        if self.entries.contains(path) {
            return true;
        }
        self.entries.contains(&strip_path_param(path))
    }
}

impl Default for ExcludeList {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PATHS)
    }
}

/// Drops the first and last `/`-separated segments and rebuilds the interior
/// as `/a/b`. Trailing empty segments are discarded before the last one is
/// dropped, so `/a/b/` normalizes like `/a/b`.
///
/// `/service/health/123` becomes `/service/health`; `/health` becomes `""`.
pub(crate) fn strip_path_param(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.len() < 3 {
        return String::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(segment);
            acc
        })
}

/// Substring test for internal endpoints.
///
/// The marker matches anywhere, including inside another segment:
/// `/v1/privatedata` is private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateMarker {
    marker: String,
}

impl PrivateMarker {
    /// Creates a classifier for the given marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The marker substring.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True if the path contains the marker.
    pub fn is_private(&self, path: &str) -> bool {
        path.contains(self.marker.as_str())
    }
}

impl Default for PrivateMarker {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVATE_MARKER)
    }
}

/// Static path rules: an exclude list plus a private marker.
///
/// Built once at startup (usually from [`AuthConfig`](crate::AuthConfig)) and
/// shared read-only by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    exclude: ExcludeList,
    private: PrivateMarker,
}

impl PathRules {
    /// Combines an exclude list and a private marker.
    pub fn new(exclude: ExcludeList, private: PrivateMarker) -> Self {
        Self { exclude, private }
    }

    /// The exclude list.
    pub fn exclude_list(&self) -> &ExcludeList {
        &self.exclude
    }

    /// The private marker.
    pub fn private_marker(&self) -> &PrivateMarker {
        &self.private
    }
}

impl PathClassifier for PathRules {
    fn is_excluded(&self, path: &str) -> bool {
        self.exclude.is_excluded(path)
    }

    fn is_private(&self, path: &str) -> bool {
        self.private.is_private(path)
    }
}
