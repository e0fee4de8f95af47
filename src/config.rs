//! Static configuration for path classification.
//!
//! Loaded once at startup, validated, then turned into an immutable
//! [`PathRules`] shared by every request.
//!
//! ```toml
//! exclude_paths = ["/service/health", "/health"]
//! private_marker = "private"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::paths::{
    ExcludeList, PathRules, PrivateMarker, DEFAULT_EXCLUDED_PATHS, DEFAULT_PRIVATE_MARKER,
};

/// Path classification settings.
///
/// # Examples
///
/// ```
/// use identity_gate::{AuthConfig, PathClass, PathClassifier};
///
/// let config = AuthConfig::from_toml_str(r#"exclude_paths = ["/status"]"#).unwrap();
/// let rules = config.path_rules().unwrap();
///
/// assert_eq!(rules.classify("/status/123"), PathClass::Excluded);
/// assert_eq!(rules.classify("/private/user/read"), PathClass::Private);
/// assert_eq!(rules.classify("/health"), PathClass::Required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Public endpoints, registered without their trailing path parameter.
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
    /// Substring marking internal endpoints.
    #[serde(default = "default_private_marker")]
    pub private_marker: String,
}

fn default_exclude_paths() -> Vec<String> {
    DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect()
}

fn default_private_marker() -> String {
    DEFAULT_PRIVATE_MARKER.to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            exclude_paths: default_exclude_paths(),
            private_marker: default_private_marker(),
        }
    }
}

impl AuthConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or unknown keys and
    /// [`Error::InvalidConfig`] when validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every exclude entry is an absolute, non-blank path and
    /// that the private marker is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending value.
    pub fn validate(&self) -> Result<(), Error> {
        for path in &self.exclude_paths {
            if path.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "exclude_paths entries must not be blank".to_string(),
                ));
            }
            if !path.starts_with('/') {
                return Err(Error::InvalidConfig(format!(
                    "exclude_paths entry {path:?} must start with '/'"
                )));
            }
        }
        if self.private_marker.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "private_marker must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the configuration and builds the path rules.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn path_rules(&self) -> Result<PathRules, Error> {
        self.validate()?;
        tracing::info!(
            exclude_paths = self.exclude_paths.len(),
            private_marker = %self.private_marker,
            "path rules loaded"
        );
        Ok(PathRules::new(
            ExcludeList::new(self.exclude_paths.iter().cloned()),
            PrivateMarker::new(self.private_marker.clone()),
        ))
    }
}
