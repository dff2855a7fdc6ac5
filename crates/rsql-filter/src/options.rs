//! Parse options.
//!
//! Options are plain data. Applications that keep their settings in TOML can
//! embed an `[rsql]` table and hand its text to [`ParseOptions::from_toml_str`]:
//!
//! ```toml
//! segment_policy = "reject"   # "skip" (default) or "reject"
//! suggest_operators = false   # default true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RsqlError, RsqlResult};

/// What to do with a segment that is neither `field==value` nor
/// `field==op==value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentPolicy {
    /// Drop the segment and log a warning.
    #[default]
    Skip,
    /// Fail the whole parse with [`RsqlError::MalformedSegment`].
    Reject,
}

/// Options controlling how a query is split and translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Handling of malformed segments.
    pub segment_policy: SegmentPolicy,

    /// Whether invalid operator errors carry a "did you mean" suggestion.
    pub suggest_operators: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            segment_policy: SegmentPolicy::Skip,
            suggest_operators: true,
        }
    }
}

impl ParseOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject malformed segments instead of skipping them.
    pub fn strict() -> Self {
        Self {
            segment_policy: SegmentPolicy::Reject,
            ..Self::default()
        }
    }

    /// Sets the segment policy.
    pub fn with_segment_policy(mut self, policy: SegmentPolicy) -> Self {
        self.segment_policy = policy;
        self
    }

    /// Enables or disables operator suggestions.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggest_operators = enabled;
        self
    }

    /// Loads options from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `RsqlError::Config` if the text is not valid TOML, contains
    /// unknown keys, or has values of the wrong type.
    pub fn from_toml_str(text: &str) -> RsqlResult<Self> {
        toml::from_str(text).map_err(|e| RsqlError::config(e.to_string()))
    }

    /// Serializes the options back to TOML text.
    ///
    /// # Errors
    ///
    /// Returns `RsqlError::Config` if serialization fails.
    pub fn to_toml_string(&self) -> RsqlResult<String> {
        toml::to_string(self).map_err(|e| RsqlError::config(e.to_string()))
    }
}
