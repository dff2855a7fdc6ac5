//! The fixed set of recognized comparison operators.

use std::fmt;
use std::str::FromStr;

use strsim::levenshtein;

use crate::error::RsqlError;

/// Maximum Levenshtein distance to consider an operator as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// A recognized RSQL comparison operator.
///
/// The textual forms are matched exactly and case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`, the implicit operator of a `field==value` segment.
    Equal,
    /// `eq`
    Eq,
    /// `ne`
    NotEqual,
    /// `gt`
    GreaterThan,
    /// `ge`
    GreaterOrEqual,
    /// `lt`
    LessThan,
    /// `le`
    LessOrEqual,
    /// `in`, value is a parenthesized list.
    In,
    /// `out`, value is a parenthesized list.
    Out,
    /// `like`, case-sensitive pattern match.
    Like,
    /// `ilike`, case-insensitive pattern match.
    ILike,
}

impl Operator {
    /// Every recognized operator, in canonical order.
    pub const ALL: [Operator; 11] = [
        Operator::Equal,
        Operator::Eq,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::In,
        Operator::Out,
        Operator::Like,
        Operator::ILike,
    ];

    /// Returns the operator as it is written in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::Eq => "eq",
            Operator::NotEqual => "ne",
            Operator::GreaterThan => "gt",
            Operator::GreaterOrEqual => "ge",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "le",
            Operator::In => "in",
            Operator::Out => "out",
            Operator::Like => "like",
            Operator::ILike => "ilike",
        }
    }

    /// Returns true if `text` is one of the recognized operators.
    ///
    /// ```
    /// use rsql_filter::Operator;
    ///
    /// assert!(Operator::is_valid("ge"));
    /// assert!(!Operator::is_valid("GE"));
    /// ```
    pub fn is_valid(text: &str) -> bool {
        Self::ALL.iter().any(|op| op.as_str() == text)
    }

    /// Returns true for operators whose value is a parenthesized list.
    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::Out)
    }

    /// Finds the recognized operator closest to `text`.
    ///
    /// Distances are compared case-insensitively. Returns `None` when `text`
    /// is already valid or nothing is within the threshold.
    pub fn closest(text: &str) -> Option<Operator> {
        if Self::is_valid(text) {
            return None;
        }

        let lower = text.to_lowercase();

        // A candidate that needs as many edits as it has characters is not a near miss.
        Self::ALL
            .iter()
            .map(|op| (*op, levenshtein(&lower, op.as_str())))
            .filter(|(op, d)| *d <= MAX_SUGGESTION_DISTANCE && *d < op.as_str().len())
            .min_by_key(|(_, d)| *d)
            .map(|(op, _)| op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = RsqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RsqlError::invalid_operator(s))
    }
}
