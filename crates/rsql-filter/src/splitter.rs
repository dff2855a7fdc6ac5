//! Splitter for RSQL query strings.
//!
//! A query is a `;`-separated list of segments. Each segment is either
//! `field==value` (implicit equality) or `field==op==value`.

use std::fmt;

use crate::operator::Operator;

/// Separator between segments.
pub const SEGMENT_DELIMITER: char = ';';

/// Separator between field, operator and value within a segment.
pub const PART_DELIMITER: &str = "==";

/// One (field, operator, value) filter condition.
///
/// The operator is kept as written; it is validated during translation so
/// that an unknown operator can be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTriple {
    /// The target attribute name. Never empty when produced by [`Splitter`];
    /// [`QueryTriple::new`] does not check it.
    pub field: String,
    /// The operator text.
    pub operator: String,
    /// The raw value.
    pub value: String,
    /// Zero-based index of the segment this triple came from.
    pub position: usize,
}

impl QueryTriple {
    /// Creates a triple at position 0.
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            position: 0,
        }
    }

    /// Sets the segment position.
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Renders the triple back as query text. Implicit equality is written in its
/// short `field==value` form.
impl fmt::Display for QueryTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == Operator::Equal.as_str() {
            write!(f, "{}{}{}", self.field, PART_DELIMITER, self.value)
        } else {
            write!(
                f,
                "{}{}{}{}{}",
                self.field, PART_DELIMITER, self.operator, PART_DELIMITER, self.value
            )
        }
    }
}

/// A segment that could not be split into a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentError {
    /// The raw segment text.
    pub segment: String,
    /// Zero-based index of the segment in the query.
    pub position: usize,
    /// Number of parts the segment split into on `==`.
    pub parts: usize,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segment {} ('{}') split into {} part(s), expected 2 or 3 with a non-empty field",
            self.position, self.segment, self.parts
        )
    }
}

impl std::error::Error for SegmentError {}

/// Result of splitting a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    /// Triples in input order.
    pub triples: Vec<QueryTriple>,
    /// Malformed segments, in input order.
    pub errors: Vec<SegmentError>,
}

/// Splitter for RSQL query strings.
///
/// # Example
///
/// ```
/// use rsql_filter::Splitter;
///
/// let triples = Splitter::new("name==John;age==gt==30").split();
/// assert_eq!(triples.len(), 2);
/// assert_eq!(triples[1].operator, "gt");
/// ```
pub struct Splitter<'a> {
    input: &'a str,
}

impl<'a> Splitter<'a> {
    /// Creates a splitter over the given query.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Returns the well-formed triples, discarding malformed segments.
    pub fn split(self) -> Vec<QueryTriple> {
        self.split_with_errors().triples
    }

    /// Returns the well-formed triples along with every malformed segment.
    ///
    /// Empty segments (from `;;`, a trailing `;`, or empty input) are not
    /// malformed; they are skipped without a report.
    pub fn split_with_errors(self) -> SplitResult {
        let mut result = SplitResult::default();

        for (position, segment) in self.input.split(SEGMENT_DELIMITER).enumerate() {
            if segment.is_empty() {
                continue;
            }

            match Self::split_segment(segment, position) {
                Ok(triple) => result.triples.push(triple),
                Err(error) => result.errors.push(error),
            }
        }

        result
    }

    fn split_segment(segment: &str, position: usize) -> Result<QueryTriple, SegmentError> {
        let parts: Vec<&str> = segment.split(PART_DELIMITER).collect();

        let triple = match parts.as_slice() {
            [field, value] if !field.is_empty() => {
                QueryTriple::new(*field, Operator::Equal.as_str(), *value)
            }
            [field, operator, value] if !field.is_empty() => {
                QueryTriple::new(*field, *operator, *value)
            }
            _ => {
                return Err(SegmentError {
                    segment: segment.to_string(),
                    position,
                    parts: parts.len(),
                })
            }
        };

        Ok(triple.at(position))
    }
}
