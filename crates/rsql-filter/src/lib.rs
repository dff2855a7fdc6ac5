//! RSQL-style query strings to MongoDB filter documents.
//!
//! This crate turns a compact filter expression such as
//! `name==John;age==gt==30` into the filter document a MongoDB driver accepts.
//!
//! # Syntax
//!
//! A query is a list of segments separated by `;`. Each segment is either
//! `field==value` (equality) or `field==op==value`.
//!
//! | op | clause |
//! |---|---|
//! | `==`, `eq` | `{"$eq": value}` |
//! | `ne` | `{"$ne": value}` |
//! | `gt`, `ge`, `lt`, `le` | `{"$gt"/"$gte"/"$lt"/"$lte": value}` |
//! | `in` | `{"$in": [a, b, ...]}` from `(a,b,...)` |
//! | `out` | `{"$nin": [a, b, ...]}` from `(a,b,...)` |
//! | `like` | `{"$regex": value}` |
//! | `ilike` | `{"$regex": "(?i)" + value}` |
//!
//! Values are never coerced; `age==gt==30` compares against the string `"30"`.
//! There is no escaping, so a value cannot contain `;` or `==`. Logical
//! grouping is not supported: every segment is an implicit AND, and a later
//! segment on the same field replaces an earlier one.
//!
//! # Example
//!
//! ```
//! use rsql_filter::{parse, MONGO_BACKEND};
//! use serde_json::json;
//!
//! let doc = parse("name==in==(John,Jane);age==gt==30", MONGO_BACKEND).unwrap();
//! assert_eq!(
//!     doc.into_value(),
//!     json!({
//!         "name": {"$in": ["John", "Jane"]},
//!         "age": {"$gt": "30"}
//!     })
//! );
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing`. Malformed segments dropped under the
//! default [`SegmentPolicy::Skip`] are logged at `warn`.

mod backend;
mod document;
mod error;
mod operator;
mod options;
mod splitter;
mod translator;

pub use backend::{BackendRegistry, MONGO_BACKEND};
pub use document::FilterDocument;
pub use error::{RsqlError, RsqlResult};
pub use operator::Operator;
pub use options::{ParseOptions, SegmentPolicy};
pub use splitter::{
    QueryTriple, SegmentError, SplitResult, Splitter, PART_DELIMITER, SEGMENT_DELIMITER,
};
pub use translator::{parse_list, MongoTranslator, Translator, CASE_INSENSITIVE_FLAG};

/// Parses an RSQL query into a filter document for `backend`, using default
/// options.
///
/// # Errors
///
/// Returns `RsqlError::UnsupportedBackend` if `backend` is not `"mongo"`,
/// `RsqlError::InvalidOperator` if any segment uses an unknown operator, and
/// `RsqlError::MalformedListValue` if an `in`/`out` value lacks parentheses.
pub fn parse(query: &str, backend: &str) -> RsqlResult<FilterDocument> {
    parse_with_options(query, backend, &ParseOptions::default())
}

/// Parses an RSQL query into a filter document for `backend`.
///
/// # Errors
///
/// As [`parse`], plus `RsqlError::MalformedSegment` when `options` rejects
/// malformed segments.
pub fn parse_with_options(
    query: &str,
    backend: &str,
    options: &ParseOptions,
) -> RsqlResult<FilterDocument> {
    BackendRegistry::global().parse(query, backend, options)
}
