//! Translation of query triples into native filter documents.

use serde_json::Value;

use crate::document::FilterDocument;
use crate::error::{RsqlError, RsqlResult};
use crate::operator::Operator;
use crate::options::ParseOptions;
use crate::splitter::QueryTriple;

/// Pattern prefix that turns on case-insensitive matching in a Mongo regex.
pub const CASE_INSENSITIVE_FLAG: &str = "(?i)";

/// Converts query triples into a backend's native filter document.
///
/// Translation is all-or-nothing: the first invalid triple fails the call and
/// no partial document is returned.
pub trait Translator: Send + Sync {
    /// Translates `triples` in order. Later triples on the same field replace
    /// earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `RsqlError::InvalidOperator` for an unrecognized operator and
    /// `RsqlError::MalformedListValue` for an `in`/`out` value that is not a
    /// parenthesized list.
    fn translate(
        &self,
        triples: &[QueryTriple],
        options: &ParseOptions,
    ) -> RsqlResult<FilterDocument>;
}

/// Translator for MongoDB query documents.
///
/// | operator | clause |
/// |---|---|
/// | `==`, `eq` | `$eq` |
/// | `ne` | `$ne` |
/// | `gt`, `ge` | `$gt`, `$gte` |
/// | `lt`, `le` | `$lt`, `$lte` |
/// | `in`, `out` | `$in`, `$nin` with a string array |
/// | `like` | `$regex` |
/// | `ilike` | `$regex` with a `(?i)` prefix |
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoTranslator;

impl MongoTranslator {
    /// Creates a Mongo translator.
    pub fn new() -> Self {
        Self
    }

    /// Returns the Mongo query keyword for an operator.
    pub fn keyword(operator: Operator) -> &'static str {
        match operator {
            Operator::Equal | Operator::Eq => "$eq",
            Operator::NotEqual => "$ne",
            Operator::GreaterThan => "$gt",
            Operator::GreaterOrEqual => "$gte",
            Operator::LessThan => "$lt",
            Operator::LessOrEqual => "$lte",
            Operator::In => "$in",
            Operator::Out => "$nin",
            Operator::Like | Operator::ILike => "$regex",
        }
    }

    fn clause_value(triple: &QueryTriple, operator: Operator) -> RsqlResult<Value> {
        let value = match operator {
            Operator::In | Operator::Out => {
                let items = parse_list(&triple.value)
                    .ok_or_else(|| RsqlError::malformed_list_value(&triple.field, &triple.value))?;
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            Operator::ILike => Value::String(format!("{}{}", CASE_INSENSITIVE_FLAG, triple.value)),
            _ => Value::String(triple.value.clone()),
        };
        Ok(value)
    }
}

impl Translator for MongoTranslator {
    fn translate(
        &self,
        triples: &[QueryTriple],
        options: &ParseOptions,
    ) -> RsqlResult<FilterDocument> {
        let mut document = FilterDocument::new();

        for triple in triples {
            let operator = resolve_operator(&triple.operator, options)?;
            let keyword = Self::keyword(operator);
            let value = Self::clause_value(triple, operator)?;

            tracing::trace!(
                field = %triple.field,
                operator = %operator,
                keyword,
                position = triple.position,
                "translated clause"
            );

            if document
                .insert_clause(triple.field.as_str(), keyword, value)
                .is_some()
            {
                tracing::debug!(
                    field = %triple.field,
                    position = triple.position,
                    "clause replaces an earlier clause on the same field"
                );
            }
        }

        Ok(document)
    }
}

/// Parses an operator, attaching a suggestion when enabled.
pub(crate) fn resolve_operator(text: &str, options: &ParseOptions) -> RsqlResult<Operator> {
    text.parse::<Operator>().map_err(|err| {
        let suggestion = options
            .suggest_operators
            .then(|| Operator::closest(text))
            .flatten()
            .map(|op| op.as_str().to_string());
        err.with_suggestion(suggestion)
    })
}

/// Splits a `(a,b,c)` list into its items.
///
/// Returns `None` unless the value starts with `(` and ends with `)`. An empty
/// list `()` yields no items; empty items between commas are kept.
pub fn parse_list(value: &str) -> Option<Vec<&str>> {
    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    if inner.is_empty() {
        return Some(Vec::new());
    }
    Some(inner.split(',').collect())
}
