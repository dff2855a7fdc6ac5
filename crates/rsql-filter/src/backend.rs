//! Backend registry.
//!
//! Maps a backend identifier to the [`Translator`] that produces its native
//! filter documents. The splitter is shared by every backend.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::document::FilterDocument;
use crate::error::{RsqlError, RsqlResult};
use crate::options::{ParseOptions, SegmentPolicy};
use crate::splitter::Splitter;
use crate::translator::{MongoTranslator, Translator};

/// Identifier of the MongoDB backend.
pub const MONGO_BACKEND: &str = "mongo";

/// A set of translators keyed by backend identifier.
///
/// # Example
///
/// ```
/// use rsql_filter::{BackendRegistry, ParseOptions, MONGO_BACKEND};
///
/// let registry = BackendRegistry::with_defaults();
/// let doc = registry
///     .parse("age==ge==18", MONGO_BACKEND, &ParseOptions::default())
///     .unwrap();
/// assert_eq!(doc.to_json_string(), r#"{"age":{"$gte":"18"}}"#);
/// ```
#[derive(Default)]
pub struct BackendRegistry {
    translators: BTreeMap<String, Box<dyn Translator>>,
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.backends().collect::<Vec<_>>())
            .finish()
    }
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in MongoDB backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MONGO_BACKEND, MongoTranslator::new());
        registry
    }

    /// Returns the process-wide default registry.
    pub fn global() -> &'static BackendRegistry {
        static REGISTRY: OnceLock<BackendRegistry> = OnceLock::new();
        REGISTRY.get_or_init(BackendRegistry::with_defaults)
    }

    /// Registers a translator, replacing any translator under the same id.
    pub fn register(&mut self, backend: impl Into<String>, translator: impl Translator + 'static) {
        self.translators.insert(backend.into(), Box::new(translator));
    }

    /// Returns the translator for `backend`.
    pub fn get(&self, backend: &str) -> Option<&dyn Translator> {
        self.translators.get(backend).map(|t| t.as_ref())
    }

    /// Returns true if `backend` is registered.
    pub fn contains(&self, backend: &str) -> bool {
        self.translators.contains_key(backend)
    }

    /// Iterates over registered backend identifiers in sorted order.
    pub fn backends(&self) -> impl Iterator<Item = &str> {
        self.translators.keys().map(String::as_str)
    }

    /// Splits `query` and translates it with the translator for `backend`.
    ///
    /// # Errors
    ///
    /// Returns `RsqlError::UnsupportedBackend` before looking at the query if
    /// `backend` is not registered. Under [`SegmentPolicy::Reject`], returns
    /// `RsqlError::MalformedSegment` for the first malformed segment unless a
    /// triple ahead of it fails translation, in which case that error wins.
    /// Otherwise propagates translator errors.
    pub fn parse(
        &self,
        query: &str,
        backend: &str,
        options: &ParseOptions,
    ) -> RsqlResult<FilterDocument> {
        let translator = self
            .get(backend)
            .ok_or_else(|| RsqlError::unsupported_backend(backend))?;

        let split = Splitter::new(query).split_with_errors();

        if let Some(first) = split.errors.first() {
            match options.segment_policy {
                SegmentPolicy::Reject => {
                    // Errors are reported in input order, so triples ahead of
                    // the malformed segment are translated first.
                    let preceding: Vec<_> = split
                        .triples
                        .iter()
                        .take_while(|t| t.position < first.position)
                        .cloned()
                        .collect();
                    translator.translate(&preceding, options)?;

                    return Err(RsqlError::malformed_segment(
                        first.segment.as_str(),
                        first.position,
                    ));
                }
                SegmentPolicy::Skip => {
                    for error in &split.errors {
                        tracing::warn!(
                            segment = %error.segment,
                            position = error.position,
                            parts = error.parts,
                            "skipping malformed query segment"
                        );
                    }
                }
            }
        }

        tracing::debug!(
            backend,
            triples = split.triples.len(),
            skipped = split.errors.len(),
            "translating query"
        );

        translator.translate(&split.triples, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::QueryTriple;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Translator that records field names only, for registry tests.
    struct FieldsOnly;

    impl Translator for FieldsOnly {
        fn translate(
            &self,
            triples: &[QueryTriple],
            _options: &ParseOptions,
        ) -> RsqlResult<FilterDocument> {
            let mut doc = FilterDocument::new();
            for triple in triples {
                doc.insert_clause(triple.field.as_str(), "exists", json!(true));
            }
            Ok(doc)
        }
    }

    #[test]
    fn test_defaults_contain_mongo_only() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.backends().collect::<Vec<_>>(), vec![MONGO_BACKEND]);
        assert!(registry.contains("mongo"));
        assert!(!registry.contains("Mongo"));
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = BackendRegistry::new();
        let err = registry
            .parse("name==John", MONGO_BACKEND, &ParseOptions::default())
            .unwrap_err();
        assert_eq!(err, RsqlError::unsupported_backend("mongo"));
    }

    #[test]
    fn test_register_custom_backend_shares_splitter() {
        let mut registry = BackendRegistry::with_defaults();
        registry.register("fields", FieldsOnly);

        let doc = registry
            .parse("a==1;b==zz==2", "fields", &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.into_value(), json!({"a": {"exists": true}, "b": {"exists": true}}));
        assert_eq!(registry.backends().collect::<Vec<_>>(), vec!["fields", "mongo"]);
    }

    #[test]
    fn test_register_replaces_existing_backend() {
        let mut registry = BackendRegistry::with_defaults();
        registry.register(MONGO_BACKEND, FieldsOnly);
        let doc = registry
            .parse("a==gt==1", MONGO_BACKEND, &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.into_value(), json!({"a": {"exists": true}}));
    }

    #[test]
    fn test_backend_checked_before_query() {
        let registry = BackendRegistry::with_defaults();
        let err = registry
            .parse("name==bogus==x;==", "MySQL", &ParseOptions::strict())
            .unwrap_err();
        assert_eq!(err, RsqlError::unsupported_backend("MySQL"));
    }

    #[test]
    fn test_reject_policy_reports_first_malformed_segment() {
        let registry = BackendRegistry::with_defaults();
        let err = registry
            .parse("a==1;bad;c==d==e==f", MONGO_BACKEND, &ParseOptions::strict())
            .unwrap_err();
        assert_eq!(err, RsqlError::malformed_segment("bad", 1));
    }

    #[test]
    fn test_reject_policy_reports_earlier_invalid_operator_first() {
        let registry = BackendRegistry::with_defaults();
        let err = registry
            .parse("a==xx==1;bad", MONGO_BACKEND, &ParseOptions::strict())
            .unwrap_err();
        assert_eq!(err, RsqlError::invalid_operator("xx"));
    }

    #[test]
    fn test_reject_policy_reports_malformed_segment_before_later_invalid_operator() {
        let registry = BackendRegistry::with_defaults();
        let err = registry
            .parse("a==1;bad;c==xx==1", MONGO_BACKEND, &ParseOptions::strict())
            .unwrap_err();
        assert_eq!(err, RsqlError::malformed_segment("bad", 1));
    }

    #[test]
    fn test_skip_policy_logs_each_dropped_segment() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::WARN)
            .finish();

        let registry = BackendRegistry::with_defaults();
        let doc = tracing::subscriber::with_default(subscriber, || {
            registry.parse("a==1;bad;c==d==e==f", MONGO_BACKEND, &ParseOptions::default())
        })
        .unwrap();
        assert_eq!(doc.len(), 1);

        let output = logs.contents();
        let warnings: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("skipping malformed query segment"))
            .collect();
        assert_eq!(warnings.len(), 2, "captured: {}", output);
        assert!(warnings[0].contains("WARN"));
        assert!(warnings[0].contains("position=1"));
        assert!(warnings[1].contains("position=2"));
    }

    #[test]
    fn test_well_formed_query_logs_no_warning() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            BackendRegistry::with_defaults()
                .parse("a==1;;b==2;", MONGO_BACKEND, &ParseOptions::default())
                .unwrap();
        });
        assert!(logs.contents().is_empty());
    }

    #[test]
    fn test_skip_policy_drops_malformed_segments() {
        let registry = BackendRegistry::with_defaults();
        let doc = registry
            .parse("a==1;bad;c==d==e==f", MONGO_BACKEND, &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.into_value(), json!({"a": {"$eq": "1"}}));
    }

    #[test]
    fn test_global_registry_is_shared() {
        let first = BackendRegistry::global();
        let second = BackendRegistry::global();
        assert!(std::ptr::eq(first, second));
        assert!(first.contains(MONGO_BACKEND));
    }

    #[test]
    fn test_debug_lists_backends() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(
            format!("{:?}", registry),
            "BackendRegistry { backends: [\"mongo\"] }"
        );
    }
}
