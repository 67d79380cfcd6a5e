use tracing::trace;

use sqlctx_domain::IsolationResult;

use crate::analyzer::{ContextAnalyzer, clamp_to_char_boundary};
use crate::cache::BoundedLruCache;
use crate::ports::SqlParser;
use crate::sql_lexer::PgLexer;

/// Memoizes [`ContextAnalyzer::isolate_at`] by exact `(text, cursor)`.
///
/// A new keystroke is a new key, so entries are never invalidated, only
/// evicted.
pub struct CachedAnalyzer<P = PgLexer> {
    analyzer: ContextAnalyzer<P>,
    isolations: Option<BoundedLruCache<(String, usize), IsolationResult>>,
}

impl<P: SqlParser> CachedAnalyzer<P> {
    /// A `capacity` of 0 disables memoization.
    pub fn new(analyzer: ContextAnalyzer<P>, capacity: usize) -> Self {
        Self {
            analyzer,
            isolations: BoundedLruCache::new(capacity),
        }
    }

    pub fn analyzer(&self) -> &ContextAnalyzer<P> {
        &self.analyzer
    }

    pub fn is_enabled(&self) -> bool {
        self.isolations.is_some()
    }

    pub fn cached_len(&self) -> usize {
        self.isolations.as_ref().map_or(0, BoundedLruCache::len)
    }

    pub fn isolate_at(&mut self, full_text: &str, cursor: usize) -> IsolationResult {
        let cursor = clamp_to_char_boundary(full_text, cursor);
        let Some(cache) = self.isolations.as_mut() else {
            return self.analyzer.isolate_at(full_text, cursor);
        };

        let key = (full_text.to_string(), cursor);
        if let Some(hit) = cache.get(&key) {
            trace!(target: "sqlctx::cache", cursor, "isolation cache hit");
            return hit.clone();
        }

        let result = self.analyzer.isolate_at(full_text, cursor);
        cache.insert(key, result.clone());
        result
    }

    pub fn clear(&mut self) {
        if let Some(cache) = self.isolations.as_mut() {
            cache.clear();
        }
    }
}
