pub mod fixtures;

use sqlctx::app::{CachedAnalyzer, ContextAnalyzer};
use sqlctx::infra::OutputFormat;
use sqlctx::render::{self, CursorIsolation};

pub fn analyzer() -> ContextAnalyzer {
    ContextAnalyzer::new()
}

/// Byte offset just past the first occurrence of `marker` in `sql`.
pub fn cursor_after(sql: &str, marker: &str) -> usize {
    sql.find(marker).map(|i| i + marker.len()).unwrap()
}

pub fn isolate_to_string(sql: &str, cursors: &[usize], format: OutputFormat) -> String {
    let mut cached = CachedAnalyzer::new(analyzer(), 16);
    let isolations: Vec<CursorIsolation> = cursors
        .iter()
        .map(|&cursor| CursorIsolation {
            cursor,
            result: cached.isolate_at(sql, cursor),
        })
        .collect();
    render::render_isolations(&isolations, format).unwrap()
}

pub fn ctes_to_string(sql: &str, format: OutputFormat) -> String {
    render::render_ctes(&analyzer().extract_ctes(sql), format).unwrap()
}
