use tracing::{debug, trace};

use sqlctx_domain::{IsolationResult, TableMetadata};

use crate::cte::extract_ctes;
use crate::ports::SqlParser;

/// Re-scopes completion to the CTE body under the cursor, or to the main
/// query after the `WITH` clause.
///
/// The cursor is `text_before_cursor.len()`. Only CTEs declared before the
/// one being edited are reported as synthetic tables; from the main query
/// all of them are.
pub fn isolate<P>(parser: &P, full_text: &str, text_before_cursor: &str) -> IsolationResult
where
    P: SqlParser + ?Sized,
{
    if full_text.trim().is_empty() {
        return IsolationResult::passthrough(full_text, text_before_cursor);
    }

    let ctes = extract_ctes(parser, full_text).ctes;
    let Some(last) = ctes.last() else {
        return IsolationResult::passthrough(full_text, text_before_cursor);
    };

    let cursor_pos = text_before_cursor.len();
    let mut visible: Vec<TableMetadata> = Vec::with_capacity(ctes.len());

    for cte in &ctes {
        if cte.contains(cursor_pos) {
            debug!(target: "sqlctx::isolate", cte = %cte.name, cursor_pos, "cursor inside CTE body");
            return IsolationResult::new(
                full_text.get(cte.start..cte.stop).unwrap_or(""),
                full_text.get(cte.start..cursor_pos).unwrap_or(""),
                visible,
            );
        }
        visible.push(cte.to_table_metadata());
    }

    // Between two CTEs the before-cursor slice is empty
    trace!(target: "sqlctx::isolate", cursor_pos, main_query_at = last.stop, "cursor in main query");
    IsolationResult::new(
        full_text.get(last.stop..).unwrap_or(""),
        text_before_cursor.get(last.stop..cursor_pos).unwrap_or(""),
        visible,
    )
}
