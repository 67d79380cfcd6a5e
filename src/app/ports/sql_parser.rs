use crate::token_tree::Statement;

/// Source of token trees for the analysis components.
///
/// Implementations must never fail: broken or half-typed SQL still yields a
/// tree, with unmatched quotes surfaced as error leaves.
pub trait SqlParser: Send + Sync {
    /// One tree per `;`-terminated statement, spans relative to `sql`.
    fn parse_statements(&self, sql: &str) -> Vec<Statement>;

    /// The first statement of `sql`, or an empty one.
    fn parse(&self, sql: &str) -> Statement {
        self.parse_statements(sql)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}
