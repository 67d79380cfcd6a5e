use crate::ports::SqlParser;
use crate::token_tree::TokenList;

/// True when any `;`-separated statement has an unmatched `'` or `$`
/// quote, meaning Enter should keep collecting input instead of submitting.
pub fn is_open_quote<P>(parser: &P, text: &str) -> bool
where
    P: SqlParser + ?Sized,
{
    parser.parse_statements(text).iter().any(|statement| {
        statement
            .flatten()
            .iter()
            .any(|t| t.is_error_quote('\'') || t.is_error_quote('$'))
    })
}
