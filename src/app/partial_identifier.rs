use std::borrow::Cow;

use tracing::trace;

use sqlctx_domain::Identifier;

use crate::ports::SqlParser;
use crate::token_tree::{GroupKind, Node, TokenList};

/// Extra parse attempts with a speculatively closed double quote.
const QUOTE_CLOSING_RETRIES: usize = 1;

/// Parses a partially typed, possibly qualified name such as `public.us`,
/// `foo.` or `"My Ta`.
///
/// A word with an unmatched `"` is retried once with the quote closed.
pub fn parse_partial_identifier<P>(parser: &P, word: &str) -> Option<Identifier>
where
    P: SqlParser + ?Sized,
{
    let mut candidate = Cow::Borrowed(word);

    for attempt in 0..=QUOTE_CLOSING_RETRIES {
        let statement = parser.parse(&candidate);

        if let [Node::Group(group)] = statement.children.as_slice()
            && group.kind == GroupKind::Identifier
        {
            return Some(Identifier::new(
                group.parent_name(),
                group.real_name().unwrap_or_default(),
            ));
        }

        let unmatched_quote = statement
            .token_next_by(None, |n| n.is_error_quote('"'))
            .is_some();
        if !unmatched_quote || attempt == QUOTE_CLOSING_RETRIES {
            break;
        }

        trace!(target: "sqlctx::identifier", word = %candidate, "closing unmatched double quote");
        candidate = Cow::Owned(format!("{candidate}\""));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_lexer::PgLexer;
    use rstest::rstest;

    fn parse(word: &str) -> Option<Identifier> {
        parse_partial_identifier(&PgLexer::new(), word)
    }

    fn ident(schema: Option<&str>, name: &str) -> Identifier {
        Identifier::new(schema.map(str::to_string), name)
    }

    #[rstest]
    #[case("users", None, "users")]
    #[case("public.us", Some("public"), "us")]
    #[case("foo.", Some("foo"), "")]
    #[case("\"My Table\"", None, "My Table")]
    #[case("s.\"T\"", Some("s"), "T")]
    fn complete_words_parse_directly(
        #[case] word: &str,
        #[case] schema: Option<&str>,
        #[case] name: &str,
    ) {
        assert_eq!(parse(word), Some(ident(schema, name)));
    }

    #[rstest]
    #[case("\"schema", None, "schema")]
    #[case("foo.\"bar", Some("foo"), "bar")]
    #[case("foo.\"", Some("foo"), "")]
    #[case("\"select", None, "select")]
    fn unmatched_double_quote_is_closed_once(
        #[case] word: &str,
        #[case] schema: Option<&str>,
        #[case] name: &str,
    ) {
        assert_eq!(parse(word), Some(ident(schema, name)));
    }

    #[rstest]
    #[case("")]
    #[case("select")]
    #[case("a, b")]
    #[case("1")]
    #[case("'abc")]
    #[case("\"a\", \"b")]
    fn unparseable_words_yield_none(#[case] word: &str) {
        assert_eq!(parse(word), None);
    }
}
