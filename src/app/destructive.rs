//! Statement-prefix checks run before submitting input.

use crate::ports::SqlParser;
use crate::token_tree::{Statement, TokenList};

/// Pseudo keyword matching `UPDATE` statements without a `WHERE`.
pub const UNCONDITIONAL_UPDATE: &str = "unconditional_update";

pub const DEFAULT_DESTRUCTIVE_KEYWORDS: &[&str] = &[
    "drop",
    "shutdown",
    "delete",
    "truncate",
    "alter",
    UNCONDITIONAL_UPDATE,
];

/// True when the first statement of `query` starts with one of `prefixes`.
/// Comments are ignored and matching is case-insensitive.
pub fn query_starts_with<P, S>(parser: &P, query: &str, prefixes: &[S]) -> bool
where
    P: SqlParser + ?Sized,
    S: AsRef<str>,
{
    starts_with_any(&words(&parser.parse(query)), prefixes)
}

/// Like [`query_starts_with`], for any of the `;`-separated statements.
pub fn queries_start_with<P, S>(parser: &P, queries: &str, prefixes: &[S]) -> bool
where
    P: SqlParser + ?Sized,
    S: AsRef<str>,
{
    parser
        .parse_statements(queries)
        .iter()
        .any(|statement| starts_with_any(&words(statement), prefixes))
}

/// True when any statement starts with one of `keywords`, or is an `UPDATE`
/// without `WHERE` while [`UNCONDITIONAL_UPDATE`] is listed.
pub fn is_destructive<P, S>(parser: &P, queries: &str, keywords: &[S]) -> bool
where
    P: SqlParser + ?Sized,
    S: AsRef<str>,
{
    let check_updates = keywords
        .iter()
        .any(|k| k.as_ref().eq_ignore_ascii_case(UNCONDITIONAL_UPDATE));

    parser.parse_statements(queries).iter().any(|statement| {
        let statement_words = words(statement);
        (check_updates && is_unconditional_update(&statement_words))
            || starts_with_any(&statement_words, keywords)
    })
}

/// Lowercased words outside comments, `;` excluded.
fn words(statement: &Statement) -> Vec<String> {
    statement
        .flatten()
        .into_iter()
        .filter(|t| !t.is_whitespace() && !t.is_punct(';'))
        .flat_map(|t| t.text.split_whitespace().map(str::to_lowercase))
        .collect()
}

fn starts_with_any<S: AsRef<str>>(words: &[String], prefixes: &[S]) -> bool {
    words
        .first()
        .is_some_and(|first| prefixes.iter().any(|p| p.as_ref().eq_ignore_ascii_case(first)))
}

fn is_unconditional_update(words: &[String]) -> bool {
    words.first().is_some_and(|w| w == "update") && !words.iter().any(|w| w == "where")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_lexer::PgLexer;
    use rstest::rstest;

    fn destructive(text: &str) -> bool {
        is_destructive(&PgLexer::new(), text, DEFAULT_DESTRUCTIVE_KEYWORDS)
    }

    #[rstest]
    #[case("drop database foo;", true)]
    #[case("DROP TABLE t", true)]
    #[case("select 1; truncate t", true)]
    #[case("  -- cleanup\n/* old */ ALTER TABLE t ADD c int", true)]
    #[case("delete from t where id = 1", true)]
    #[case("shutdown", true)]
    #[case("update t set x = 1", true)]
    #[case("update t set x = 1 where id = 2", false)]
    #[case("update t set x = 1 -- where id = 2", true)]
    #[case("select * from drop_log", false)]
    #[case("insert into t values (1)", false)]
    #[case("", false)]
    fn default_keywords(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(destructive(text), expected);
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let parser = PgLexer::new();
        let keywords: &[String] = &["delete".to_string()];

        assert!(!is_destructive(&parser, "drop table t", keywords));
        assert!(!is_destructive(&parser, "update t set x = 1", keywords));
        assert!(is_destructive(&parser, "DELETE FROM t", keywords));
    }

    #[test]
    fn query_starts_with_only_checks_first_statement() {
        let parser = PgLexer::new();

        assert!(query_starts_with(&parser, "\n\n  SELECT a", &["select"]));
        assert!(!query_starts_with(&parser, "select 1; drop x", &["drop"]));
        assert!(queries_start_with(&parser, "select 1; drop x", &["drop"]));
        assert!(!queries_start_with(&parser, "", &["drop"]));
    }
}
