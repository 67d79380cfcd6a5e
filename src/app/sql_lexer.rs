//! Lightweight SQL lexer for completion context detection.
//!
//! Handles PostgreSQL-specific syntax including:
//! - Dollar-quoted strings ($tag$...$tag$) and positional parameters ($1)
//! - Escape strings (E'...')
//! - Line comments (--)
//! - Block comments (/* */)
//! - Cast operator (::)
//! - Multi-word keywords (ORDER BY, LEFT OUTER JOIN, ...)
//!
//! An unmatched quote character becomes a one-character `Error` token and
//! lexing resumes right after it, so half-typed input never stops the scan.

use serde::Serialize;

use crate::ports::SqlParser;
use crate::token_tree::{Statement, split_statements};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Uppercased; multi-word keywords are joined by a single space.
    Keyword(String),
    /// SELECT / INSERT / UPDATE / DELETE, uppercased.
    Dml(String),
    /// The `WITH` that introduces common table expressions.
    Cte,
    Name,
    QuotedName,
    Operator,
    Punctuation(char),
    Wildcard,
    StringLiteral,
    Number,
    Placeholder,
    Comment,
    Whitespace,
    /// Unmatched quote or unrecognized character.
    Error(char),
}

/// A leaf token. `start`/`end` are byte offsets into the lexed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            kind,
            text,
            start,
            end,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword(_) | TokenKind::Dml(_) | TokenKind::Cte
        )
    }

    pub fn is_name(&self) -> bool {
        matches!(self.kind, TokenKind::Name | TokenKind::QuotedName)
    }

    /// A name, or a keyword PostgreSQL also accepts as a name (`first`, `row`).
    pub fn is_name_like(&self) -> bool {
        match &self.kind {
            TokenKind::Name | TokenKind::QuotedName => true,
            TokenKind::Keyword(k) => UNRESERVED_KEYWORDS.contains(&k.as_str()),
            _ => false,
        }
    }

    pub fn is_cast(&self) -> bool {
        self.kind == TokenKind::Operator && self.text == "::"
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punctuation(c)
    }

    pub fn is_error_quote(&self, quote: char) -> bool {
        self.kind == TokenKind::Error(quote)
    }

    /// Keyword value as classified; the raw text for everything else.
    pub fn normalized(&self) -> &str {
        match &self.kind {
            TokenKind::Keyword(k) | TokenKind::Dml(k) => k,
            TokenKind::Cte => "WITH",
            _ => &self.text,
        }
    }

    pub fn is_keyword_value(&self, value: &str) -> bool {
        self.is_keyword() && self.normalized().eq_ignore_ascii_case(value)
    }
}

const DML_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];

const SQL_KEYWORDS: &[&str] = &[
    "FROM",
    "WHERE",
    "JOIN",
    "LEFT",
    "RIGHT",
    "INNER",
    "OUTER",
    "CROSS",
    "NATURAL",
    "ON",
    "AND",
    "OR",
    "NOT",
    "IN",
    "IS",
    "NULL",
    "TRUE",
    "FALSE",
    "LIKE",
    "ILIKE",
    "SIMILAR",
    "BETWEEN",
    "EXISTS",
    "ANY",
    "SOME",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "AS",
    "DISTINCT",
    "ORDER",
    "BY",
    "ASC",
    "DESC",
    "NULLS",
    "FIRST",
    "LAST",
    "GROUP",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "FETCH",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "ALL",
    "INTO",
    "VALUES",
    "DEFAULT",
    "SET",
    "ONLY",
    "CREATE",
    "DROP",
    "ALTER",
    "TRUNCATE",
    "TABLE",
    "INDEX",
    "VIEW",
    "SCHEMA",
    "DATABASE",
    "FUNCTION",
    "TRIGGER",
    "RETURNING",
    "RECURSIVE",
    "MATERIALIZED",
    "USING",
    "FULL",
    "LATERAL",
    "WINDOW",
    "OVER",
    "PARTITION",
    "ROWS",
    "RANGE",
    "UNBOUNDED",
    "PRECEDING",
    "FOLLOWING",
    "CURRENT",
    "ROW",
    "CONFLICT",
    "DO",
    "NOTHING",
    "FOR",
    "GRANT",
    "REVOKE",
    "BEGIN",
    "COMMIT",
    "ROLLBACK",
    "EXPLAIN",
    "ANALYZE",
    "IF",
    "PRIMARY",
    "FOREIGN",
    "REFERENCES",
    "CONSTRAINT",
    "UNIQUE",
    "CHECK",
];

/// Lexed as keywords but valid as table, CTE and column names.
const UNRESERVED_KEYWORDS: &[&str] = &[
    "NULLS",
    "FIRST",
    "LAST",
    "INDEX",
    "VIEW",
    "SCHEMA",
    "DATABASE",
    "FUNCTION",
    "TRIGGER",
    "ROWS",
    "RANGE",
    "UNBOUNDED",
    "PRECEDING",
    "FOLLOWING",
    "CURRENT",
    "ROW",
    "CONFLICT",
    "NOTHING",
];

const BY_FOLLOWERS: &[&[&str]] = &[&["BY"]];
const JOIN_MODIFIER_FOLLOWERS: &[&[&str]] = &[&["OUTER", "JOIN"], &["JOIN"]];
const OUTER_FOLLOWERS: &[&[&str]] = &[&["JOIN"]];

/// Follow-up words that fold into the preceding keyword.
fn compound_followers(first: &str) -> &'static [&'static [&'static str]] {
    match first {
        "ORDER" | "GROUP" | "PARTITION" => BY_FOLLOWERS,
        "INNER" | "LEFT" | "RIGHT" | "FULL" | "CROSS" | "NATURAL" => JOIN_MODIFIER_FOLLOWERS,
        "OUTER" => OUTER_FOLLOWERS,
        _ => &[],
    }
}

pub struct PgLexer;

impl PgLexer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            let (kind, end) = Self::next_token(text, pos, c, tokens.last());
            tokens.push(Token {
                kind,
                text: text[pos..end].to_string(),
                start: pos,
                end,
            });
            pos = end;
        }

        tokens
    }

    fn next_token(text: &str, pos: usize, c: char, prev: Option<&Token>) -> (TokenKind, usize) {
        let rest = &text[pos..];

        if c.is_whitespace() {
            return (
                TokenKind::Whitespace,
                pos + scan_while(rest, char::is_whitespace),
            );
        }

        // Line comment: --
        if rest.starts_with("--") {
            let end = rest.find('\n').map_or(text.len(), |i| pos + i);
            return (TokenKind::Comment, end);
        }

        // Block comment: /* (unterminated runs to the end)
        if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map_or(text.len(), |i| pos + 2 + i + 2);
            return (TokenKind::Comment, end);
        }

        // Escape string: E'...'
        if (c == 'E' || c == 'e')
            && rest[1..].starts_with('\'')
            && let Some(len) = escape_string_len(rest)
        {
            return (TokenKind::StringLiteral, pos + len);
        }

        match c {
            '\'' => {
                return match quoted_len(rest, '\'') {
                    Some(len) => (TokenKind::StringLiteral, pos + len),
                    None => (TokenKind::Error('\''), pos + 1),
                };
            }
            '"' => {
                return match quoted_len(rest, '"') {
                    Some(len) => (TokenKind::QuotedName, pos + len),
                    None => (TokenKind::Error('"'), pos + 1),
                };
            }
            '$' => return Self::dollar_token(rest, pos),
            '*' => return (TokenKind::Wildcard, pos + 1),
            _ => {}
        }

        // Cast operator: ::
        if rest.starts_with("::") {
            return (TokenKind::Operator, pos + 2);
        }

        if is_operator_char(c) {
            let mut end = pos;
            for (i, ch) in rest.char_indices() {
                if !is_operator_char(ch)
                    || (i > 0 && (rest[i..].starts_with("--") || rest[i..].starts_with("/*")))
                {
                    break;
                }
                end = pos + i + ch.len_utf8();
            }
            return (TokenKind::Operator, end);
        }

        if is_punctuation(c) {
            return (TokenKind::Punctuation(c), pos + 1);
        }

        if c.is_ascii_digit() {
            return (TokenKind::Number, pos + number_len(rest));
        }

        if c.is_alphabetic() || c == '_' {
            return Self::word_token(text, pos, prev);
        }

        (TokenKind::Error(c), pos + c.len_utf8())
    }

    fn dollar_token(rest: &str, pos: usize) -> (TokenKind, usize) {
        let after = &rest[1..];

        // Positional parameter: $1
        if after.starts_with(|ch: char| ch.is_ascii_digit()) {
            return (
                TokenKind::Placeholder,
                pos + 1 + scan_while(after, |ch| ch.is_ascii_digit()),
            );
        }

        let tag_len = scan_while(after, |ch| ch.is_alphanumeric() || ch == '_');
        if after[tag_len..].starts_with('$') {
            let opener = &rest[..tag_len + 2];
            if let Some(i) = rest[opener.len()..].find(opener) {
                return (TokenKind::StringLiteral, pos + opener.len() + i + opener.len());
            }
        }

        (TokenKind::Error('$'), pos + 1)
    }

    fn word_token(text: &str, pos: usize, prev: Option<&Token>) -> (TokenKind, usize) {
        let end = pos + scan_while(&text[pos..], is_word_char);

        // A word touching a dot is always part of a qualified name
        let after_dot = prev.is_some_and(|t| t.end == pos && t.is_punct('.'));
        if after_dot || text[end..].starts_with('.') {
            return (TokenKind::Name, end);
        }

        let upper = text[pos..end].to_ascii_uppercase();
        if DML_KEYWORDS.contains(&upper.as_str()) {
            return (TokenKind::Dml(upper), end);
        }
        if upper == "WITH" {
            return (TokenKind::Cte, end);
        }
        if SQL_KEYWORDS.contains(&upper.as_str()) {
            return match compound_keyword(text, &upper, end) {
                Some((compound_end, normalized)) => (TokenKind::Keyword(normalized), compound_end),
                None => (TokenKind::Keyword(upper), end),
            };
        }

        (TokenKind::Name, end)
    }
}

impl Default for PgLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlParser for PgLexer {
    fn parse_statements(&self, sql: &str) -> Vec<Statement> {
        split_statements(self.tokenize(sql))
    }
}

fn compound_keyword(text: &str, first: &str, end: usize) -> Option<(usize, String)> {
    'candidates: for followers in compound_followers(first) {
        let mut pos = end;
        let mut words = vec![first];
        for &follower in *followers {
            let gap = scan_while(&text[pos..], char::is_whitespace);
            if gap == 0 {
                continue 'candidates;
            }
            let word_start = pos + gap;
            let word_end = word_start + scan_while(&text[word_start..], is_word_char);
            if !text[word_start..word_end].eq_ignore_ascii_case(follower) {
                continue 'candidates;
            }
            words.push(follower);
            pos = word_end;
        }
        return Some((pos, words.join(" ")));
    }
    None
}

/// Byte length of the leading run of `rest` matching `pred`.
fn scan_while(rest: &str, pred: impl Fn(char) -> bool) -> usize {
    rest.char_indices()
        .find(|&(_, ch)| !pred(ch))
        .map_or(rest.len(), |(i, _)| i)
}

/// Length of a `quote`-delimited run starting at `rest[0]`, doubled quotes escaped.
fn quoted_len(rest: &str, quote: char) -> Option<usize> {
    let mut chars = rest.char_indices().skip(1).peekable();
    while let Some((i, ch)) = chars.next() {
        if ch == quote {
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                continue;
            }
            return Some(i + 1);
        }
    }
    None
}

/// Length of an `E'...'` literal, honouring backslash escapes.
fn escape_string_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices().skip(2).peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\'' => {
                if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                    chars.next();
                    continue;
                }
                return Some(i + 1);
            }
            _ => {}
        }
    }
    None
}

fn number_len(rest: &str) -> usize {
    let mut len = scan_while(rest, |ch| ch.is_ascii_digit() || ch == '.');
    let exponent = &rest[len..];
    if exponent.starts_with(['e', 'E']) {
        let sign = usize::from(exponent[1..].starts_with(['+', '-']));
        let digits = scan_while(&exponent[1 + sign..], |ch| ch.is_ascii_digit());
        if digits > 0 {
            len += 1 + sign + digits;
        }
    }
    len
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+'
            | '-'
            | '/'
            | '<'
            | '>'
            | '='
            | '!'
            | '%'
            | '&'
            | '|'
            | '^'
            | '~'
            | ':'
            | '@'
            | '#'
            | '?'
    )
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | ';' | '.' | '[' | ']')
}
