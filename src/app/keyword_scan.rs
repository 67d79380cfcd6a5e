//! Last significant keyword before the cursor.

use serde::Serialize;
use tracing::trace;

use crate::ports::SqlParser;
use crate::sql_lexer::Token;
use crate::token_tree::TokenList;

/// Too generic to decide what to suggest next.
const LOGICAL_OPERATORS: &[&str] = &["AND", "OR", "NOT", "BETWEEN"];

/// `token: None` with empty text means nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KeywordMatch {
    pub token: Option<Token>,
    /// Every token up to and including the match, concatenated.
    pub truncated_text: String,
}

impl KeywordMatch {
    pub fn is_found(&self) -> bool {
        self.token.is_some()
    }

    /// Matched keyword (uppercase) or `(`.
    pub fn value(&self) -> Option<&str> {
        self.token.as_ref().map(Token::normalized)
    }
}

/// Scans backward, ignoring the last `skip_trailing` tokens, for an open
/// parenthesis or a keyword outside [`LOGICAL_OPERATORS`].
pub fn find_prev_keyword<P>(parser: &P, text: &str, skip_trailing: usize) -> KeywordMatch
where
    P: SqlParser + ?Sized,
{
    if text.trim().is_empty() {
        return KeywordMatch::default();
    }

    let statements = parser.parse_statements(text);
    let flattened: Vec<&Token> = statements.iter().flat_map(|s| s.flatten()).collect();
    let scanned = &flattened[..flattened.len().saturating_sub(skip_trailing)];

    let Some(idx) = scanned.iter().rposition(|t| is_context_token(t)) else {
        trace!(target: "sqlctx::keyword", "no keyword before cursor");
        return KeywordMatch::default();
    };

    KeywordMatch {
        token: Some(scanned[idx].clone()),
        truncated_text: scanned[..=idx].iter().map(|t| t.text.as_str()).collect(),
    }
}

fn is_context_token(token: &Token) -> bool {
    token.is_punct('(')
        || (token.is_keyword()
            && !LOGICAL_OPERATORS
                .iter()
                .any(|op| token.normalized().eq_ignore_ascii_case(op)))
}
