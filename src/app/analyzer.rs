//! Entry point bundling the analysis components behind one parser.

use sqlctx_domain::{Identifier, IsolationResult};

use crate::cte::{CteExtraction, extract_ctes};
use crate::destructive::{DEFAULT_DESTRUCTIVE_KEYWORDS, is_destructive};
use crate::isolation::isolate;
use crate::keyword_scan::{KeywordMatch, find_prev_keyword};
use crate::partial_identifier::parse_partial_identifier;
use crate::ports::SqlParser;
use crate::quotes::is_open_quote;
use crate::sql_lexer::PgLexer;

/// Stateless: every call re-parses its input.
pub struct ContextAnalyzer<P = PgLexer> {
    parser: P,
    destructive_keywords: Vec<String>,
}

impl ContextAnalyzer {
    pub fn new() -> Self {
        Self::with_parser(PgLexer::new())
    }
}

impl Default for ContextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SqlParser> ContextAnalyzer<P> {
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            destructive_keywords: DEFAULT_DESTRUCTIVE_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn with_destructive_keywords(mut self, keywords: Vec<String>) -> Self {
        self.destructive_keywords = keywords;
        self
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn destructive_keywords(&self) -> &[String] {
        &self.destructive_keywords
    }

    pub fn extract_ctes<'a>(&self, source: &'a str) -> CteExtraction<'a> {
        extract_ctes(&self.parser, source)
    }

    pub fn isolate(&self, full_text: &str, text_before_cursor: &str) -> IsolationResult {
        isolate(&self.parser, full_text, text_before_cursor)
    }

    /// [`Self::isolate`] with the cursor given as a byte offset into
    /// `full_text`. Offsets past the end or inside a character are moved back
    /// to the nearest character boundary.
    pub fn isolate_at(&self, full_text: &str, cursor: usize) -> IsolationResult {
        let cursor = clamp_to_char_boundary(full_text, cursor);
        self.isolate(full_text, &full_text[..cursor])
    }

    pub fn find_prev_keyword(&self, text: &str, skip_trailing: usize) -> KeywordMatch {
        find_prev_keyword(&self.parser, text, skip_trailing)
    }

    pub fn is_open_quote(&self, text: &str) -> bool {
        is_open_quote(&self.parser, text)
    }

    pub fn parse_partial_identifier(&self, word: &str) -> Option<Identifier> {
        parse_partial_identifier(&self.parser, word)
    }

    pub fn is_destructive(&self, queries: &str) -> bool {
        is_destructive(&self.parser, queries, &self.destructive_keywords)
    }
}

pub(crate) fn clamp_to_char_boundary(text: &str, cursor: usize) -> usize {
    (0..=cursor.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}
