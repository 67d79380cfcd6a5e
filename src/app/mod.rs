//! Cursor-context analysis over a grouped SQL token tree.

pub mod analyzer;
pub mod cache;
pub mod cached_analyzer;
pub mod columns;
pub mod cte;
pub mod destructive;
pub mod isolation;
pub mod keyword_scan;
pub mod partial_identifier;
pub mod ports;
pub mod position;
pub mod quotes;
pub mod sql_lexer;
pub mod text_utils;
pub mod token_tree;

pub use analyzer::ContextAnalyzer;
pub use cached_analyzer::CachedAnalyzer;
pub use cte::CteExtraction;
pub use keyword_scan::KeywordMatch;
pub use ports::SqlParser;
pub use sql_lexer::{PgLexer, Token, TokenKind};
pub use text_utils::{WordInclude, last_word};
