use serde::Serialize;

use super::table::{ColumnMetadata, TableMetadata};

/// One `name AS (body)` entry of a leading `WITH` clause.
///
/// `start` is the byte offset of the body's opening parenthesis and `stop` is
/// one past its closing parenthesis, both relative to the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CteDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub start: usize,
    pub stop: usize,
}

impl CteDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<String>, start: usize, stop: usize) -> Self {
        Self {
            name: name.into(),
            columns,
            start,
            stop,
        }
    }

    /// Strict containment: a cursor sitting on either parenthesis is outside.
    pub fn contains(&self, cursor_pos: usize) -> bool {
        self.start < cursor_pos && cursor_pos < self.stop
    }

    pub fn body<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.stop)
    }

    pub fn to_table_metadata(&self) -> TableMetadata {
        TableMetadata::new(
            self.name.clone(),
            self.columns.iter().map(ColumnMetadata::untyped).collect(),
        )
    }
}
