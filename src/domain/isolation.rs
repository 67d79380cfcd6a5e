use serde::Serialize;

use super::table::TableMetadata;

/// The statement completion should run against, after re-scoping into the CTE
/// body under the cursor when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IsolationResult {
    pub effective_text: String,
    pub effective_text_before_cursor: String,
    pub synthetic_metadata: Vec<TableMetadata>,
}

impl IsolationResult {
    pub fn new(
        effective_text: impl Into<String>,
        effective_text_before_cursor: impl Into<String>,
        synthetic_metadata: Vec<TableMetadata>,
    ) -> Self {
        Self {
            effective_text: effective_text.into(),
            effective_text_before_cursor: effective_text_before_cursor.into(),
            synthetic_metadata,
        }
    }

    /// Result that leaves the caller's text untouched.
    pub fn passthrough(full_text: &str, text_before_cursor: &str) -> Self {
        Self::new(full_text, text_before_cursor, Vec::new())
    }

    pub fn synthetic_table_names(&self) -> Vec<&str> {
        self.synthetic_metadata
            .iter()
            .map(|t| t.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnMetadata;

    #[test]
    fn passthrough_has_no_synthetic_tables() {
        let result = IsolationResult::passthrough("SELECT 1", "SEL");

        assert_eq!(result.effective_text, "SELECT 1");
        assert_eq!(result.effective_text_before_cursor, "SEL");
        assert!(result.synthetic_table_names().is_empty());
    }

    #[test]
    fn synthetic_table_names_keep_declaration_order() {
        let tables = vec![
            TableMetadata::new("b", vec![ColumnMetadata::untyped("x")]),
            TableMetadata::new("a", Vec::new()),
        ];

        let result = IsolationResult::new("", "", tables);

        assert_eq!(result.synthetic_table_names(), vec!["b", "a"]);
    }
}
