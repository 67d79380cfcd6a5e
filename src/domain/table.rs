use serde::Serialize;

/// Table-like entry handed to the metadata layer. CTE aliases are reported
/// through this type so they complete like real tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMetadata {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: Option<String>,
}

impl ColumnMetadata {
    /// Column without a known type; CTE output columns are never typed.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
        }
    }

    pub fn type_display(&self) -> &str {
        self.data_type.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_column_displays_unknown() {
        let col = ColumnMetadata::untyped("id");

        assert_eq!(col.type_display(), "unknown");
    }

    #[test]
    fn serializes_with_null_type() {
        let table = TableMetadata::new("t", vec![ColumnMetadata::untyped("id")]);

        let json = serde_json::to_string(&table).unwrap();

        assert_eq!(json, r#"{"name":"t","columns":[{"name":"id","data_type":null}]}"#);
    }
}
