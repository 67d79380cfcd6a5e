use std::fmt;

use serde::Serialize;

/// A possibly schema-qualified name as typed so far.
///
/// `name` is empty while the user has typed `schema.` but nothing after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub schema: Option<String>,
    pub name: String,
}

impl Identifier {
    pub fn new(schema: Option<String>, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.schema.is_some()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_qualified_with_empty_name_keeps_trailing_dot() {
        let ident = Identifier::new(Some("foo".to_string()), "");

        assert_eq!(ident.to_string(), "foo.");
        assert!(ident.is_qualified());
    }

    #[test]
    fn display_unqualified() {
        assert_eq!(Identifier::new(None, "users").to_string(), "users");
    }
}
