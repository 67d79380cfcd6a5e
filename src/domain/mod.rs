pub mod cte;
pub mod identifier;
pub mod isolation;
pub mod table;

pub use cte::CteDefinition;
pub use identifier::Identifier;
pub use isolation::IsolationResult;
pub use table::{ColumnMetadata, TableMetadata};
