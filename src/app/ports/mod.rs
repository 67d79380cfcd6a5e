pub mod sql_parser;

pub use sql_parser::SqlParser;
