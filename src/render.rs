//! Text and JSON rendering of analysis results for the CLI.

use serde::Serialize;

use sqlctx_app::{CteExtraction, KeywordMatch};
use sqlctx_domain::{Identifier, IsolationResult, TableMetadata};
use sqlctx_infra::OutputFormat;

/// Isolation result tagged with the cursor it was computed for.
#[derive(Debug, Clone, Serialize)]
pub struct CursorIsolation {
    pub cursor: usize,
    #[serde(flatten)]
    pub result: IsolationResult,
}

pub fn render_ctes(
    extraction: &CteExtraction<'_>,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(extraction);
    }

    let mut lines: Vec<String> = extraction
        .ctes
        .iter()
        .map(|cte| {
            format!(
                "cte {} [{}..{}] columns: {}",
                cte.name,
                cte.start,
                cte.stop,
                list_or_dash(&cte.columns)
            )
        })
        .collect();
    lines.push(format!("remainder: {:?}", extraction.remainder));
    Ok(lines.join("\n"))
}

pub fn render_isolations(
    isolations: &[CursorIsolation],
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(isolations);
    }

    let blocks: Vec<String> = isolations
        .iter()
        .map(|isolation| {
            let result = &isolation.result;
            [
                format!("cursor: {}", isolation.cursor),
                format!("effective_text: {:?}", result.effective_text),
                format!("before_cursor: {:?}", result.effective_text_before_cursor),
                format!("tables: {}", tables_summary(&result.synthetic_metadata)),
            ]
            .join("\n")
        })
        .collect();
    Ok(blocks.join("\n\n"))
}

pub fn render_keyword(found: &KeywordMatch, format: OutputFormat) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(found);
    }

    Ok(match found.value() {
        Some(value) => format!(
            "keyword: {value}\ntruncated_text: {:?}",
            found.truncated_text
        ),
        None => "keyword: none".to_string(),
    })
}

pub fn render_identifier(
    identifier: Option<&Identifier>,
    format: OutputFormat,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&identifier);
    }

    Ok(match identifier {
        Some(ident) => format!(
            "schema: {}\nname: {:?}",
            ident.schema.as_deref().unwrap_or("-"),
            ident.name
        ),
        None => "none".to_string(),
    })
}

pub fn render_word(word: &str, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(word),
        OutputFormat::Text => Ok(word.to_string()),
    }
}

/// `true` / `false` in both formats.
pub fn render_flag(value: bool) -> String {
    value.to_string()
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn tables_summary(tables: &[TableMetadata]) -> String {
    if tables.is_empty() {
        return "-".to_string();
    }
    tables
        .iter()
        .map(|t| format!("{}({})", t.name, t.column_names().join(", ")))
        .collect::<Vec<_>>()
        .join(", ")
}
