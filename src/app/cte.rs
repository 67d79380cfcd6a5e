//! Common table expressions declared by a leading `WITH` clause.

use serde::Serialize;
use tracing::debug;

use sqlctx_domain::CteDefinition;

use crate::columns::{extract_column_names, output_names};
use crate::ports::SqlParser;
use crate::position::absolute_offset;
use crate::token_tree::{Group, GroupKind, Node, TokenList};

/// CTEs in declaration order plus the text after the `WITH` clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CteExtraction<'a> {
    pub ctes: Vec<CteDefinition>,
    /// Untrimmed; usually starts with the whitespace before the main query.
    pub remainder: &'a str,
}

impl<'a> CteExtraction<'a> {
    fn none(remainder: &'a str) -> Self {
        Self {
            ctes: Vec::new(),
            remainder,
        }
    }
}

pub fn extract_ctes<'a, P>(parser: &P, source: &'a str) -> CteExtraction<'a>
where
    P: SqlParser + ?Sized,
{
    if source.is_empty() {
        return CteExtraction::none(source);
    }

    let statement = parser.parse(source);
    let Some((with_idx, _)) = statement
        .token_next(None)
        .filter(|(_, node)| node.is_cte())
    else {
        return CteExtraction::none(source);
    };
    let mut next = statement.token_next(Some(with_idx));
    if let Some((idx, node)) = next
        && node.is_keyword_value("RECURSIVE")
    {
        next = statement.token_next(Some(idx));
    }
    let Some((idx, node)) = next else {
        return CteExtraction::none("");
    };

    let start_pos = absolute_offset(&statement.children, idx, statement.start());
    let mut ctes = Vec::new();

    match node.as_group() {
        Some(list) if list.kind == GroupKind::IdentifierList => {
            for (member_idx, member) in list.identifiers() {
                let Some(ident) = member.as_group().filter(|g| g.kind == GroupKind::Identifier)
                else {
                    continue;
                };
                let offset = absolute_offset(&list.children, member_idx, start_pos);
                ctes.extend(build_cte(ident, offset));
            }
        }
        Some(ident) if ident.kind == GroupKind::Identifier => {
            ctes.extend(build_cte(ident, start_pos));
        }
        _ => debug!(target: "sqlctx::cte", "WITH is not followed by a CTE declaration"),
    }

    let remainder = source.get(node.end()..statement.end()).unwrap_or("");
    CteExtraction { ctes, remainder }
}

/// One `name [(cols)] AS (body)` declaration starting at `pos0`.
/// `None` when the name or the body is missing.
fn build_cte(ident: &Group, pos0: usize) -> Option<CteDefinition> {
    let Some(name) = ident.real_name().filter(|n| !n.is_empty()) else {
        debug!(target: "sqlctx::cte", text = %ident.text(), "dropping CTE without a name");
        return None;
    };

    let as_idx = ident
        .token_next_by(None, |n| n.is_keyword_value("AS"))
        .map(|(i, _)| i);
    let Some((body_idx, body)) = ident
        .token_next_by(as_idx, Node::is_parenthesis)
        .and_then(|(i, n)| Some((i, n.as_group()?)))
    else {
        debug!(target: "sqlctx::cte", name = %name, "dropping CTE without a body");
        return None;
    };

    let start = absolute_offset(&ident.children, body_idx, pos0);
    let stop = start + (body.end() - body.start());
    let columns = declared_columns(ident, as_idx).unwrap_or_else(|| extract_column_names(body));

    Some(CteDefinition::new(name, columns, start, stop))
}

/// Column list written between the name and `AS`, as in `t (a, b) AS (...)`
/// or `t(a, b) AS (...)`.
fn declared_columns(ident: &Group, as_idx: Option<usize>) -> Option<Vec<String>> {
    let before_as = ident.children.get(..as_idx?)?;
    let declared = before_as.iter().find_map(|node| {
        let group = node.as_group()?;
        match group.kind {
            GroupKind::Parenthesis => Some(group),
            GroupKind::Function => group.token_next_by(None, Node::is_parenthesis)?.1.as_group(),
            _ => None,
        }
    })?;

    let (_, inner) = declared.token_next(Some(0))?;
    Some(output_names(inner)).filter(|names| !names.is_empty())
}
