//! Output column names of a parenthesized statement body.

use tracing::debug;

use crate::token_tree::{Group, GroupKind, Node, TokenList};

/// Output columns of `body`: the SELECT list, or the `RETURNING` list of a
/// data-modifying statement.
///
/// Anything unrecognizable yields an empty list. Names keep their written
/// order and duplicates.
pub fn extract_column_names(body: &Group) -> Vec<String> {
    let Some((dml_idx, dml)) = body.token_next_by(None, Node::is_dml) else {
        return Vec::new();
    };

    let list_after = match dml.dml_value() {
        Some("INSERT" | "UPDATE" | "DELETE") => {
            match body.token_next_by(Some(dml_idx), |n| n.is_keyword_value("RETURNING")) {
                Some((idx, _)) => idx,
                None => {
                    debug!(target: "sqlctx::cte", "no RETURNING clause, CTE has no output columns");
                    return Vec::new();
                }
            }
        }
        Some("SELECT") => dml_idx,
        _ => return Vec::new(),
    };

    body.token_next(Some(list_after))
        .map(|(_, node)| output_names(node))
        .unwrap_or_default()
}

/// Names carried by a single identifier or by the identifiers of a list.
/// Literals and other list members are skipped.
pub(crate) fn output_names(node: &Node) -> Vec<String> {
    let Some(group) = node.as_group() else {
        return Vec::new();
    };

    match group.kind {
        GroupKind::Identifier => group.get_name().into_iter().collect(),
        GroupKind::IdentifierList => group
            .identifiers()
            .filter_map(|(_, member)| member.as_group())
            .filter(|member| member.kind == GroupKind::Identifier)
            .filter_map(Group::get_name)
            .collect(),
        _ => Vec::new(),
    }
}
