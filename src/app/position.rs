use crate::token_tree::Node;

/// Offset of `nodes[index]` in the analyzed text, given that `nodes[0]`
/// sits at `base`.
///
/// Sibling nodes are contiguous, so this is `base` plus the text length of
/// every node before `index`. The spans come from the single lexing pass,
/// so no text is re-measured here.
///
/// `index` must come from the same `nodes` slice; anything else panics.
pub fn absolute_offset(nodes: &[Node], index: usize, base: usize) -> usize {
    base + nodes[index].start() - nodes[0].start()
}
