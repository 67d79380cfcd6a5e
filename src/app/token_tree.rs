//! Grouped view over lexer tokens: parentheses, function calls, identifiers
//! (with aliases and `name AS (body)` forms) and comma-separated lists.
//!
//! Grouping is best effort. Anything that does not fit a rule stays a flat
//! leaf, so every input produces a tree.

use std::borrow::Cow;
use std::collections::VecDeque;

use crate::sql_lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Parenthesis,
    Function,
    Identifier,
    IdentifierList,
    /// Operands joined by operators or casts, or a `CASE ... END` block,
    /// without an alias.
    Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Token(Token),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub children: Vec<Node>,
    start: usize,
    end: usize,
}

/// One `;`-terminated statement. Spans stay relative to the whole parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub children: Vec<Node>,
    start: usize,
    end: usize,
}

/// Navigation shared by statements and groups.
pub trait TokenList {
    fn children(&self) -> &[Node];

    /// Next non-whitespace, non-comment child strictly after `after`
    /// (from the first child when `None`).
    fn token_next(&self, after: Option<usize>) -> Option<(usize, &Node)> {
        self.token_next_by(after, |node| !node.is_whitespace())
    }

    fn token_next_by<F>(&self, after: Option<usize>, pred: F) -> Option<(usize, &Node)>
    where
        F: Fn(&Node) -> bool,
    {
        let from = after.map_or(0, |i| i + 1);
        self.children()
            .iter()
            .enumerate()
            .skip(from)
            .find(|&(_, node)| pred(node))
    }

    fn flatten(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        for child in self.children() {
            child.flatten_into(&mut out);
        }
        out
    }

    fn text(&self) -> String {
        self.flatten().iter().map(|t| t.text.as_str()).collect()
    }
}

impl Node {
    pub fn start(&self) -> usize {
        match self {
            Self::Token(t) => t.start,
            Self::Group(g) => g.start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Self::Token(t) => t.end,
            Self::Group(g) => g.end,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(t) => Some(t),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Token(_) => None,
            Self::Group(g) => Some(g),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Token(t) => Cow::Borrowed(t.text.as_str()),
            Self::Group(g) => Cow::Owned(g.text()),
        }
    }

    fn token_matches(&self, pred: impl Fn(&Token) -> bool) -> bool {
        self.as_token().is_some_and(pred)
    }

    fn group_is(&self, kind: GroupKind) -> bool {
        self.as_group().is_some_and(|g| g.kind == kind)
    }

    /// Whitespace or comment.
    pub fn is_whitespace(&self) -> bool {
        self.token_matches(Token::is_whitespace)
    }

    /// Any keyword class, DML and `WITH` included.
    pub fn is_keyword(&self) -> bool {
        self.token_matches(Token::is_keyword)
    }

    pub fn is_keyword_value(&self, value: &str) -> bool {
        self.token_matches(|t| t.is_keyword_value(value))
    }

    pub fn is_dml(&self) -> bool {
        self.token_matches(|t| matches!(t.kind, TokenKind::Dml(_)))
    }

    pub fn dml_value(&self) -> Option<&str> {
        match self.as_token()?.kind {
            TokenKind::Dml(ref value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_cte(&self) -> bool {
        self.token_matches(|t| t.kind == TokenKind::Cte)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.token_matches(|t| t.is_punct(c))
    }

    pub fn is_open_paren(&self) -> bool {
        self.is_punct('(')
    }

    pub fn is_name(&self) -> bool {
        self.token_matches(Token::is_name)
    }

    pub fn is_name_like(&self) -> bool {
        self.token_matches(Token::is_name_like)
    }

    fn is_cast(&self) -> bool {
        self.token_matches(Token::is_cast)
    }

    /// Infix operator between two operands; `*` lexes as a wildcard.
    fn is_binary_operator(&self) -> bool {
        self.token_matches(|t| {
            (t.kind == TokenKind::Operator && !t.is_cast()) || t.kind == TokenKind::Wildcard
        })
    }

    pub fn is_error_quote(&self, quote: char) -> bool {
        self.token_matches(|t| t.is_error_quote(quote))
    }

    pub fn is_parenthesis(&self) -> bool {
        self.group_is(GroupKind::Parenthesis)
    }

    pub fn is_function(&self) -> bool {
        self.group_is(GroupKind::Function)
    }

    pub fn is_identifier(&self) -> bool {
        self.group_is(GroupKind::Identifier)
    }

    pub fn is_identifier_list(&self) -> bool {
        self.group_is(GroupKind::IdentifierList)
    }

    /// Part of a dotted name: `schema`, `"Table"`, `fn(...)`.
    fn is_chain_segment(&self) -> bool {
        self.is_name_like() || self.is_function()
    }

    /// Aliasable only through an explicit `AS`.
    fn is_aliasable_operand(&self) -> bool {
        self.is_parenthesis()
            || self.token_matches(|t| {
                matches!(t.kind, TokenKind::Number | TokenKind::StringLiteral)
            })
    }

    fn is_list_operand(&self) -> bool {
        match self {
            Self::Group(g) => g.kind != GroupKind::IdentifierList,
            Self::Token(t) => {
                t.is_name_like()
                    || matches!(
                        t.kind,
                        TokenKind::Number
                            | TokenKind::StringLiteral
                            | TokenKind::Wildcard
                            | TokenKind::Placeholder
                    )
                    || ["NULL", "TRUE", "FALSE", "DEFAULT"]
                        .iter()
                        .any(|v| t.is_keyword_value(v))
            }
        }
    }

    fn segment_name(&self) -> Option<String> {
        match self {
            Self::Token(t) if t.is_name_like() => Some(unquote(&t.text)),
            Self::Token(t) if t.kind == TokenKind::Wildcard => Some(t.text.clone()),
            Self::Group(g) if g.kind == GroupKind::Function => g.function_name(),
            _ => None,
        }
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            Self::Token(t) => out.push(t),
            Self::Group(g) => {
                for child in &g.children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl Group {
    /// `children` must be non-empty and contiguous.
    pub fn new(kind: GroupKind, children: Vec<Node>) -> Self {
        let start = children.first().map_or(0, Node::start);
        let end = children.last().map_or(start, Node::end);
        Self {
            kind,
            children,
            start,
            end,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn function_name(&self) -> Option<String> {
        if self.kind != GroupKind::Function {
            return None;
        }
        self.children.first()?.as_token().map(|t| unquote(&t.text))
    }

    /// Dotted name segments from the start of the group and the index just
    /// past them. A trailing dot yields a final `None` segment.
    fn name_chain(&self) -> (Vec<Option<String>>, usize) {
        let mut segments = Vec::new();
        let mut idx = 0;
        let mut expecting_segment = true;

        while let Some(node) = self.children.get(idx) {
            if expecting_segment && let Some(name) = node.segment_name() {
                segments.push(Some(name));
                expecting_segment = false;
            } else if !expecting_segment && node.is_punct('.') {
                expecting_segment = true;
            } else {
                break;
            }
            idx += 1;
        }

        if expecting_segment && !segments.is_empty() {
            segments.push(None);
        }
        (segments, idx)
    }

    /// The object's own name: last dotted segment, quotes removed.
    pub fn real_name(&self) -> Option<String> {
        self.name_chain().0.pop().flatten()
    }

    /// The qualifier before the last dot, if any.
    pub fn parent_name(&self) -> Option<String> {
        let (mut segments, _) = self.name_chain();
        if segments.len() < 2 {
            return None;
        }
        segments.pop();
        segments.pop().flatten()
    }

    pub fn alias(&self) -> Option<String> {
        if let Some((as_idx, _)) = self.token_next_by(None, |n| n.is_keyword_value("AS")) {
            return match self.token_next(Some(as_idx)) {
                Some((_, node)) if node.is_name_like() => Some(unquote(&node.text())),
                _ => None,
            };
        }

        // Bare alias: a single name right after the dotted chain
        let (_, chain_end) = self.name_chain();
        let (idx, node) = self.token_next(Some(chain_end.checked_sub(1)?))?;
        (node.is_name() && self.token_next(Some(idx)).is_none()).then(|| unquote(&node.text()))
    }

    /// Alias when present, otherwise the real name.
    pub fn get_name(&self) -> Option<String> {
        self.alias().or_else(|| self.real_name())
    }

    /// List members: every child except whitespace, comments and commas.
    pub fn identifiers(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_whitespace() && !n.is_punct(','))
    }
}

impl TokenList for Group {
    fn children(&self) -> &[Node] {
        &self.children
    }
}

impl Statement {
    pub fn new(children: Vec<Node>) -> Self {
        let start = children.first().map_or(0, Node::start);
        let end = children.last().map_or(start, Node::end);
        Self {
            children,
            start,
            end,
        }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::new(group_level(group_parens(tokens)))
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl TokenList for Statement {
    fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Splits after every `;` and groups each statement.
pub fn split_statements(tokens: Vec<Token>) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut current = Vec::new();

    for token in tokens {
        let terminator = token.is_punct(';');
        current.push(token);
        if terminator {
            statements.push(Statement::from_tokens(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        statements.push(Statement::from_tokens(current));
    }

    statements
}

/// Strips surrounding double quotes and collapses `""`.
pub fn unquote(text: &str) -> String {
    match text
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => text.to_string(),
    }
}

fn group_parens(tokens: Vec<Token>) -> Vec<Node> {
    // frames[0] is the statement level and is never popped
    let mut frames: Vec<Vec<Node>> = vec![Vec::new()];

    for token in tokens {
        if token.is_punct('(') {
            frames.push(vec![Node::Token(token)]);
            continue;
        }

        if token.is_punct(')')
            && frames.len() > 1
            && let Some(mut children) = frames.pop()
        {
            children.push(Node::Token(token));
            let group = Group::new(GroupKind::Parenthesis, group_level(children));
            push_node(&mut frames, Node::Group(group));
            continue;
        }

        push_node(&mut frames, Node::Token(token));
    }

    // Unclosed parentheses stay flat in their parent
    while frames.len() > 1 {
        if let Some(unclosed) = frames.pop() {
            for node in unclosed {
                push_node(&mut frames, node);
            }
        }
    }

    frames.pop().unwrap_or_default()
}

fn push_node(frames: &mut [Vec<Node>], node: Node) {
    if let Some(top) = frames.last_mut() {
        top.push(node);
    }
}

fn group_level(nodes: Vec<Node>) -> Vec<Node> {
    group_identifier_lists(group_identifiers(group_functions(nodes)))
}

fn group_functions(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let calls_previous = node.is_parenthesis()
            && out
                .last()
                .is_some_and(|prev| prev.is_name() && prev.end() == node.start());
        if calls_previous && let Some(name) = out.pop() {
            out.push(Node::Group(Group::new(
                GroupKind::Function,
                vec![name, node],
            )));
            continue;
        }
        out.push(node);
    }

    out
}

fn group_identifiers(nodes: Vec<Node>) -> Vec<Node> {
    group_runs(nodes, identifier_extent)
}

fn group_identifier_lists(nodes: Vec<Node>) -> Vec<Node> {
    group_runs(nodes, list_extent)
}

/// Repeatedly asks `extent` whether a group starts at the head of the
/// remaining nodes; `Some((last, kind))` wraps `..=last` into a `kind` group.
fn group_runs(nodes: Vec<Node>, extent: fn(&[Node]) -> Option<(usize, GroupKind)>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut rest: VecDeque<Node> = nodes.into();

    while !rest.is_empty() {
        match extent(rest.make_contiguous()) {
            Some((last, kind)) => {
                let children: Vec<Node> = rest.drain(..=last).collect();
                out.push(Node::Group(Group::new(kind, children)));
            }
            None => out.extend(rest.pop_front()),
        }
    }

    out
}

fn next_significant(nodes: &[Node], from: usize) -> Option<usize> {
    (from..nodes.len()).find(|&i| !nodes[i].is_whitespace())
}

fn dotted_chain_end(nodes: &[Node]) -> usize {
    let mut end = 1;
    while nodes.get(end).is_some_and(|n| n.is_punct('.')) {
        end += 1;
        let segment = nodes.get(end).is_some_and(|n| {
            n.is_chain_segment() || n.token_matches(|t| t.kind == TokenKind::Wildcard)
        });
        if !segment {
            break;
        }
        end += 1;
    }
    end
}

/// Index of the alias or body after `AS`. `[NOT] MATERIALIZED` before a
/// body is skipped.
fn alias_target(nodes: &[Node], as_idx: usize) -> Option<usize> {
    let mut target = next_significant(nodes, as_idx + 1)?;
    if nodes[target].is_keyword_value("NOT")
        && let Some(materialized) = next_significant(nodes, target + 1)
            .filter(|&i| nodes[i].is_keyword_value("MATERIALIZED"))
    {
        target = materialized;
    }
    if nodes[target].is_keyword_value("MATERIALIZED") {
        target = next_significant(nodes, target + 1).filter(|&i| nodes[i].is_parenthesis())?;
    }
    (nodes[target].is_name_like() || nodes[target].is_parenthesis()).then_some(target)
}

/// Index of the `END` closing the `CASE` at `at`.
fn case_end(nodes: &[Node], at: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, node) in nodes.iter().enumerate().skip(at) {
        if node.is_keyword_value("CASE") {
            depth += 1;
        } else if node.is_keyword_value("END") {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Extends `end` over trailing `::type` casts.
fn cast_suffix_end(nodes: &[Node], mut end: usize) -> usize {
    while let Some(cast) = next_significant(nodes, end).filter(|&i| nodes[i].is_cast())
        && let Some(ty) = next_significant(nodes, cast + 1)
            .filter(|&i| nodes[i].is_name_like() || nodes[i].is_function())
    {
        end = ty + 1;
    }
    end
}

/// Exclusive end of the operand starting at `at`, casts included.
fn operand_end(nodes: &[Node], at: usize) -> Option<usize> {
    let node = nodes.get(at)?;
    let end = if node.is_chain_segment() {
        at + dotted_chain_end(&nodes[at..])
    } else if node.is_aliasable_operand()
        || node.token_matches(|t| {
            t.kind == TokenKind::Placeholder
                || ["NULL", "TRUE", "FALSE"].iter().any(|v| t.is_keyword_value(v))
        })
    {
        at + 1
    } else if node.is_keyword_value("CASE") {
        case_end(nodes, at)? + 1
    } else {
        return None;
    };
    Some(cast_suffix_end(nodes, end))
}

/// Exclusive end of `operand (operator operand)*` whose first operand ends
/// at `end`.
fn operation_end(nodes: &[Node], mut end: usize) -> usize {
    while let Some(op) = next_significant(nodes, end).filter(|&i| nodes[i].is_binary_operator())
        && let Some(rhs_end) = next_significant(nodes, op + 1).and_then(|i| operand_end(nodes, i))
    {
        end = rhs_end;
    }
    end
}

fn identifier_extent(nodes: &[Node]) -> Option<(usize, GroupKind)> {
    let first = nodes.first()?;
    let is_chain = first.is_chain_segment();
    let chain_end = if is_chain { dotted_chain_end(nodes) } else { 1 };
    let first_end = operand_end(nodes, 0)?;
    let run_end = operation_end(nodes, first_end);

    // `name (col, ...) AS (body)`
    if is_chain
        && first_end == chain_end
        && let Some(cols) =
            next_significant(nodes, chain_end).filter(|&k| nodes[k].is_parenthesis())
        && let Some(as_idx) = next_significant(nodes, cols + 1)
        && nodes[as_idx].is_keyword_value("AS")
        && let Some(target) = alias_target(nodes, as_idx)
    {
        return Some((target, GroupKind::Identifier));
    }

    if let Some(k) = next_significant(nodes, run_end) {
        if nodes[k].is_keyword_value("AS") {
            if let Some(target) = alias_target(nodes, k) {
                return Some((target, GroupKind::Identifier));
            }
        } else if is_chain
            && run_end == chain_end
            && nodes[k].is_name()
            && !nodes.get(k + 1).is_some_and(|n| n.is_punct('.'))
        {
            return Some((k, GroupKind::Identifier));
        }
    }

    if run_end > first_end || (!is_chain && first_end > 1) {
        return Some((run_end - 1, GroupKind::Operation));
    }

    // A bare call stays a function; names, dotted chains and casts become identifiers
    let bare_function = first.is_function() && first_end == 1;
    (is_chain && !bare_function).then_some((first_end - 1, GroupKind::Identifier))
}

fn list_extent(nodes: &[Node]) -> Option<(usize, GroupKind)> {
    if !nodes.first()?.is_list_operand() {
        return None;
    }

    let mut last = None;
    let mut current = 0;
    while let Some(comma) = next_significant(nodes, current + 1).filter(|&i| nodes[i].is_punct(','))
    {
        let Some(item) =
            next_significant(nodes, comma + 1).filter(|&i| nodes[i].is_list_operand())
        else {
            break;
        };
        last = Some(item);
        current = item;
    }
    last.map(|item| (item, GroupKind::IdentifierList))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SqlParser;
    use crate::sql_lexer::PgLexer;

    fn parse(sql: &str) -> Statement {
        PgLexer::new().parse(sql)
    }

    fn significant(statement: &Statement) -> Vec<&Node> {
        statement
            .children
            .iter()
            .filter(|n| !n.is_whitespace())
            .collect()
    }

    mod statements {
        use super::*;

        #[test]
        fn splits_after_semicolon_keeping_terminator() {
            let statements = PgLexer::new().parse_statements("select 1; select 2");

            assert_eq!(statements.len(), 2);
            assert_eq!(statements[0].text(), "select 1;");
            assert_eq!(statements[1].text(), " select 2");
            assert_eq!(statements[1].start(), 9);
        }

        #[test]
        fn semicolon_inside_string_does_not_split() {
            let statements = PgLexer::new().parse_statements("select ';'");

            assert_eq!(statements.len(), 1);
        }

        #[test]
        fn empty_text_parses_to_empty_statement() {
            let statement = parse("");

            assert!(statement.is_empty());
            assert_eq!(statement.end(), 0);
        }
    }

    mod parentheses {
        use super::*;

        #[test]
        fn closed_parenthesis_is_grouped() {
            let statement = parse("(select 1)");

            assert_eq!(statement.children.len(), 1);
            assert!(statement.children[0].is_parenthesis());
        }

        #[test]
        fn unclosed_parenthesis_stays_flat() {
            let statement = parse("using (col1, ");

            assert!(statement.children.iter().any(Node::is_open_paren));
            assert!(!statement.children.iter().any(Node::is_parenthesis));
        }

        #[test]
        fn stray_close_parenthesis_is_a_leaf() {
            let statement = parse("a)");

            assert!(statement.children[1].is_punct(')'));
        }
    }

    mod identifiers {
        use super::*;

        #[test]
        fn dotted_name_has_parent_and_real_name() {
            let statement = parse("public.users");

            let group = statement.children[0].as_group().unwrap();
            assert_eq!(group.kind, GroupKind::Identifier);
            assert_eq!(group.parent_name().as_deref(), Some("public"));
            assert_eq!(group.real_name().as_deref(), Some("users"));
        }

        #[test]
        fn trailing_dot_has_parent_without_name() {
            let statement = parse("foo.");

            let group = statement.children[0].as_group().unwrap();
            assert_eq!(group.parent_name().as_deref(), Some("foo"));
            assert_eq!(group.real_name(), None);
        }

        #[test]
        fn quoted_name_is_unquoted() {
            let statement = parse(r#""My ""Table""""#);

            let group = statement.children[0].as_group().unwrap();
            assert_eq!(group.real_name().as_deref(), Some(r#"My "Table""#));
        }

        #[test]
        fn explicit_alias_wins_in_get_name() {
            let statement = parse("select t.total as amount");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.get_name().as_deref(), Some("amount"));
            assert_eq!(ident.real_name().as_deref(), Some("total"));
        }

        #[test]
        fn bare_alias_is_detected() {
            let statement = parse("from users u");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.alias().as_deref(), Some("u"));
        }

        #[test]
        fn keyword_after_name_is_not_alias() {
            let statement = parse("select abc from xxx");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.alias(), None);
            assert_eq!(ident.get_name().as_deref(), Some("abc"));
        }

        #[test]
        fn cte_form_groups_body_into_identifier() {
            let statement = parse("with a as (select 1) select 2");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert_eq!(ident.real_name().as_deref(), Some("a"));
            assert_eq!(ident.alias(), None);
            assert!(ident.children.iter().any(Node::is_parenthesis));
        }

        #[test]
        fn function_with_alias_is_identifier() {
            let statement = parse("select count(*) as n");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert_eq!(ident.get_name().as_deref(), Some("n"));
        }

        #[test]
        fn bare_function_stays_function() {
            let statement = parse("select now()");

            assert!(significant(&statement)[1].is_function());
        }

        #[test]
        fn aliased_expression_is_one_identifier() {
            let statement = parse("select a + b as c from t");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert_eq!(ident.text(), "a + b as c");
            assert_eq!(ident.get_name().as_deref(), Some("c"));
        }

        #[test]
        fn cast_without_alias_keeps_source_name() {
            let statement = parse("select x::int, z");

            let list = significant(&statement)[1].as_group().unwrap();
            let names: Vec<_> = list
                .identifiers()
                .filter_map(|(_, n)| n.as_group()?.get_name())
                .collect();
            assert_eq!(names, vec!["x", "z"]);
        }

        #[test]
        fn unaliased_expression_is_operation() {
            let statement = parse("select a + b, c");

            let list = significant(&statement)[1].as_group().unwrap();
            let members: Vec<_> = list.identifiers().map(|(_, n)| n).collect();
            assert_eq!(members[0].as_group().unwrap().kind, GroupKind::Operation);
            assert!(members[1].is_identifier());
        }

        #[test]
        fn case_block_with_alias_is_identifier() {
            let statement = parse("select case when x then case when y then 1 end end as c");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert_eq!(ident.get_name().as_deref(), Some("c"));
        }

        #[test]
        fn unfinished_case_stays_flat() {
            let statement = parse("select case when x");

            assert!(significant(&statement)[1].is_keyword_value("CASE"));
        }

        #[test]
        fn unreserved_keyword_works_as_name() {
            let statement = parse("with first as (select 1) select 2");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert_eq!(ident.real_name().as_deref(), Some("first"));
        }

        #[test]
        fn materialized_modifier_is_skipped_before_body() {
            let statement = parse("with a as not materialized (select 1) select 2");

            let ident = significant(&statement)[1].as_group().unwrap();
            assert_eq!(ident.kind, GroupKind::Identifier);
            assert!(ident.children.last().unwrap().is_parenthesis());
        }

        #[test]
        fn literal_needs_explicit_alias() {
            let statement = parse("select 1 as one, 2");

            let list = significant(&statement)[1].as_group().unwrap();
            assert_eq!(list.kind, GroupKind::IdentifierList);
            let members: Vec<_> = list.identifiers().map(|(_, n)| n).collect();
            assert!(members[0].is_identifier());
            assert!(!members[1].is_identifier());
        }
    }

    mod lists {
        use super::*;

        #[test]
        fn comma_separated_names_form_list() {
            let statement = parse("x, y, z");

            assert_eq!(statement.children.len(), 1);
            let list = statement.children[0].as_group().unwrap();
            let names: Vec<_> = list
                .identifiers()
                .filter_map(|(_, n)| n.as_group()?.get_name())
                .collect();
            assert_eq!(names, vec!["x", "y", "z"]);
        }

        #[test]
        fn trailing_comma_is_left_outside() {
            let statement = parse("a, b,");

            assert!(statement.children[0].is_identifier_list());
            assert!(statement.children[1].is_punct(','));
        }

        #[test]
        fn list_inside_parenthesis() {
            let statement = parse("(5, 6, 7)");

            let paren = statement.children[0].as_group().unwrap();
            assert!(paren.children[1].is_identifier_list());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn token_next_skips_whitespace_and_comments() {
            let statement = parse("  /* c */ with a");

            let (idx, node) = statement.token_next(None).unwrap();
            assert!(node.is_cte());
            assert_eq!(statement.token_next(Some(idx)).unwrap().1.text(), "a");
        }

        #[test]
        fn flatten_round_trips_text() {
            let sql = "with a as (select x, y from t) select * from a where (b)";

            let statement = parse(sql);

            assert_eq!(statement.text(), sql);
            assert_eq!(statement.flatten().len(), PgLexer::new().tokenize(sql).len());
        }

        #[test]
        fn hand_built_tree_supports_navigation() {
            let with = Token::new(TokenKind::Cte, "WITH", 0);
            let space = Token::new(TokenKind::Whitespace, " ", 4);
            let name = Token::new(TokenKind::Name, "a", 5);
            let statement = Statement::new(vec![
                Node::Token(with),
                Node::Token(space),
                Node::Group(Group::new(GroupKind::Identifier, vec![Node::Token(name)])),
            ]);

            let (idx, node) = statement.token_next(Some(0)).unwrap();
            assert_eq!(idx, 2);
            assert!(node.is_identifier());
            assert_eq!(statement.end(), 6);
        }
    }
}
