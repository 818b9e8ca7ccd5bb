// Operator Builder
//
// This module builds operator trees from relational algebra text using a
// small recursive-descent reader over the grammar
//
//     E := π attrs (E) | σ cond (E) | (E ⨝ cond identifier) | identifier
//
// Joins are left-deep: only the left operand of a join recurses into a
// nested join, the right operand is always a single identifier.

use log::warn;

use crate::query::error::{QueryError, QueryResult};
use crate::query::parser::lexer::{Token, TokenType, tokenize};
use crate::query::planner::logical::{JOIN_SYMBOL, OperatorNode, PROJECTION_SYMBOL, SELECTION_SYMBOL};

/// Build an operator tree from algebra text.
///
/// Text matching none of the productions becomes a `TableScan` leaf holding
/// the trimmed text verbatim.
pub fn build_operator_graph(expr: &str) -> OperatorNode {
    let expr = expr.trim();

    if let Some((attributes, inner)) = split_unary(expr, PROJECTION_SYMBOL) {
        return OperatorNode::projection(attributes, build_operator_graph(inner));
    }
    if let Some((condition, inner)) = split_unary(expr, SELECTION_SYMBOL) {
        return OperatorNode::selection(condition, build_operator_graph(inner));
    }
    if let Some(join) = build_join(expr) {
        return join;
    }

    if !is_single_identifier(expr) {
        warn!("algebra text {:?} matches no operator; reading it as a table", expr);
    }
    OperatorNode::table_scan(expr)
}

/// Like [`build_operator_graph`], but rejects trees whose leaves are not
/// plain identifiers instead of keeping them as opaque table scans.
pub fn build_operator_graph_strict(expr: &str) -> QueryResult<OperatorNode> {
    let tree = build_operator_graph(expr);
    if let Some(leaf) = tree.tables().into_iter().find(|t| !is_single_identifier(t)) {
        return Err(QueryError::MalformedAlgebra(format!(
            "'{}' is not an operator expression or table name",
            leaf
        )));
    }
    Ok(tree)
}

/// Split `<marker> payload (inner)` into its payload and inner expression.
/// The final `)` is paired with its matching `(` so payloads may contain
/// parenthesized text of their own. Parentheses inside quoted literals are
/// single string tokens and never count.
fn split_unary(expr: &str, marker: char) -> Option<(&str, &str)> {
    let rest = expr.strip_prefix(marker)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let tokens = tokenize(rest);
    let (last, inner_tokens) = tokens.split_last()?;
    if last.token_type != TokenType::RightParen || last.end != rest.len() {
        return None;
    }
    let open = matching_open_paren(inner_tokens)?;

    Some((rest[..open].trim(), &rest[open + 1..last.start]))
}

/// Byte offset of the `(` left unmatched at the end of `tokens`
fn matching_open_paren(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for token in tokens.iter().rev() {
        match token.token_type {
            TokenType::RightParen => depth += 1,
            TokenType::LeftParen if depth == 0 => return Some(token.start),
            TokenType::LeftParen => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Read `(left ⨝ condition right)`, splitting at the rightmost join marker
/// outside any nested parentheses.
fn build_join(expr: &str) -> Option<OperatorNode> {
    let tokens = tokenize(expr);
    let (first, rest) = tokens.split_first()?;
    let (last, body) = rest.split_last()?;
    if first.token_type != TokenType::LeftParen
        || first.start != 0
        || last.token_type != TokenType::RightParen
        || last.end != expr.len()
    {
        return None;
    }

    let mut depth = 0i32;
    for token in body.iter().rev() {
        match &token.token_type {
            TokenType::RightParen => depth += 1,
            TokenType::LeftParen => depth -= 1,
            TokenType::SYMBOL(symbol) if depth == 0 && is_join_marker(symbol) => {
                let left = expr[first.end..token.start].trim();
                let rest = expr[token.end..last.start].trim();

                // The right operand is the last whitespace-separated word
                let (condition, right) = match rest.rsplit_once(char::is_whitespace) {
                    Some((condition, right)) => (condition.trim(), right.trim()),
                    None => ("", rest),
                };

                return Some(OperatorNode::join(
                    condition,
                    build_operator_graph(left),
                    build_operator_graph(right),
                ));
            }
            _ => {}
        }
    }
    None
}

fn is_join_marker(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    chars.next() == Some(JOIN_SYMBOL) && chars.next().is_none()
}

fn is_single_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
