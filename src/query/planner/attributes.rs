// Attribute Reasoning
//
// Helpers shared by the optimizer passes: which bare attribute names a
// payload references, which attributes a subtree can produce, and how a
// condition splits into top-level conjuncts.

use std::collections::BTreeSet;

use crate::catalog::Schema;
use crate::query::parser::lexer::{TokenType, tokenize};
use crate::query::planner::logical::OperatorNode;

/// Bare attribute names, qualification stripped. Ordered so that anything
/// built from a set (projection lists, logs) is deterministic.
pub type AttributeSet = BTreeSet<String>;

/// Marker kept in an attribute set when a payload selects every column
pub const WILDCARD: &str = "*";

/// Attribute names referenced by a payload. String literals, numbers and
/// keywords are skipped; `t.a` contributes `a`.
pub fn referenced_attributes(text: &str) -> AttributeSet {
    let mut attributes = AttributeSet::new();

    for token in tokenize(text) {
        match token.token_type {
            TokenType::IDENTIFIER(identifier) => {
                let bare = identifier.rsplit('.').next().unwrap_or_default();
                if !bare.is_empty() && !bare.chars().all(|c| c.is_ascii_digit()) {
                    attributes.insert(bare.to_string());
                }
            }
            TokenType::SYMBOL(symbol) if symbol == WILDCARD => {
                attributes.insert(WILDCARD.to_string());
            }
            _ => {}
        }
    }

    attributes
}

/// Every attribute the tables under `node` provide
pub fn available_attributes(node: &OperatorNode, schema: &Schema) -> AttributeSet {
    schema.attribute_set(node.tables())
}

/// Split a condition on `and` outside parentheses. Conjunct text is kept
/// verbatim.
pub fn split_conjuncts(condition: &str) -> Vec<String> {
    let mut conjuncts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for token in tokenize(condition) {
        match token.token_type {
            TokenType::LeftParen => depth += 1,
            TokenType::RightParen => depth = depth.saturating_sub(1),
            TokenType::AND if depth == 0 => {
                push_conjunct(&mut conjuncts, &condition[start..token.start]);
                start = token.end;
            }
            _ => {}
        }
    }
    push_conjunct(&mut conjuncts, &condition[start..]);

    conjuncts
}

fn push_conjunct(conjuncts: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        conjuncts.push(text.to_string());
    }
}

/// Re-join conjuncts into a single condition
pub fn join_conjuncts(conjuncts: &[String]) -> String {
    conjuncts.join(" AND ")
}
