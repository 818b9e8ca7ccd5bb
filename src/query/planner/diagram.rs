// Diagram Description
//
// Serializes an operator tree as Mermaid flowchart text. Turning that text
// into an image is up to the caller.

use std::fmt;

use crate::query::planner::logical::OperatorNode;

/// Payload lines in node labels are wrapped at this many characters
pub const LABEL_WIDTH: usize = 30;

struct DiagramNode<'a> {
    id: usize,
    parent: Option<usize>,
    node: &'a OperatorNode,
}

/// Mermaid `graph TD` description of an operator tree.
///
/// Node ids (`N0`, `N1`, ...) follow a pre-order walk, so the same tree
/// always yields the same text.
pub struct MermaidDiagram<'a> {
    nodes: Vec<DiagramNode<'a>>,
}

impl<'a> MermaidDiagram<'a> {
    pub fn new(tree: &'a OperatorNode) -> Self {
        let mut nodes = Vec::with_capacity(tree.node_count());
        let mut stack = vec![(tree, None)];

        while let Some((node, parent)) = stack.pop() {
            let id = nodes.len();
            nodes.push(DiagramNode { id, parent, node });
            // Reversed so the left input gets the lower id
            for child in node.children().into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        MermaidDiagram { nodes }
    }
}

impl fmt::Display for MermaidDiagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph TD")?;
        for entry in &self.nodes {
            writeln!(f, "    N{}[\"{}\"]", entry.id, label(entry.node))?;
        }
        for entry in &self.nodes {
            if let Some(parent) = entry.parent {
                writeln!(f, "    N{} --> N{}", parent, entry.id)?;
            }
        }
        Ok(())
    }
}

fn label(node: &OperatorNode) -> String {
    let payload = wrap_words(node.payload(), LABEL_WIDTH)
        .iter()
        .map(|line| escape(line))
        .collect::<Vec<_>>()
        .join("<br/>");
    format!("{}<br/>{}", node.kind(), payload)
}

/// Mermaid entity codes for characters that would end the label or be
/// read as markup
fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
}

/// Greedy word wrap; words longer than `width` get a line of their own
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Mermaid text for `tree`
pub fn to_mermaid(tree: &OperatorNode) -> String {
    MermaidDiagram::new(tree).to_string()
}
