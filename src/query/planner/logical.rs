// Operator Tree
//
// This module defines the operator tree built from relational algebra
// text, rewritten by the optimizer and linearized into an execution plan.

use std::fmt;

pub const PROJECTION_SYMBOL: char = 'π';
pub const SELECTION_SYMBOL: char = 'σ';
pub const JOIN_SYMBOL: char = '⨝';

/// The kind of an operator, without its payload or inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Projection,
    Selection,
    Join,
    TableScan,
}

impl NodeKind {
    /// Short label used in tree dumps and diagrams
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Projection => "π",
            NodeKind::Selection => "σ",
            NodeKind::Join => "⨝",
            NodeKind::TableScan => "Table",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents a node in the operator tree.
///
/// Arity is part of the type: scans have no inputs, projections and
/// selections have one, joins have a left and a right input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorNode {
    /// Restrict the output to an attribute list
    Projection {
        /// Comma separated attribute list
        attributes: String,
        /// Input operator
        input: Box<OperatorNode>,
    },
    /// Filter rows by a condition
    Selection {
        /// Boolean condition text
        condition: String,
        /// Input operator
        input: Box<OperatorNode>,
    },
    /// Combine two inputs under a condition
    Join {
        /// Join condition text
        condition: String,
        /// Left input
        left: Box<OperatorNode>,
        /// Right input
        right: Box<OperatorNode>,
    },
    /// Read a base table
    TableScan {
        /// Table identifier
        table: String,
    },
}

impl OperatorNode {
    pub fn projection(attributes: impl Into<String>, input: OperatorNode) -> Self {
        OperatorNode::Projection {
            attributes: attributes.into(),
            input: Box::new(input),
        }
    }

    pub fn selection(condition: impl Into<String>, input: OperatorNode) -> Self {
        OperatorNode::Selection {
            condition: condition.into(),
            input: Box::new(input),
        }
    }

    pub fn join(condition: impl Into<String>, left: OperatorNode, right: OperatorNode) -> Self {
        OperatorNode::Join {
            condition: condition.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn table_scan(table: impl Into<String>) -> Self {
        OperatorNode::TableScan {
            table: table.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            OperatorNode::Projection { .. } => NodeKind::Projection,
            OperatorNode::Selection { .. } => NodeKind::Selection,
            OperatorNode::Join { .. } => NodeKind::Join,
            OperatorNode::TableScan { .. } => NodeKind::TableScan,
        }
    }

    /// Attribute list, condition or table name depending on the kind
    pub fn payload(&self) -> &str {
        match self {
            OperatorNode::Projection { attributes, .. } => attributes,
            OperatorNode::Selection { condition, .. } => condition,
            OperatorNode::Join { condition, .. } => condition,
            OperatorNode::TableScan { table } => table,
        }
    }

    /// Inputs in order (left before right for joins)
    pub fn children(&self) -> Vec<&OperatorNode> {
        match self {
            OperatorNode::Projection { input, .. } | OperatorNode::Selection { input, .. } => {
                vec![input.as_ref()]
            }
            OperatorNode::Join { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            OperatorNode::TableScan { .. } => Vec::new(),
        }
    }

    /// Tables scanned anywhere in this subtree, left to right
    pub fn tables(&self) -> Vec<&str> {
        let mut tables = Vec::new();
        self.collect_tables(&mut tables);
        tables
    }

    fn collect_tables<'a>(&'a self, tables: &mut Vec<&'a str>) {
        match self {
            OperatorNode::TableScan { table } => tables.push(table),
            OperatorNode::Projection { input, .. } | OperatorNode::Selection { input, .. } => {
                input.collect_tables(tables)
            }
            OperatorNode::Join { left, right, .. } => {
                left.collect_tables(tables);
                right.collect_tables(tables);
            }
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(OperatorNode::node_count)
            .sum::<usize>()
    }

    /// Rebuild relational algebra text for this subtree
    pub fn to_algebra(&self) -> String {
        match self {
            OperatorNode::Projection { attributes, input } => {
                format!("{} {} ({})", PROJECTION_SYMBOL, attributes, input.to_algebra())
            }
            OperatorNode::Selection { condition, input } => {
                format!("{} {} ({})", SELECTION_SYMBOL, condition, input.to_algebra())
            }
            OperatorNode::Join {
                condition,
                left,
                right,
            } => format!(
                "({} {} {} {})",
                left.to_algebra(),
                JOIN_SYMBOL,
                condition,
                right.to_algebra()
            ),
            OperatorNode::TableScan { table } => table.clone(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        writeln!(f, "{}[{}] {}", "  ".repeat(level), self.kind(), self.payload())?;
        for child in self.children() {
            child.fmt_indented(f, level + 1)?;
        }
        Ok(())
    }
}

/// Indented dump, one node per line: `[kind] payload`
impl fmt::Display for OperatorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
