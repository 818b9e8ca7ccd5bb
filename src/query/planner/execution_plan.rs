// Execution Plan
//
// Linearizes an operator tree into the order its steps run in: every
// input is fully listed before the operator that consumes it.

use std::fmt;

use crate::query::planner::logical::OperatorNode;

/// Ordered, human-readable execution steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    steps: Vec<String>,
}

impl ExecutionPlan {
    /// Build the plan for a tree
    pub fn from_tree(tree: &OperatorNode) -> Self {
        let mut steps = Vec::with_capacity(tree.node_count());
        collect_steps(tree, &mut steps);
        ExecutionPlan { steps }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<String> {
        self.steps
    }
}

/// One line per step, numbered from 1
impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, step)?;
        }
        Ok(())
    }
}

fn collect_steps(node: &OperatorNode, steps: &mut Vec<String>) {
    for child in node.children() {
        collect_steps(child, steps);
    }
    steps.push(describe(node));
}

fn describe(node: &OperatorNode) -> String {
    match node {
        OperatorNode::TableScan { table } => format!("Access table '{}'.", table),
        OperatorNode::Selection { condition, .. } => {
            format!("Apply SELECTION with condition: {}.", condition)
        }
        OperatorNode::Join { condition, .. } => {
            format!("Perform JOIN with condition: {}.", condition)
        }
        OperatorNode::Projection { attributes, .. } => {
            format!("Project attributes: {}.", attributes)
        }
    }
}

/// Post-order list of execution steps for `tree`
pub fn linearize(tree: &OperatorNode) -> Vec<String> {
    ExecutionPlan::from_tree(tree).into_steps()
}
