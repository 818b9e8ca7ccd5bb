// Filter Pushdown Optimizer
//
// This module moves selection conjuncts below the joins they sit on when
// every attribute a conjunct uses comes from only one side of the join.

use log::debug;

use crate::catalog::Schema;
use crate::query::planner::attributes::{
    AttributeSet, available_attributes, join_conjuncts, referenced_attributes, split_conjuncts,
};
use crate::query::planner::logical::OperatorNode;

/// Where a single conjunct ends up relative to a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Left,
    Right,
    Stay,
}

/// Filter Pushdown Optimizer component
pub struct FilterPushdownOptimizer<'a> {
    schema: &'a Schema,
}

impl<'a> FilterPushdownOptimizer<'a> {
    /// Create a new filter pushdown optimizer
    pub fn new(schema: &'a Schema) -> Self {
        FilterPushdownOptimizer { schema }
    }

    /// Apply filter pushdown to a tree, children first
    pub fn optimize(&self, plan: OperatorNode) -> OperatorNode {
        match plan {
            OperatorNode::Selection { condition, input } => {
                let optimized_input = self.optimize(*input);
                self.push_selection(condition, optimized_input)
            }
            OperatorNode::Projection { attributes, input } => OperatorNode::Projection {
                attributes,
                input: Box::new(self.optimize(*input)),
            },
            OperatorNode::Join {
                condition,
                left,
                right,
            } => OperatorNode::Join {
                condition,
                left: Box::new(self.optimize(*left)),
                right: Box::new(self.optimize(*right)),
            },
            OperatorNode::TableScan { .. } => plan,
        }
    }

    /// Place a selection over `input`. Over a join, conjuncts that only use
    /// one side's attributes move below the join onto that side; conjuncts
    /// moved onto a side that is itself a join keep moving down.
    fn push_selection(&self, condition: String, input: OperatorNode) -> OperatorNode {
        let (join_condition, left, right) = match input {
            OperatorNode::Join {
                condition,
                left,
                right,
            } => (condition, left, right),
            other => return OperatorNode::selection(condition, other),
        };

        let left_attrs = available_attributes(&left, self.schema);
        let right_attrs = available_attributes(&right, self.schema);
        let left_only: AttributeSet = left_attrs.difference(&right_attrs).cloned().collect();
        let right_only: AttributeSet = right_attrs.difference(&left_attrs).cloned().collect();

        let mut to_left = Vec::new();
        let mut to_right = Vec::new();
        let mut stay = Vec::new();

        for conjunct in split_conjuncts(&condition) {
            match route(&referenced_attributes(&conjunct), &left_only, &right_only) {
                Route::Left => to_left.push(conjunct),
                Route::Right => to_right.push(conjunct),
                Route::Stay => stay.push(conjunct),
            }
        }

        if to_left.is_empty() && to_right.is_empty() {
            return OperatorNode::selection(
                condition,
                OperatorNode::Join {
                    condition: join_condition,
                    left,
                    right,
                },
            );
        }

        debug!(
            "pushing {:?} left and {:?} right of join on {:?}, keeping {:?}",
            to_left, to_right, join_condition, stay
        );

        let left = if to_left.is_empty() {
            *left
        } else {
            self.push_selection(join_conjuncts(&to_left), *left)
        };
        let right = if to_right.is_empty() {
            *right
        } else {
            self.push_selection(join_conjuncts(&to_right), *right)
        };

        let join = OperatorNode::join(join_condition, left, right);
        if stay.is_empty() {
            join
        } else {
            OperatorNode::selection(join_conjuncts(&stay), join)
        }
    }
}

/// A conjunct goes to a side only when it uses attributes and all of them
/// are exclusive to that side.
fn route(attrs: &AttributeSet, left_only: &AttributeSet, right_only: &AttributeSet) -> Route {
    if attrs.is_empty() {
        Route::Stay
    } else if attrs.is_subset(left_only) {
        Route::Left
    } else if attrs.is_subset(right_only) {
        Route::Right
    } else {
        Route::Stay
    }
}
