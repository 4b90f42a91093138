//! Binary decision tree mapping questionnaire answers to a profile.
//!
//! Nodes live in an arena and refer to their children by index. A branch
//! can only point at nodes created before it, so every tree is acyclic.
//!
//! Evaluation starts at the root, reads the answer for the branch's
//! attribute and goes left when `answer <= threshold`, right otherwise,
//! until it reaches a leaf. If an answer is missing the tree cannot decide
//! and evaluation falls back to [`PreferenceProfile::balanced`] instead of
//! guessing a branch.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use super::PreferenceProfile;

/// 1 = very tight budget, 5 = no constraint.
pub const BUDGET_CONCERN: &str = "budget_concern";
/// 1 = comfort first, 5 = speed first.
pub const SPEED_PRIORITY: &str = "speed_priority";
/// 1 = time does not matter, 5 = time is critical.
pub const TIME_IMPORTANCE: &str = "time_importance";
/// 1 = transfers do not matter, 5 = as few transfers as possible.
pub const COMFORT_PREFERENCE: &str = "comfort_preference";

/// Questionnaire answers keyed by attribute name.
///
/// Values are conventionally in [1, 5] but are compared as given.
pub type Answers = HashMap<String, f64>;

/// Error from building a decision tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A node id does not belong to this tree
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// A branch refers to a node created after it
    #[error("branch {branch} refers to later node {child}")]
    ForwardReference { branch: usize, child: usize },
}

/// Index of a node inside a [`DecisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
enum TreeNode {
    Leaf {
        label: String,
        profile: PreferenceProfile,
    },
    Branch {
        question: String,
        attribute: String,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
}

/// The leaf reached by an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision<'a> {
    pub label: &'a str,
    pub profile: &'a PreferenceProfile,
}

/// Builder for a [`DecisionTree`]: create leaves first, then the branches
/// above them.
#[derive(Debug, Default)]
pub struct DecisionTreeBuilder {
    nodes: Vec<TreeNode>,
}

impl DecisionTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf carrying `profile`.
    pub fn leaf(&mut self, label: impl Into<String>, profile: PreferenceProfile) -> NodeId {
        self.push(TreeNode::Leaf {
            label: label.into(),
            profile,
        })
    }

    /// Add a branch on `attribute`: left when `answer <= threshold`.
    pub fn branch(
        &mut self,
        question: impl Into<String>,
        attribute: impl Into<String>,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.push(TreeNode::Branch {
            question: question.into(),
            attribute: attribute.into(),
            threshold,
            left,
            right,
        })
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Finish the tree with `root` as its entry point.
    ///
    /// # Errors
    ///
    /// Fails if `root` or any child id is out of range, or if a branch refers
    /// to a node that was added after it.
    pub fn build(self, root: NodeId) -> Result<DecisionTree, TreeError> {
        if root.0 >= self.nodes.len() {
            return Err(TreeError::UnknownNode(root.0));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Branch { left, right, .. } = node {
                for child in [left, right] {
                    if child.0 >= self.nodes.len() {
                        return Err(TreeError::UnknownNode(child.0));
                    }
                    if child.0 >= idx {
                        return Err(TreeError::ForwardReference {
                            branch: idx,
                            child: child.0,
                        });
                    }
                }
            }
        }
        Ok(DecisionTree {
            nodes: self.nodes,
            root,
        })
    }
}

/// A fixed binary decision tree over numeric answers.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl DecisionTree {
    /// The five-outcome questionnaire.
    ///
    /// ```text
    /// budget_concern <= 2
    /// ├─ speed_priority <= 3
    /// │  ├─ Most Economical
    /// │  └─ Fast & Economical
    /// └─ time_importance <= 4
    ///    ├─ comfort_preference <= 3
    ///    │  ├─ Scenic Route
    ///    │  └─ Most Comfortable
    ///    └─ Fastest Route
    /// ```
    pub fn standard() -> Self {
        let mut b = DecisionTreeBuilder::new();

        let economical = b.leaf(
            "Most Economical",
            PreferenceProfile::new(0.1, 0.1, 0.6, 0.2, "cost"),
        );
        let fast_economical = b.leaf(
            "Fast & Economical",
            PreferenceProfile::new(0.4, 0.1, 0.4, 0.1, "cost"),
        );
        let scenic = b.leaf(
            "Scenic Route",
            PreferenceProfile::new(0.2, 0.4, 0.1, 0.3, "distance"),
        );
        let comfortable = b.leaf(
            "Most Comfortable",
            PreferenceProfile::new(0.2, 0.3, 0.1, 0.4, "transfers"),
        );
        let fastest = b.leaf(
            "Fastest Route",
            PreferenceProfile::new(0.6, 0.1, 0.1, 0.2, "time"),
        );

        let comfort = b.branch(
            "Do you prefer fewer transfers? (1-5, above 3 means yes)",
            COMFORT_PREFERENCE,
            3.0,
            scenic,
            comfortable,
        );
        let budget_tight = b.branch(
            "Do you prioritise speed over comfort? (1-5, above 3 means yes)",
            SPEED_PRIORITY,
            3.0,
            economical,
            fast_economical,
        );
        let budget_flexible = b.branch(
            "Is time very important? (1-5, above 4 means yes)",
            TIME_IMPORTANCE,
            4.0,
            comfort,
            fastest,
        );
        let root = b.branch(
            "Is budget a major concern? (1-5, 2 or below means yes)",
            BUDGET_CONCERN,
            2.0,
            budget_tight,
            budget_flexible,
        );

        b.into_tree(root)
    }

    /// A single-question tree: budget-focused or time-focused.
    pub fn simple() -> Self {
        let mut b = DecisionTreeBuilder::new();
        let budget = b.leaf(
            "Budget Focused",
            PreferenceProfile::new(0.2, 0.2, 0.5, 0.1, "cost"),
        );
        let time = b.leaf(
            "Time Focused",
            PreferenceProfile::new(0.5, 0.2, 0.1, 0.2, "time"),
        );
        let root = b.branch(
            "Is budget your main concern? (1-5, 2 or below means yes)",
            BUDGET_CONCERN,
            2.0,
            budget,
            time,
        );
        b.into_tree(root)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from the root to a leaf.
    ///
    /// Returns `None` if an answer needed on the way is missing.
    pub fn decide(&self, answers: &Answers) -> Option<Decision<'_>> {
        self.decide_from(self.root, answers)
    }

    /// Walk from `start` to a leaf.
    pub fn decide_from(&self, start: NodeId, answers: &Answers) -> Option<Decision<'_>> {
        let mut current = start;
        loop {
            match self.nodes.get(current.0)? {
                TreeNode::Leaf { label, profile } => return Some(Decision { label, profile }),
                TreeNode::Branch {
                    attribute,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let answer = answers.get(attribute)?;
                    current = if *answer <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// The profile for `answers`, or the balanced profile if the tree cannot
    /// decide.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::preferences::{Answers, DecisionTree};
    ///
    /// let tree = DecisionTree::standard();
    /// let answers: Answers = [("budget_concern".to_string(), 1.0), ("speed_priority".to_string(), 4.0)]
    ///     .into_iter()
    ///     .collect();
    ///
    /// assert_eq!(tree.evaluate(&answers).primary_criterion, "cost");
    /// ```
    pub fn evaluate(&self, answers: &Answers) -> PreferenceProfile {
        self.decide(answers)
            .map(|d| d.profile.clone())
            .unwrap_or_default()
    }

    /// `(attribute, question)` pairs in depth-first order, each attribute once.
    pub fn questions(&self) -> Vec<(&str, &str)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            if let Some(TreeNode::Branch {
                question,
                attribute,
                left,
                right,
                ..
            }) = self.nodes.get(id.0)
            {
                if seen.insert(attribute.as_str()) {
                    out.push((attribute.as_str(), question.as_str()));
                }
                stack.push(*right);
                stack.push(*left);
            }
        }

        out
    }

    /// Indented text rendering of the tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root, 0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match &self.nodes[id.0] {
            TreeNode::Leaf { label, profile } => {
                let _ = writeln!(
                    out,
                    "{indent}LEAF: {label} [time={}, distance={}, fare={}, transfers={}]",
                    profile.time_weight,
                    profile.distance_weight,
                    profile.fare_weight,
                    profile.transfer_weight
                );
            }
            TreeNode::Branch {
                question,
                attribute,
                threshold,
                left,
                right,
            } => {
                let _ = writeln!(out, "{indent}NODE: {question} [{attribute} <= {threshold}]");
                self.render_node(*left, depth + 1, out);
                self.render_node(*right, depth + 1, out);
            }
        }
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::standard()
    }
}

impl DecisionTreeBuilder {
    /// Finish a tree assembled in this module, where every id is known good.
    fn into_tree(self, root: NodeId) -> DecisionTree {
        DecisionTree {
            nodes: self.nodes,
            root,
        }
    }
}
