//! Validator - offline consistency check over a fully assembled library.
//!
//! Run before content ships, never during play:
//! 1. **Start**: every tree's `start_id` must resolve
//! 2. **Traversal**: breadth-first from the start node, following `next_id`
//!    and every offered choice; a visited set keeps cyclic content finite
//! 3. **Links**: every `next_id` and `choice_ids` entry met on the way must
//!    resolve, and branching nodes must not also carry a `next_id`
//! 4. **Auto-advance loops**: a cycle made only of `next_id` links is an error
//! 5. **Reachability**: records no tree reaches are reported as warnings
//!
//! All findings across all trees are collected into one report.

mod report;

pub use report::*;

use dialog_content::{ChoiceId, DialogTree, EntryKind, NodeId, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, info, warn};

use crate::error::Referrer;
use crate::registry::DialogLibrary;

/// Configuration for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report nodes and choices no tree can reach.
    pub report_unreachable: bool,

    /// Fail the report on warnings as well as errors.
    pub deny_warnings: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            report_unreachable: true,
            deny_warnings: false,
        }
    }
}

/// Records reached from at least one tree.
#[derive(Default)]
struct Reached<'a> {
    nodes: HashSet<&'a NodeId>,
    choices: HashSet<&'a ChoiceId>,
}

pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Check every tree in the library and aggregate the findings.
    pub fn validate(&self, library: &DialogLibrary) -> ValidationReport {
        let mut findings = Vec::new();
        let mut reached = Reached::default();

        for (tree_id, tree) in library.trees().iter() {
            self.check_tree(library, tree_id, tree, &mut reached, &mut findings);
        }

        if self.config.report_unreachable {
            for id in library.nodes().ids() {
                if !reached.nodes.contains(id) {
                    findings.push(Finding::UnreachableContent {
                        kind: EntryKind::Node,
                        id: id.to_string(),
                    });
                }
            }
            for id in library.choices().ids() {
                if !reached.choices.contains(id) {
                    findings.push(Finding::UnreachableContent {
                        kind: EntryKind::Choice,
                        id: id.to_string(),
                    });
                }
            }
        }

        let report = ValidationReport::new(findings, self.config.deny_warnings);
        if report.has_errors() {
            warn!(trees = library.trees().len(), "Dialog content has errors: {}", report.summary());
        } else {
            info!(trees = library.trees().len(), "Dialog content validated: {}", report.summary());
        }
        report
    }

    fn check_tree<'a>(
        &self,
        library: &'a DialogLibrary,
        tree_id: &TreeId,
        tree: &'a DialogTree,
        reached: &mut Reached<'a>,
        findings: &mut Vec<Finding>,
    ) {
        let nodes = library.nodes();
        let choices = library.choices();

        let dangling = |referrer: Referrer, missing_kind: EntryKind, missing: &str| {
            Finding::DanglingReference {
                tree: tree_id.clone(),
                referrer,
                missing_kind,
                missing: missing.to_string(),
            }
        };

        if !nodes.has(&tree.start_id) {
            findings.push(dangling(
                Referrer::Tree(tree_id.clone()),
                EntryKind::Node,
                &tree.start_id.0,
            ));
            return;
        }

        let mut visited: HashSet<&'a NodeId> = HashSet::new();
        let mut checked_choices: HashSet<&'a ChoiceId> = HashSet::new();
        let mut order: Vec<&'a NodeId> = Vec::new();
        let mut queue: VecDeque<&'a NodeId> = VecDeque::new();

        visited.insert(&tree.start_id);
        queue.push_back(&tree.start_id);

        while let Some(node_id) = queue.pop_front() {
            let Some(node) = nodes.find(node_id) else {
                continue;
            };
            order.push(node_id);
            reached.nodes.insert(node_id);

            if node.is_branching() {
                if let Some(next_id) = &node.next_id {
                    findings.push(Finding::ConflictingSuccessor {
                        tree: tree_id.clone(),
                        node: node_id.clone(),
                    });
                    // Never followed at runtime, but the link must still resolve.
                    if !nodes.has(next_id) {
                        findings.push(dangling(
                            Referrer::Node(node_id.clone()),
                            EntryKind::Node,
                            &next_id.0,
                        ));
                    }
                }
            } else if let Some(next_id) = &node.next_id {
                if nodes.has(next_id) {
                    if visited.insert(next_id) {
                        queue.push_back(next_id);
                    }
                } else {
                    findings.push(dangling(
                        Referrer::Node(node_id.clone()),
                        EntryKind::Node,
                        &next_id.0,
                    ));
                }
            }

            for choice_id in &node.choice_ids {
                let Some(choice) = choices.find(choice_id) else {
                    findings.push(dangling(
                        Referrer::Node(node_id.clone()),
                        EntryKind::Choice,
                        &choice_id.0,
                    ));
                    continue;
                };
                reached.choices.insert(choice_id);

                if !checked_choices.insert(choice_id) {
                    continue;
                }
                if let Some(next_id) = &choice.next_id {
                    if nodes.has(next_id) {
                        if visited.insert(next_id) {
                            queue.push_back(next_id);
                        }
                    } else {
                        findings.push(dangling(
                            Referrer::Choice(choice_id.clone()),
                            EntryKind::Node,
                            &next_id.0,
                        ));
                    }
                }
            }
        }

        for cycle in auto_advance_cycles(library, &order) {
            findings.push(Finding::AutoAdvanceCycle {
                tree: tree_id.clone(),
                nodes: cycle,
            });
        }

        debug!(tree = %tree_id, nodes = order.len(), "Tree traversed");
    }
}

/// Cycles reachable from `starts` that consist only of `next_id` links on
/// non-branching nodes. Each cycle is rotated to begin at its smallest id and
/// reported once.
fn auto_advance_cycles(library: &DialogLibrary, starts: &[&NodeId]) -> Vec<Vec<NodeId>> {
    let nodes = library.nodes();
    let mut seen: BTreeSet<Vec<NodeId>> = BTreeSet::new();
    let mut cycles = Vec::new();

    for start in starts {
        let mut path: Vec<&NodeId> = Vec::new();
        let mut current = *start;

        loop {
            if let Some(position) = path.iter().position(|id| *id == current) {
                let mut cycle: Vec<NodeId> = path[position..].iter().map(|id| (*id).clone()).collect();
                if let Some(smallest) = (0..cycle.len()).min_by_key(|&i| &cycle[i]) {
                    cycle.rotate_left(smallest);
                }
                if seen.insert(cycle.clone()) {
                    cycles.push(cycle);
                }
                break;
            }
            path.push(current);

            let next = nodes
                .find(current)
                .filter(|node| !node.is_branching())
                .and_then(|node| node.next_id.as_ref())
                .filter(|next_id| nodes.has(*next_id));
            match next {
                Some(next_id) => current = next_id,
                None => break,
            }
        }
    }

    cycles
}
