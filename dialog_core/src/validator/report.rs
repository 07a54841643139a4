//! Validation findings and the aggregated report.

use dialog_content::{EntryKind, NodeId, TreeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Referrer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single problem found in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finding {
    /// A link that does not resolve in its registry.
    DanglingReference {
        tree: TreeId,
        referrer: Referrer,
        missing_kind: EntryKind,
        missing: String,
    },

    /// A node that offers choices and also names a `next_id`.
    ConflictingSuccessor { tree: TreeId, node: NodeId },

    /// Nodes linked only by `next_id` in a loop; advancing would never end.
    AutoAdvanceCycle { tree: TreeId, nodes: Vec<NodeId> },

    /// A record no tree can reach.
    UnreachableContent { kind: EntryKind, id: String },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::UnreachableContent { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The tree the finding was discovered in, if any.
    pub fn tree(&self) -> Option<&TreeId> {
        match self {
            Finding::DanglingReference { tree, .. }
            | Finding::ConflictingSuccessor { tree, .. }
            | Finding::AutoAdvanceCycle { tree, .. } => Some(tree),
            Finding::UnreachableContent { .. } => None,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.severity())?;
        match self {
            Finding::DanglingReference {
                tree,
                referrer,
                missing_kind,
                missing,
            } => write!(
                f,
                "tree '{}': {} references missing {} '{}'",
                tree, referrer, missing_kind, missing
            ),
            Finding::ConflictingSuccessor { tree, node } => write!(
                f,
                "tree '{}': node '{}' offers choices and also has a next_id",
                tree, node
            ),
            Finding::AutoAdvanceCycle { tree, nodes } => {
                let path: Vec<&str> = nodes.iter().map(|n| n.0.as_str()).collect();
                write!(
                    f,
                    "tree '{}': nodes loop without player input: {} -> {}",
                    tree,
                    path.join(" -> "),
                    path.first().copied().unwrap_or_default()
                )
            }
            Finding::UnreachableContent { kind, id } => {
                write!(f, "{} '{}' is not reachable from any tree", kind, id)
            }
        }
    }
}

/// Every finding from one validation run, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
    /// Treat warnings as failures.
    deny_warnings: bool,
}

impl ValidationReport {
    pub(crate) fn new(findings: Vec<Finding>, deny_warnings: bool) -> Self {
        Self {
            findings,
            deny_warnings,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether content with this report may ship.
    pub fn is_passing(&self) -> bool {
        !self.has_errors() && !(self.deny_warnings && self.warning_count() > 0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )
    }

    /// Fail if the report does not pass.
    pub fn into_result(self) -> Result<ValidationReport, ValidationFailed> {
        if self.is_passing() {
            Ok(self)
        } else {
            Err(ValidationFailed { report: self })
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        write!(f, "{}", self.summary())
    }
}

/// Content failed validation and must not ship.
#[derive(Error, Debug)]
#[error("content validation failed: {}", .report.summary())]
pub struct ValidationFailed {
    pub report: ValidationReport,
}
