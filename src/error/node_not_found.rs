use thiserror::Error;

/// Raised by [`crate::edit::exchange`] / [`crate::edit::remove`] when the
/// requested occurrence of a node is not present anywhere in the subject
/// tree. This is a programmer error (§7 kind 1): it terminates the run.
#[derive(Debug, Error)]
#[error("tree does not contain the node to be {action} (occurrence {occurrence})")]
pub struct NodeNotFoundError {
  pub action: &'static str,
  pub occurrence: usize,
}
