use thiserror::Error;

/// Raised when the CLI is given an operator name outside the 21 known
/// operators (and `all`). Programmer/usage error (§7 kind 1): terminates.
#[derive(Debug, Error)]
#[error("unknown mutation operator {0:?}")]
pub struct UnknownOperatorError(pub String);
