//! Error model (C7): one small struct per error kind, in the teacher's
//! own `src/error/` layout, aggregated into a single [`MutateError`] that
//! every fallible entry point in the crate returns.

mod check_error;
mod node_not_found;
mod parse_error;
mod unknown_operator;

pub use check_error::CheckError;
pub use node_not_found::NodeNotFoundError;
pub use parse_error::ParseError;
pub use unknown_operator::UnknownOperatorError;

use thiserror::Error;

/// The crate-wide error type. Every variant but [`MutateError::Check`]
/// (§7 kind 3/4, handled locally by the driver and never propagated)
/// terminates the run when it escapes `main`.
#[derive(Debug, Error)]
pub enum MutateError {
  #[error(transparent)]
  NodeNotFound(#[from] NodeNotFoundError),
  #[error(transparent)]
  UnknownOperator(#[from] UnknownOperatorError),
  #[error(transparent)]
  Parse(#[from] ParseError),
  #[error(transparent)]
  Check(#[from] CheckError),
  #[error("input file {path}: {source}")]
  Io { path: std::path::PathBuf, #[source] source: std::io::Error },
  #[error(transparent)]
  Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MutateError>;
