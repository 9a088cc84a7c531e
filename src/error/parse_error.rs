use thiserror::Error;

/// Raised by the grammar module's `parse` when the input text does not
/// conform to the TChecker system-declaration grammar.
#[derive(Debug, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
  pub line: usize,
  pub column: usize,
  pub message: String,
}
