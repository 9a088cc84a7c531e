use thiserror::Error;

/// The outcome of the two self-check external decision procedures
/// (§6/§7). `SyntaxInvalid` is a hard failure (§7 kind 2, terminates);
/// `Reachability` is a per-mutant rejection (§7 kind 3, the driver
/// discards that one mutant and continues).
#[derive(Debug, Error)]
pub enum CheckError {
  #[error("mutant failed the syntax self-check: {0}")]
  SyntaxInvalid(String),
  #[error("mutant is semantically faulty (reachability check raised): {0}")]
  Reachability(String),
}
