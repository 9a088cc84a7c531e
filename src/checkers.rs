//! External decision procedures (§6): `checkSyntax`, `checkReachability`,
//! `checkBisimilarity`. Treated as opaque services per `spec.md` §1/§6 --
//! this module only ever shells out to them, never re-implements TChecker
//! semantics.
//!
//! [`Checkers`] is the trait the driver depends on; [`ExternalCheckers`] is
//! the one concrete implementation, locating `tck-syntax`/`tck-reach`/
//! `tck-compare` on `$PATH` (or wherever `--tck-*-bin` points) and
//! invoking them as subprocesses over scratch files, the same
//! pluggable-backend shape the teacher uses for its own external-resource
//! trait objects (`src/virt_fs/`): one trait, one concrete loader.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use crate::error::CheckError;

pub trait Checkers {
  fn check_syntax(&self, ta: &str) -> Result<(), CheckError>;
  /// Ok iff reachability holds; `Err` iff TChecker raised, i.e. the
  /// subject is semantically faulty (§7 kind 3).
  fn check_reachability(&self, ta: &str) -> Result<(), CheckError>;
  fn check_bisimilarity(&self, first: &str, second: &str) -> Result<bool, CheckError>;
}

/// Shells out to the real TChecker command-line tools.
pub struct ExternalCheckers {
  pub tck_syntax_bin: PathBuf,
  pub tck_reach_bin: PathBuf,
  pub tck_compare_bin: PathBuf,
}

impl ExternalCheckers {
  /// Resolve binaries from `$TCK_SYNTAX_BIN`/`$TCK_REACH_BIN`/
  /// `$TCK_COMPARE_BIN`, falling back to the bare executable names on
  /// `$PATH`.
  pub fn from_env() -> Self {
    let lookup = |var: &str, default: &str| {
      std::env::var_os(var).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(default))
    };
    ExternalCheckers {
      tck_syntax_bin: lookup("TCK_SYNTAX_BIN", "tck-syntax"),
      tck_reach_bin: lookup("TCK_REACH_BIN", "tck-reach"),
      tck_compare_bin: lookup("TCK_COMPARE_BIN", "tck-compare"),
    }
  }

  fn scratch_file(ta: &str) -> Result<tempfile::NamedTempFile, CheckError> {
    let mut file =
      tempfile::Builder::new().suffix(".tck").tempfile().map_err(|e| {
        CheckError::SyntaxInvalid(format!("could not create scratch file: {e}"))
      })?;
    file.write_all(ta.as_bytes()).map_err(|e| {
      CheckError::SyntaxInvalid(format!("could not write scratch file: {e}"))
    })?;
    Ok(file)
  }
}

impl Checkers for ExternalCheckers {
  fn check_syntax(&self, ta: &str) -> Result<(), CheckError> {
    let file = Self::scratch_file(ta)?;
    let output = Command::new(&self.tck_syntax_bin)
      .arg(file.path())
      .output()
      .map_err(|e| CheckError::SyntaxInvalid(format!("failed to run tck-syntax: {e}")))?;
    if output.status.success() {
      Ok(())
    } else {
      Err(CheckError::SyntaxInvalid(String::from_utf8_lossy(&output.stderr).into_owned()))
    }
  }

  fn check_reachability(&self, ta: &str) -> Result<(), CheckError> {
    let file = Self::scratch_file(ta)?;
    let output = Command::new(&self.tck_reach_bin)
      .args(["-a", "reach"])
      .arg(file.path())
      .output()
      .map_err(|e| CheckError::Reachability(format!("failed to run tck-reach: {e}")))?;
    if output.status.success() {
      Ok(())
    } else {
      Err(CheckError::Reachability(String::from_utf8_lossy(&output.stderr).into_owned()))
    }
  }

  fn check_bisimilarity(&self, first: &str, second: &str) -> Result<bool, CheckError> {
    let a = Self::scratch_file(first)?;
    let b = Self::scratch_file(second)?;
    let output = Command::new(&self.tck_compare_bin)
      .args(["-r", "bisimulation-strong"])
      .arg(a.path())
      .arg(b.path())
      .output()
      .map_err(|e| CheckError::Reachability(format!("failed to run tck-compare: {e}")))?;
    if !output.status.success() {
      return Err(CheckError::Reachability(String::from_utf8_lossy(&output.stderr).into_owned()));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().any(|l| l.trim().eq_ignore_ascii_case("true")))
  }
}

/// An in-memory stand-in used by the driver's tests so they do not
/// depend on the real TChecker binaries being installed.
#[cfg(test)]
pub(crate) struct FakeCheckers {
  pub reject_reachability: Vec<String>,
  pub bisimilar_to: Vec<String>,
}

#[cfg(test)]
impl Checkers for FakeCheckers {
  fn check_syntax(&self, _ta: &str) -> Result<(), CheckError> {
    Ok(())
  }

  fn check_reachability(&self, ta: &str) -> Result<(), CheckError> {
    if self.reject_reachability.iter().any(|s| s == ta) {
      Err(CheckError::Reachability("rejected by fake checker".into()))
    } else {
      Ok(())
    }
  }

  fn check_bisimilarity(&self, _first: &str, second: &str) -> Result<bool, CheckError> {
    Ok(self.bisimilar_to.iter().any(|s| s == second))
  }
}
