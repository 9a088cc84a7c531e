//! The driver (C6): the small orchestrator of §4.4. Reads one input file,
//! asserts it is syntactically valid, normalizes it, dispatches the chosen
//! operator (or every operator, under `"all"`), and for each mutant writes
//! a candidate file, runs the reachability and bisimilarity self-checks,
//! and files the result away.
//!
//! Nothing here re-implements TChecker semantics; every semantic question
//! is delegated to the [`crate::checkers::Checkers`] the caller supplies.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{debug, debug_span, info, info_span, warn};

use crate::checkers::Checkers;
use crate::error::{MutateError, Result};
use crate::grammar::{parse, reconstruct};
use crate::operators::{self, OPERATOR_NAMES};
use crate::transform::simplify;

/// Set form of [`OPERATOR_NAMES`], built once, for `operator_list`'s
/// membership check.
static KNOWN_OPERATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| OPERATOR_NAMES.iter().copied().collect());

const BISIMILAR_DIR: &str = "bisimilar_mutations";
const CSV_NAME: &str = "bisimilarity_log.csv";
const CSV_HEADER: [&str; 2] = ["mutation", "result of bisimilarity check"];

/// Per-operator tally, rolled up into the summary `run` returns.
#[derive(Debug, Default, Clone)]
pub struct OperatorCounts {
  pub operator: String,
  pub candidates: usize,
  pub kept: usize,
  pub bisimilar: usize,
  pub rejected: usize,
}

/// What one invocation of the driver produced, for the CLI to report.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
  pub per_operator: Vec<OperatorCounts>,
}

impl RunSummary {
  pub fn total_kept(&self) -> usize {
    self.per_operator.iter().map(|o| o.kept).sum()
  }

  pub fn total_bisimilar(&self) -> usize {
    self.per_operator.iter().map(|o| o.bisimilar).sum()
  }
}

fn read_ta(path: &Path) -> Result<String> {
  fs::read_to_string(path).map_err(|e| MutateError::Io { path: path.to_path_buf(), source: e })
}

fn operator_list(op: &str) -> Result<Vec<String>> {
  if op == "all" {
    return Ok(OPERATOR_NAMES.iter().map(|s| s.to_string()).collect());
  }
  if !KNOWN_OPERATORS.contains(op) {
    return Err(MutateError::UnknownOperator(crate::error::UnknownOperatorError(op.to_string())));
  }
  Ok(vec![op.to_string()])
}

/// Run the mutation pipeline of §4.4.
///
/// `in_ta` is read and must pass `checkers.check_syntax` (§7 kind 2,
/// terminating). `op` is either one of [`OPERATOR_NAMES`] or `"all"`. `val`
/// feeds the two constraint-constant operators; every other operator
/// ignores it.
pub fn run<C: Checkers>(in_ta: &Path, out_dir: &Path, op: &str, val: u32, checkers: &C) -> Result<RunSummary> {
  let names = operator_list(op)?;

  let text = read_ta(in_ta)?;
  info_span!("check_input_syntax", file = %in_ta.display()).in_scope(|| checkers.check_syntax(&text))?;

  let tree = info_span!("parse", file = %in_ta.display()).in_scope(|| parse(&text))?;
  let tree = info_span!("simplify").in_scope(|| simplify(&tree));

  let bisimilar_dir = out_dir.join(BISIMILAR_DIR);
  fs::create_dir_all(&bisimilar_dir).map_err(|e| MutateError::Io { path: bisimilar_dir.clone(), source: e })?;
  let csv_path = bisimilar_dir.join(CSV_NAME);
  let mut csv_writer = csv::Writer::from_path(&csv_path)?;
  csv_writer.write_record(CSV_HEADER)?;

  let basename =
    in_ta.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "input".to_string());

  let mut summary = RunSummary::default();
  for name in names {
    let span = info_span!("operator", operator = %name);
    let _enter = span.enter();
    let mutants = operators::apply(&name, &tree, val)?;
    let mut counts = OperatorCounts { operator: name.clone(), candidates: mutants.len(), ..Default::default() };

    let mut index = 0usize;
    for mutant in &mutants {
      let mutant_text = reconstruct(mutant);
      let _span = debug_span!("mutant", index).entered();

      let filename = format!("{basename}_mutation_{name}_{index}.tck");
      let path = out_dir.join(&filename);
      fs::write(&path, &mutant_text).map_err(|e| MutateError::Io { path: path.clone(), source: e })?;

      if let Err(e) = checkers.check_syntax(&mutant_text) {
        debug!(%e, "dropping mutant: failed syntax self-check");
        let _ = fs::remove_file(&path);
        counts.rejected += 1;
        continue;
      }
      if let Err(e) = checkers.check_reachability(&mutant_text) {
        debug!(%e, "dropping mutant: reachability check raised");
        let _ = fs::remove_file(&path);
        counts.rejected += 1;
        continue;
      }

      let bisimilar = checkers.check_bisimilarity(&text, &mutant_text)?;
      csv_writer.write_record([filename.as_str(), if bisimilar { "true" } else { "false" }])?;
      if bisimilar {
        info!(mutant = %filename, "bisimilar to original, filing away");
        let dest = bisimilar_dir.join(&filename);
        fs::rename(&path, &dest).map_err(|e| MutateError::Io { path: dest, source: e })?;
        counts.bisimilar += 1;
      } else {
        counts.kept += 1;
      }
      index += 1;
    }
    info!(candidates = counts.candidates, kept = counts.kept, bisimilar = counts.bisimilar, rejected = counts.rejected, "operator done");
    summary.per_operator.push(counts);
  }

  csv_writer.flush().map_err(|e| MutateError::Io { path: csv_path, source: e })?;
  Ok(summary)
}

/// Warn (never error) when `--val` is given for an operator that ignores
/// it -- ported from `original_source/src/mutate.py`, which performs the
/// same non-fatal check.
pub fn warn_if_val_ignored(op: &str, val_given: bool) {
  const USES_VAL: [&str; 2] = ["decrease_constraint_constant", "increase_constraint_constant"];
  if val_given && op != "all" && !USES_VAL.contains(&op) {
    warn!(operator = %op, "--val has no effect on this operator");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::checkers::FakeCheckers;

  fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sample.tck");
    fs::write(
      &path,
      "system:sys\nevent:a\nevent:b\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n",
    )
    .unwrap();
    path
  }

  #[test]
  fn change_event_produces_exactly_one_mutant_file() {
    let scratch = tempfile::tempdir().unwrap();
    let in_ta = write_sample(scratch.path());
    let out_dir = scratch.path().join("out");
    let checkers = FakeCheckers { reject_reachability: vec![], bisimilar_to: vec![] };

    let summary = run(&in_ta, &out_dir, "change_event", 1, &checkers).unwrap();
    assert_eq!(summary.total_kept(), 1);
    assert_eq!(summary.total_bisimilar(), 0);
    let entries: Vec<_> = fs::read_dir(&out_dir).unwrap().filter_map(|e| e.ok()).collect();
    let tck_files: Vec<_> =
      entries.iter().filter(|e| e.path().extension().is_some_and(|e| e == "tck")).collect();
    assert_eq!(tck_files.len(), 1);
    assert!(out_dir.join(BISIMILAR_DIR).join(CSV_NAME).exists());
  }

  /// The text `reconstruct` produces for the one `change_event` mutant of
  /// [`write_sample`] -- computed via the same `parse`/`simplify`/`apply`/
  /// `reconstruct` pipeline the driver itself runs, since `reconstruct`'s
  /// output never contains the source's original whitespace.
  fn the_one_change_event_mutant_text() -> String {
    let tree = simplify(&parse(
      "system:sys\nevent:a\nevent:b\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n",
    )
    .unwrap());
    let mutants = operators::apply("change_event", &tree, 1).unwrap();
    assert_eq!(mutants.len(), 1);
    reconstruct(&mutants[0])
  }

  #[test]
  fn rejected_mutant_is_removed_and_index_compacts() {
    let scratch = tempfile::tempdir().unwrap();
    let in_ta = write_sample(scratch.path());
    let out_dir = scratch.path().join("out");
    let rejected_text = the_one_change_event_mutant_text();
    let checkers = FakeCheckers { reject_reachability: vec![rejected_text], bisimilar_to: vec![] };

    let summary = run(&in_ta, &out_dir, "change_event", 1, &checkers).unwrap();
    assert_eq!(summary.total_kept(), 0);
    assert_eq!(summary.per_operator[0].rejected, 1);
    let tck_files: Vec<_> = fs::read_dir(&out_dir)
      .unwrap()
      .filter_map(|e| e.ok())
      .filter(|e| e.path().extension().is_some_and(|e| e == "tck"))
      .collect();
    assert!(tck_files.is_empty());
  }

  #[test]
  fn bisimilar_mutant_is_moved_and_logged() {
    let scratch = tempfile::tempdir().unwrap();
    let in_ta = write_sample(scratch.path());
    let out_dir = scratch.path().join("out");
    let bisimilar_text = the_one_change_event_mutant_text();
    let checkers = FakeCheckers { reject_reachability: vec![], bisimilar_to: vec![bisimilar_text] };

    let summary = run(&in_ta, &out_dir, "change_event", 1, &checkers).unwrap();
    assert_eq!(summary.total_kept(), 0);
    assert_eq!(summary.total_bisimilar(), 1);
    let moved: Vec<_> = fs::read_dir(out_dir.join(BISIMILAR_DIR))
      .unwrap()
      .filter_map(|e| e.ok())
      .filter(|e| e.path().extension().is_some_and(|e| e == "tck"))
      .collect();
    assert_eq!(moved.len(), 1);
    let csv_contents = fs::read_to_string(out_dir.join(BISIMILAR_DIR).join(CSV_NAME)).unwrap();
    assert_eq!(csv_contents.lines().count(), 2);
  }

  #[test]
  fn unknown_operator_is_rejected_before_touching_the_filesystem() {
    let scratch = tempfile::tempdir().unwrap();
    let in_ta = write_sample(scratch.path());
    let out_dir = scratch.path().join("out");
    let checkers = FakeCheckers { reject_reachability: vec![], bisimilar_to: vec![] };
    assert!(run(&in_ta, &out_dir, "not_an_operator", 1, &checkers).is_err());
    assert!(!out_dir.exists());
  }

  #[test]
  fn all_runs_every_operator() {
    let scratch = tempfile::tempdir().unwrap();
    let in_ta = write_sample(scratch.path());
    let out_dir = scratch.path().join("out");
    let checkers = FakeCheckers { reject_reachability: vec![], bisimilar_to: vec![] };
    let summary = run(&in_ta, &out_dir, "all", 1, &checkers).unwrap();
    assert_eq!(summary.per_operator.len(), OPERATOR_NAMES.len());
  }
}
