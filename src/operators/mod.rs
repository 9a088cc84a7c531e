//! Mutation operators (C5): the 21 enumerators of §4.3, dispatched by
//! name. Each operator returns the complete enumeration of its
//! mutations; [`apply`] filters out any mutant structurally identical to
//! the original, per "duplicates identical to the original are skipped".

mod attribute;
mod structure;
mod sync;
mod util;

use crate::ast::Node;
use crate::error::UnknownOperatorError;

/// The 21 operator names, in the order the driver's `all` dispatch walks
/// them (§4.4).
pub const OPERATOR_NAMES: [&str; 21] = [
  "change_event",
  "change_constraint_cmp",
  "change_constraint_clock",
  "decrease_constraint_constant",
  "increase_constraint_constant",
  "invert_reset",
  "invert_committed_location",
  "invert_urgent_location",
  "negate_guard",
  "add_location",
  "add_transition",
  "change_transition_source",
  "change_transition_target",
  "remove_location",
  "remove_transition",
  "add_sync",
  "add_sync_constraint",
  "change_sync_event",
  "invert_sync_weakness",
  "remove_sync",
  "remove_sync_constraint",
];

/// Apply the named operator to `tree`, with `val` feeding the two
/// constraint-constant operators (§6 `--val`; ignored by every other
/// operator).
pub fn apply(name: &str, tree: &Node, val: u32) -> Result<Vec<Node>, UnknownOperatorError> {
  let mutants = match name {
    "change_event" => attribute::change_event(tree),
    "change_constraint_cmp" => attribute::change_constraint_cmp(tree),
    "change_constraint_clock" => attribute::change_constraint_clock(tree),
    "decrease_constraint_constant" => attribute::decrease_constraint_constant(tree, val),
    "increase_constraint_constant" => attribute::increase_constraint_constant(tree, val),
    "invert_reset" => attribute::invert_reset(tree),
    "invert_committed_location" => attribute::invert_committed_location(tree),
    "invert_urgent_location" => attribute::invert_urgent_location(tree),
    "negate_guard" => attribute::negate_guard(tree),
    "add_location" => structure::add_location(tree),
    "add_transition" => structure::add_transition(tree),
    "change_transition_source" => structure::change_transition_source(tree),
    "change_transition_target" => structure::change_transition_target(tree),
    "remove_location" => structure::remove_location(tree),
    "remove_transition" => structure::remove_transition(tree),
    "add_sync" => sync::add_sync(tree),
    "add_sync_constraint" => sync::add_sync_constraint(tree),
    "change_sync_event" => sync::change_sync_event(tree),
    "invert_sync_weakness" => sync::invert_sync_weakness(tree),
    "remove_sync" => sync::remove_sync(tree),
    "remove_sync_constraint" => sync::remove_sync_constraint(tree),
    other => return Err(UnknownOperatorError(other.to_string())),
  };
  Ok(mutants.into_iter().filter(|m| m != tree).collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::parse;

  #[test]
  fn apply_rejects_unknown_operator() {
    let tree =
      parse("system:sys\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n").unwrap();
    assert!(apply("not_a_real_operator", &tree, 1).is_err());
  }

  #[test]
  fn apply_dispatches_every_known_operator_without_panicking() {
    let tree = parse(
      "system:sys\nclock:1:x\nevent:a\nevent:b\nprocess:P1\nprocess:P2\nlocation:P1:L0{initial:}\nlocation:P1:L1\nlocation:P2:M0{initial:}\nedge:P1:L0:L1:a{provided:x<=5:do:x=0}\nsync:P1@a:P2@a\n",
    )
    .unwrap();
    for name in OPERATOR_NAMES {
      apply(name, &tree, 1).unwrap_or_else(|e| panic!("{name} failed: {e}"));
    }
  }
}
