//! Structure-level mutation operators (§4.3): `add_location`,
//! `add_transition`, `change_transition_source`/`change_transition_target`,
//! `remove_location`, `remove_transition`.

use std::collections::HashSet;

use itertools::Itertools;

use crate::ast::query;
use crate::ast::{Node, RuleKind};

use super::util::{insert_after, occurrence_among, splice, splice_remove};

/// A location name not already used anywhere in `tree`: `new_loc`,
/// `new_loc_0`, `new_loc_1`, ... (§4.3 `add_location`).
fn fresh_location_name(tree: &Node) -> String {
  let used: HashSet<&str> = tree
    .find_kind(RuleKind::LocationDeclaration)
    .into_iter()
    .filter_map(|l| query::ident_text(l.location_id()))
    .collect();
  if !used.contains("new_loc") {
    return "new_loc".to_string();
  }
  let mut i = 0u64;
  loop {
    let candidate = format!("new_loc_{i}");
    if !used.contains(candidate.as_str()) {
      return candidate;
    }
    i += 1;
  }
}

pub fn add_location(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let processes = tree.find_kind(RuleKind::ProcessDeclaration);
  for (i, process) in processes.iter().enumerate() {
    let occurrence = occurrence_among(&processes, i);
    let process_id = process.children()[2].clone();
    let new_loc_name = fresh_location_name(tree);
    let new_location = Node::internal(RuleKind::LocationDeclaration, vec![
      Node::keyword("location"),
      Node::sym(":"),
      process_id.clone(),
      Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident(new_loc_name.clone())]),
    ]);
    let tree_with_location = insert_after(tree, process, &new_location, occurrence);

    let all_edges = tree.find_kind(RuleKind::EdgeDeclaration);
    for (j, edge) in all_edges.iter().enumerate() {
      if *edge.edge_process() != process_id {
        continue;
      }
      let edge_occurrence = occurrence_among(&all_edges, j);
      let mut children = edge.children().to_vec();
      children[6] = Node::internal(RuleKind::Id, vec![Node::ident(new_loc_name.clone())]);
      let new_edge = Node::internal(RuleKind::EdgeDeclaration, children);
      out.push(splice(&tree_with_location, edge, &new_edge, edge_occurrence));
    }
  }
  out
}

pub fn add_transition(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let Some(template) = tree.find_kind(RuleKind::EdgeDeclaration).into_iter().next().cloned() else {
    return out;
  };
  for process in tree.find_kind(RuleKind::ProcessDeclaration) {
    let process_id = process.children()[2].clone();
    let locations: Vec<Node> = tree
      .find_kind(RuleKind::LocationDeclaration)
      .into_iter()
      .filter(|l| l.children()[2] == process_id)
      .map(|l| l.children()[4].clone())
      .collect();
    for (source, target) in locations.iter().cartesian_product(locations.iter()) {
      let mut children = template.children().to_vec();
      children[2] = process_id.clone();
      children[4] = source.clone();
      children[6] = target.clone();
      let new_edge = Node::internal(RuleKind::EdgeDeclaration, children);
      if new_edge == template {
        continue;
      }
      out.push(super::util::append_declaration(tree, new_edge));
    }
  }
  out
}

fn change_transition_endpoint(tree: &Node, change_source: bool) -> Vec<Node> {
  let mut out = Vec::new();
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  for (i, edge) in edges.iter().enumerate() {
    let occurrence = occurrence_among(&edges, i);
    let process_id = edge.edge_process().clone();
    let current = if change_source { edge.edge_source() } else { edge.edge_target() };
    let candidates: Vec<Node> = tree
      .find_kind(RuleKind::LocationDeclaration)
      .into_iter()
      .filter(|l| l.children()[2] == process_id)
      .map(|l| l.children()[4].clone())
      .filter(|loc_id| loc_id != current)
      .collect();
    for candidate in candidates {
      let mut children = edge.children().to_vec();
      if change_source {
        children[4] = candidate;
      } else {
        children[6] = candidate;
      }
      let new_edge = Node::internal(RuleKind::EdgeDeclaration, children);
      out.push(splice(tree, edge, &new_edge, occurrence));
    }
  }
  out
}

/// Endpoints are addressed by direct index assignment on the cloned child
/// vector rather than `exchange` occurrence counting, per the design note
/// of §9 ("a cleaner design ... uses explicit field addressing ... drops
/// occurrence counting entirely"); the `source == target` ambiguity that
/// note calls out never arises here.
pub fn change_transition_source(tree: &Node) -> Vec<Node> {
  change_transition_endpoint(tree, true)
}

pub fn change_transition_target(tree: &Node) -> Vec<Node> {
  change_transition_endpoint(tree, false)
}

pub fn remove_location(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let locations = tree.find_kind(RuleKind::LocationDeclaration);
  for (i, location) in locations.iter().enumerate() {
    let occurrence = occurrence_among(&locations, i);
    let is_initial = location
      .location_attributes()
      .is_some_and(|a| query::find_attr(a, RuleKind::InitialAttribute).is_some());
    if is_initial {
      continue;
    }
    let process_id = location.children()[2].clone();
    let location_id = location.children()[4].clone();
    let mut mutant = splice_remove(tree, location, occurrence);
    loop {
      let edges = mutant.find_kind(RuleKind::EdgeDeclaration);
      let Some(edge) = edges.iter().find(|e| {
        *e.edge_process() == process_id && (*e.edge_source() == location_id || *e.edge_target() == location_id)
      }) else {
        break;
      };
      let edge = (*edge).clone();
      mutant = splice_remove(&mutant, &edge, 1);
    }
    out.push(mutant);
  }
  out
}

pub fn remove_transition(tree: &Node) -> Vec<Node> {
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  edges.iter().enumerate().map(|(i, e)| splice_remove(tree, e, occurrence_among(&edges, i))).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::parse;

  #[test]
  fn add_location_emits_one_mutant_per_edge_of_the_process() {
    let tree = sample_two_edges();
    let mutants = add_location(&tree);
    assert_eq!(mutants.len(), 2);
    for mutant in &mutants {
      assert_eq!(mutant.find_kind(RuleKind::LocationDeclaration).len(), 3);
    }
  }

  fn sample_two_edges() -> Node {
    parse(
      "system:sys\nevent:a\nevent:b\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\nedge:P:L1:L0:b\n",
    )
    .unwrap()
  }

  #[test]
  fn remove_transition_yields_one_mutant_per_edge() {
    let tree = sample_two_edges();
    let mutants = remove_transition(&tree);
    assert_eq!(mutants.len(), 2);
    for mutant in &mutants {
      assert_eq!(mutant.find_kind(RuleKind::EdgeDeclaration).len(), 1);
    }
  }

  #[test]
  fn remove_location_drops_location_and_incident_edges() {
    let tree = sample_two_edges();
    let mutants = remove_location(&tree);
    // only L1 is non-initial
    assert_eq!(mutants.len(), 1);
    let mutant = &mutants[0];
    assert_eq!(mutant.find_kind(RuleKind::LocationDeclaration).len(), 1);
    assert_eq!(mutant.find_kind(RuleKind::EdgeDeclaration).len(), 0);
  }

  #[test]
  fn change_transition_target_offers_every_other_location() {
    let tree = parse(
      "system:sys\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nlocation:P:L2\nedge:P:L0:L1:a\n",
    )
    .unwrap();
    let mutants = change_transition_target(&tree);
    assert_eq!(mutants.len(), 2);
  }
}
