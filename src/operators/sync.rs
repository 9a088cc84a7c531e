//! Synchronisation mutation operators (§4.3): `add_sync`,
//! `add_sync_constraint`, `change_sync_event`, `invert_sync_weakness`,
//! `remove_sync`, `remove_sync_constraint`.

use crate::ast::{Node, RuleKind};

use super::util::{append_declaration, occurrence_among, splice, splice_remove};

fn build_sync_constraints(constraints: &[Node]) -> Node {
  let mut children = Vec::new();
  for (i, c) in constraints.iter().enumerate() {
    if i > 0 {
      children.push(Node::sym(":"));
    }
    children.push(c.clone());
  }
  Node::internal(RuleKind::SyncConstraints, children)
}

/// Recursive enumeration in process order (§4.3): at each process, either
/// skip it or add one constraint for each possible event, extending the
/// partial constraint list built so far.
fn enumerate_syncs(processes: &[Node], events: &[Node], idx: usize, partial: Vec<Node>, out: &mut Vec<Vec<Node>>) {
  if idx == processes.len() {
    if partial.len() >= 2 {
      out.push(partial);
    }
    return;
  }
  enumerate_syncs(processes, events, idx + 1, partial.clone(), out);
  for event in events {
    let mut extended = partial.clone();
    extended.push(Node::internal(RuleKind::SyncConstraint, vec![
      processes[idx].clone(),
      Node::sym("@"),
      event.clone(),
    ]));
    enumerate_syncs(processes, events, idx + 1, extended, out);
  }
}

pub fn add_sync(tree: &Node) -> Vec<Node> {
  let processes: Vec<Node> =
    tree.find_kind(RuleKind::ProcessDeclaration).into_iter().map(|p| p.children()[2].clone()).collect();
  let events: Vec<Node> =
    tree.find_kind(RuleKind::EventDeclaration).into_iter().map(|e| e.children()[2].clone()).collect();
  let existing: Vec<Node> =
    tree.find_kind(RuleKind::SyncDeclaration).into_iter().map(|s| s.sync_constraints().clone()).collect();

  let mut candidates = Vec::new();
  enumerate_syncs(&processes, &events, 0, Vec::new(), &mut candidates);

  let mut out = Vec::new();
  for constraints in candidates {
    let sync_constraints_node = build_sync_constraints(&constraints);
    if existing.iter().any(|e| *e == sync_constraints_node) {
      continue;
    }
    let sync_decl =
      Node::internal(RuleKind::SyncDeclaration, vec![Node::keyword("sync"), Node::sym(":"), sync_constraints_node]);
    out.push(append_declaration(tree, sync_decl));
  }
  out
}

pub fn add_sync_constraint(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let processes: Vec<Node> =
    tree.find_kind(RuleKind::ProcessDeclaration).into_iter().map(|p| p.children()[2].clone()).collect();
  let events: Vec<Node> =
    tree.find_kind(RuleKind::EventDeclaration).into_iter().map(|e| e.children()[2].clone()).collect();
  let syncs = tree.find_kind(RuleKind::SyncDeclaration);
  for (i, sync) in syncs.iter().enumerate() {
    let occurrence = occurrence_among(&syncs, i);
    let existing_processes: Vec<Node> =
      sync.sync_constraints().sync_constraint_list().into_iter().map(|c| c.sync_constraint_process().clone()).collect();
    for process in &processes {
      if existing_processes.contains(process) {
        continue;
      }
      for event in &events {
        let new_constraint =
          Node::internal(RuleKind::SyncConstraint, vec![process.clone(), Node::sym("@"), event.clone()]);
        let old_list = sync.sync_constraints();
        let mut children = old_list.children().to_vec();
        children.push(Node::sym(":"));
        children.push(new_constraint);
        let new_list = Node::internal(RuleKind::SyncConstraints, children);
        let new_sync =
          Node::internal(RuleKind::SyncDeclaration, vec![sync.children()[0].clone(), sync.children()[1].clone(), new_list]);
        out.push(splice(tree, sync, &new_sync, occurrence));
      }
    }
  }
  out
}

fn replace_sync_constraint(list: &Node, idx: usize, new_item: Node) -> Node {
  let mut children = list.children().to_vec();
  children[idx * 2] = new_item;
  Node::internal(RuleKind::SyncConstraints, children)
}

pub fn change_sync_event(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let events: Vec<Node> =
    tree.find_kind(RuleKind::EventDeclaration).into_iter().map(|e| e.children()[2].clone()).collect();
  let syncs = tree.find_kind(RuleKind::SyncDeclaration);
  for (i, sync) in syncs.iter().enumerate() {
    let occurrence = occurrence_among(&syncs, i);
    let constraints = sync.sync_constraints().sync_constraint_list();
    for (cidx, constraint) in constraints.iter().enumerate() {
      let current_event = constraint.sync_constraint_event().clone();
      for event in &events {
        if *event == current_event {
          continue;
        }
        let mut new_constraint_children = constraint.children().to_vec();
        new_constraint_children[2] = event.clone();
        let new_constraint = Node::internal(RuleKind::SyncConstraint, new_constraint_children);
        let new_list = replace_sync_constraint(sync.sync_constraints(), cidx, new_constraint);
        let new_sync =
          Node::internal(RuleKind::SyncDeclaration, vec![sync.children()[0].clone(), sync.children()[1].clone(), new_list]);
        out.push(splice(tree, sync, &new_sync, occurrence));
      }
    }
  }
  out
}

pub fn invert_sync_weakness(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let syncs = tree.find_kind(RuleKind::SyncDeclaration);
  for (i, sync) in syncs.iter().enumerate() {
    let occurrence = occurrence_among(&syncs, i);
    let constraints = sync.sync_constraints().sync_constraint_list();
    for (cidx, constraint) in constraints.iter().enumerate() {
      let mut children = constraint.children().to_vec();
      if constraint.sync_constraint_is_weak() {
        children.pop();
      } else {
        children.push(Node::sym("?"));
      }
      let new_constraint = Node::internal(RuleKind::SyncConstraint, children);
      let new_list = replace_sync_constraint(sync.sync_constraints(), cidx, new_constraint);
      let new_sync =
        Node::internal(RuleKind::SyncDeclaration, vec![sync.children()[0].clone(), sync.children()[1].clone(), new_list]);
      out.push(splice(tree, sync, &new_sync, occurrence));
    }
  }
  out
}

pub fn remove_sync(tree: &Node) -> Vec<Node> {
  let syncs = tree.find_kind(RuleKind::SyncDeclaration);
  syncs.iter().enumerate().map(|(i, s)| splice_remove(tree, s, occurrence_among(&syncs, i))).collect()
}

pub fn remove_sync_constraint(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let syncs = tree.find_kind(RuleKind::SyncDeclaration);
  for (i, sync) in syncs.iter().enumerate() {
    let occurrence = occurrence_among(&syncs, i);
    let list = sync.sync_constraints();
    let constraints = list.sync_constraint_list();
    if constraints.len() < 2 {
      continue;
    }
    for cidx in 0..constraints.len() {
      let mut children = list.children().to_vec();
      if cidx == 0 {
        children.drain(0..2);
      } else {
        let pos = cidx * 2;
        children.drain(pos - 1..=pos);
      }
      let new_list = Node::internal(RuleKind::SyncConstraints, children);
      let new_sync =
        Node::internal(RuleKind::SyncDeclaration, vec![sync.children()[0].clone(), sync.children()[1].clone(), new_list]);
      out.push(splice(tree, sync, &new_sync, occurrence));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::parse;

  #[test]
  fn add_sync_enumerates_two_constraint_syncs_only() {
    let tree = parse(
      "system:sys\nevent:a\nevent:b\nprocess:P1\nprocess:P2\nlocation:P1:L0{initial:}\nlocation:P2:M0{initial:}\n",
    )
    .unwrap();
    let mutants = add_sync(&tree);
    assert_eq!(mutants.len(), 4);
  }

  #[test]
  fn add_sync_skips_already_present_candidate() {
    let tree = parse(
      "system:sys\nevent:a\nevent:b\nprocess:P1\nprocess:P2\nlocation:P1:L0{initial:}\nlocation:P2:M0{initial:}\nsync:P1@a:P2@a\n",
    )
    .unwrap();
    let mutants = add_sync(&tree);
    assert_eq!(mutants.len(), 3);
  }

  #[test]
  fn remove_sync_constraint_requires_at_least_two() {
    let tree = parse("system:sys\nevent:a\nprocess:P1\nprocess:P2\nsync:P1@a:P2@a\n").unwrap();
    let mutants = remove_sync_constraint(&tree);
    assert_eq!(mutants.len(), 2);
    for mutant in &mutants {
      let syncs = mutant.find_kind(RuleKind::SyncDeclaration);
      assert_eq!(syncs[0].sync_constraints().sync_constraint_list().len(), 1);
    }
  }

  #[test]
  fn invert_sync_weakness_toggles_each_constraint() {
    let tree = parse("system:sys\nevent:a\nprocess:P1\nprocess:P2\nsync:P1@a?:P2@a\n").unwrap();
    let mutants = invert_sync_weakness(&tree);
    assert_eq!(mutants.len(), 2);
  }
}
