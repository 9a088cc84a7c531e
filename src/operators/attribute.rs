//! Attribute-level mutation operators (§4.3): `change_event`,
//! `change_constraint_cmp`, `change_constraint_clock`,
//! `decrease_constraint_constant`/`increase_constraint_constant`,
//! `invert_reset`, `invert_committed_location`/`invert_urgent_location`,
//! `negate_guard`.

use crate::ast::query::{self, ClockId};
use crate::ast::{attrs as attr_list, Cmp, Node, RuleKind};
use crate::transform::{break_up_equals, combine_guards};

use super::util::{
  append_declaration, occurrence_among, replace_attr, splice, splice_remove, upsert_attr,
  with_edge_attrs, with_location_attrs,
};

pub fn change_event(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let events: Vec<Node> =
    tree.find_kind(RuleKind::EventDeclaration).into_iter().map(|e| e.children()[2].clone()).collect();
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  for (i, edge) in edges.iter().enumerate() {
    let occurrence = occurrence_among(&edges, i);
    let current = edge.edge_event();
    for event in &events {
      if event == current {
        continue;
      }
      let mut children = edge.children().to_vec();
      children[8] = event.clone();
      let new_edge = Node::internal(RuleKind::EdgeDeclaration, children);
      out.push(splice(tree, edge, &new_edge, occurrence));
    }
  }
  out
}

/// A guard or invariant expression together with enough context to splice
/// a replacement expression back into a fresh copy of the whole tree.
/// Keeping this as owned data (rather than a closure over borrows) avoids
/// threading lifetimes through every call site below.
struct ConstraintSite {
  expr: Node,
  kind: SiteKind,
}

enum SiteKind {
  Guard { edge: Node, occurrence: usize, attrs: Node, guard: Node },
  Invariant { location: Node, occurrence: usize, attrs: Node, invariant: Node },
}

impl ConstraintSite {
  fn rebuild(&self, tree: &Node, new_expr: Node) -> Node {
    match &self.kind {
      SiteKind::Guard { edge, occurrence, attrs, guard } => {
        let new_guard = Node::internal(RuleKind::ProvidedAttribute, vec![
          guard.children()[0].clone(),
          guard.children()[1].clone(),
          new_expr,
        ]);
        let new_attrs = replace_attr(attrs, guard, &new_guard);
        let new_edge = with_edge_attrs(edge, Some(new_attrs));
        splice(tree, edge, &new_edge, *occurrence)
      },
      SiteKind::Invariant { location, occurrence, attrs, invariant } => {
        let new_invariant = Node::internal(RuleKind::InvariantAttribute, vec![
          invariant.children()[0].clone(),
          invariant.children()[1].clone(),
          new_expr,
        ]);
        let new_attrs = replace_attr(attrs, invariant, &new_invariant);
        let new_location = with_location_attrs(location, Some(new_attrs));
        splice(tree, location, &new_location, *occurrence)
      },
    }
  }
}

fn constraint_sites(tree: &Node) -> Vec<ConstraintSite> {
  let mut sites = Vec::new();
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  for (i, edge) in edges.iter().enumerate() {
    let occurrence = occurrence_among(&edges, i);
    let Some(attrs) = edge.edge_attributes() else { continue };
    let Some(guard) = query::find_attr(attrs, RuleKind::ProvidedAttribute) else { continue };
    sites.push(ConstraintSite {
      expr: guard.children()[2].clone(),
      kind: SiteKind::Guard {
        edge: (*edge).clone(),
        occurrence,
        attrs: attrs.clone(),
        guard: guard.clone(),
      },
    });
  }
  let locations = tree.find_kind(RuleKind::LocationDeclaration);
  for (i, location) in locations.iter().enumerate() {
    let occurrence = occurrence_among(&locations, i);
    let Some(attrs) = location.location_attributes() else { continue };
    let Some(invariant) = query::find_attr(attrs, RuleKind::InvariantAttribute) else { continue };
    sites.push(ConstraintSite {
      expr: invariant.children()[2].clone(),
      kind: SiteKind::Invariant {
        location: (*location).clone(),
        occurrence,
        attrs: attrs.clone(),
        invariant: invariant.clone(),
      },
    });
  }
  sites
}

pub fn change_constraint_cmp(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  for site in constraint_sites(tree) {
    let atomics = query::atomic_exprs_in(&site.expr);
    for (i, atomic) in atomics.iter().enumerate() {
      if !query::is_clock_expr(tree, atomic) {
        continue;
      }
      let Some(constraint) = query::constraint_of(atomic) else { continue };
      let Some((lhs, cmp, rhs)) = query::constraint_parts(constraint) else { continue };
      let occurrence = occurrence_among(&atomics, i);
      for candidate in Cmp::CLOCK_LEGAL {
        if candidate == cmp {
          continue;
        }
        let new_constraint = Node::internal(
          constraint.kind().expect("constraint is an internal node"),
          vec![lhs.clone(), Node::cmp(candidate), rhs.clone()],
        );
        let new_atomic = Node::internal(RuleKind::AtomicExpr, vec![new_constraint]);
        let new_expr = splice(&site.expr, atomic, &new_atomic, occurrence);
        out.push(site.rebuild(tree, new_expr));
      }
    }
  }
  out
}

fn replace_clock_in_operand(operand: &Node, clock_node: &Node) -> Node {
  if query::is_diagonal_operand(operand) {
    let children = operand.children();
    let a = if query::is_clock_valued(&children[0]) { clock_node.clone() } else { children[0].clone() };
    let b = if query::is_clock_valued(&children[2]) { clock_node.clone() } else { children[2].clone() };
    Node::internal(RuleKind::IntTerm, vec![a, children[1].clone(), b])
  } else if query::is_clock_valued(operand) {
    Node::internal(RuleKind::IntTerm, vec![clock_node.clone()])
  } else {
    operand.clone()
  }
}

pub fn change_constraint_clock(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let clocks = query::get_all_clocks(tree);
  for site in constraint_sites(tree) {
    let atomics = query::atomic_exprs_in(&site.expr);
    for (i, atomic) in atomics.iter().enumerate() {
      if !query::is_clock_expr(tree, atomic) {
        continue;
      }
      let Some(constraint) = query::constraint_of(atomic) else { continue };
      let Some((lhs, cmp, rhs)) = query::constraint_parts(constraint) else { continue };
      let occurrence = occurrence_among(&atomics, i);
      for clock in &clocks {
        let clock_node = clock.canonical_node();
        let new_lhs = replace_clock_in_operand(lhs, &clock_node);
        let new_rhs = replace_clock_in_operand(rhs, &clock_node);
        if new_lhs == *lhs && new_rhs == *rhs {
          continue;
        }
        let new_constraint = Node::internal(
          constraint.kind().expect("constraint is an internal node"),
          vec![new_lhs, Node::cmp(cmp), new_rhs],
        );
        let new_atomic = Node::internal(RuleKind::AtomicExpr, vec![new_constraint]);
        let new_expr = splice(&site.expr, atomic, &new_atomic, occurrence);
        out.push(site.rebuild(tree, new_expr));
      }
    }
  }
  out
}

fn constraint_constant_delta(tree: &Node, v: u32, op: &'static str) -> Vec<Node> {
  let mut out = Vec::new();
  for site in constraint_sites(tree) {
    let atomics = query::atomic_exprs_in(&site.expr);
    for (i, atomic) in atomics.iter().enumerate() {
      if !query::is_clock_expr(tree, atomic) {
        continue;
      }
      let Some(constraint) = query::constraint_of(atomic) else { continue };
      let Some((lhs, cmp, rhs)) = query::constraint_parts(constraint) else { continue };
      let Some(constant) = query::constant_operand(constraint) else { continue };
      // Only a bare literal constant (`x ◇ k`) is mutated; an already
      // arithmetic or diagonal constant side is left untouched.
      if constant.children().len() != 1 || constant.children()[0].as_int_lit().is_none() {
        continue;
      }
      let new_operand = Node::internal(RuleKind::IntTerm, vec![
        constant.children()[0].clone(),
        Node::internal(RuleKind::Op, vec![Node::sym(op)]),
        Node::int_lit(v as i64),
      ]);
      let (new_lhs, new_rhs) =
        if constant == lhs { (new_operand, rhs.clone()) } else { (lhs.clone(), new_operand) };
      let new_constraint = Node::internal(
        constraint.kind().expect("constraint is an internal node"),
        vec![new_lhs, Node::cmp(cmp), new_rhs],
      );
      let new_atomic = Node::internal(RuleKind::AtomicExpr, vec![new_constraint]);
      let occurrence = occurrence_among(&atomics, i);
      let new_expr = splice(&site.expr, atomic, &new_atomic, occurrence);
      out.push(site.rebuild(tree, new_expr));
    }
  }
  out
}

pub fn decrease_constraint_constant(tree: &Node, v: u32) -> Vec<Node> {
  constraint_constant_delta(tree, v, "-")
}

pub fn increase_constraint_constant(tree: &Node, v: u32) -> Vec<Node> {
  constraint_constant_delta(tree, v, "+")
}

/// The index, within `do_attr`'s own child list, of the assignment that
/// resets `clock` to the literal `0`. Only literal-zero resets count.
fn zero_reset_index(do_attr: &Node, clock: &ClockId) -> Option<usize> {
  do_attr.children().iter().enumerate().find_map(|(idx, child)| {
    if !child.is_kind(RuleKind::Assignment) {
      return None;
    }
    let target = &child.children()[0];
    let value = &child.children()[2];
    let is_zero_literal = value.children().len() == 1 && value.children()[0].as_int_lit() == Some(0);
    (query::node_is_clock(target, clock) && is_zero_literal).then_some(idx)
  })
}

fn replace_assignment_with_nop(do_attr: &Node, idx: usize) -> Node {
  let mut children = do_attr.children().to_vec();
  children[idx] = Node::internal(RuleKind::Nop, vec![Node::keyword("nop")]);
  Node::internal(RuleKind::DoAttribute, children)
}

fn append_zero_reset(do_attr: Option<&Node>, clock: &ClockId) -> Node {
  let assignment = Node::internal(RuleKind::Assignment, vec![
    clock.canonical_node(),
    Node::sym("="),
    Node::internal(RuleKind::IntTerm, vec![Node::int_lit(0)]),
  ]);
  match do_attr {
    Some(existing) => {
      let mut children = existing.children().to_vec();
      children.push(Node::sym(","));
      children.push(assignment);
      Node::internal(RuleKind::DoAttribute, children)
    },
    None => Node::internal(RuleKind::DoAttribute, vec![Node::keyword("do"), Node::sym(":"), assignment]),
  }
}

pub fn invert_reset(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let clocks = query::get_all_clocks(tree);
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  for (i, edge) in edges.iter().enumerate() {
    let occurrence = occurrence_among(&edges, i);
    let attrs = edge.edge_attributes();
    let do_attr = attrs.and_then(|a| query::find_attr(a, RuleKind::DoAttribute));
    for clock in &clocks {
      let new_do_attr = match do_attr.and_then(|d| zero_reset_index(d, clock)) {
        Some(idx) => replace_assignment_with_nop(do_attr.expect("index implies presence"), idx),
        None => append_zero_reset(do_attr, clock),
      };
      let new_attrs = upsert_attr(attrs, do_attr, new_do_attr);
      let new_edge = with_edge_attrs(edge, Some(new_attrs));
      out.push(splice(tree, edge, &new_edge, occurrence));
    }
  }
  out
}

fn flag_keyword(kind: RuleKind) -> &'static str {
  match kind {
    RuleKind::CommittedAttribute => "committed",
    RuleKind::UrgentAttribute => "urgent",
    _ => unreachable!("invert_flag is only ever called with committed/urgent attribute kinds"),
  }
}

fn invert_flag(tree: &Node, kind: RuleKind) -> Vec<Node> {
  let mut out = Vec::new();
  let locations = tree.find_kind(RuleKind::LocationDeclaration);
  for (i, location) in locations.iter().enumerate() {
    let occurrence = occurrence_among(&locations, i);
    let attrs = location.location_attributes();
    let existing = attrs.and_then(|a| query::find_attr(a, kind));
    let new_attrs = match (attrs, existing) {
      (Some(attrs), Some(_)) => {
        let filtered = attr_list::remove_kind(attrs, kind);
        if attr_list::items(&filtered).is_empty() { None } else { Some(filtered) }
      },
      (Some(attrs), None) => Some(attr_list::prepend(
        Some(attrs),
        Node::internal(kind, vec![Node::keyword(flag_keyword(kind))]),
      )),
      (None, _) => Some(attr_list::rebuild(vec![Node::internal(kind, vec![Node::keyword(flag_keyword(kind))])])),
    };
    let new_location = with_location_attrs(location, new_attrs);
    out.push(splice(tree, location, &new_location, occurrence));
  }
  out
}

pub fn invert_committed_location(tree: &Node) -> Vec<Node> {
  invert_flag(tree, RuleKind::CommittedAttribute)
}

pub fn invert_urgent_location(tree: &Node) -> Vec<Node> {
  invert_flag(tree, RuleKind::UrgentAttribute)
}

fn negate_atom(atomic: &Node) -> Option<Node> {
  let constraint = query::constraint_of(atomic)?;
  let (lhs, cmp, rhs) = query::constraint_parts(constraint)?;
  let negated_cmp = cmp.negate_clock_cmp()?;
  let new_constraint =
    Node::internal(constraint.kind()?, vec![lhs.clone(), Node::cmp(negated_cmp), rhs.clone()]);
  Some(Node::internal(RuleKind::AtomicExpr, vec![new_constraint]))
}

pub fn negate_guard(tree: &Node) -> Vec<Node> {
  let mut out = Vec::new();
  let edges = tree.find_kind(RuleKind::EdgeDeclaration);
  for (i, edge) in edges.iter().enumerate() {
    let occurrence = occurrence_among(&edges, i);
    let Some(attrs) = edge.edge_attributes() else { continue };
    if query::find_attr(attrs, RuleKind::ProvidedAttribute).is_none() {
      continue;
    }
    let combined = combine_guards(edge);
    let normalized = break_up_equals(&combined);
    let normalized_attrs =
      normalized.edge_attributes().expect("combine_guards/break_up_equals preserve attributes");
    let guard = query::find_attr(normalized_attrs, RuleKind::ProvidedAttribute)
      .expect("combine_guards/break_up_equals preserve the provided attribute")
      .clone();
    let expr = guard.children()[2].clone();
    let atomics = query::atomic_exprs_in(&expr);
    let (clock_atoms, nonclock_atoms): (Vec<&Node>, Vec<&Node>) =
      atomics.into_iter().partition(|a| query::is_clock_expr(tree, a));
    for clock_atom in &clock_atoms {
      let Some(negated) = negate_atom(clock_atom) else { continue };
      let mut new_expr_children = vec![negated];
      for nonclock in &nonclock_atoms {
        new_expr_children.push(Node::sym("&&"));
        new_expr_children.push((*nonclock).clone());
      }
      let new_expr = Node::internal(RuleKind::Expr, new_expr_children);
      let new_guard = Node::internal(RuleKind::ProvidedAttribute, vec![
        guard.children()[0].clone(),
        guard.children()[1].clone(),
        new_expr,
      ]);
      let new_attrs = replace_attr(normalized_attrs, &guard, &new_guard);
      let new_edge = with_edge_attrs(&normalized, Some(new_attrs));
      let without_original = splice_remove(tree, edge, occurrence);
      out.push(append_declaration(&without_original, new_edge));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::parse;

  fn sample(text: &str) -> Node {
    parse(text).unwrap()
  }

  #[test]
  fn change_event_yields_edges_times_other_events() {
    let tree =
      sample("system:sys\nevent:a\nevent:b\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n");
    let mutants = change_event(&tree);
    assert_eq!(mutants.len(), 1);
    assert_eq!(mutants[0].find_kind(RuleKind::EdgeDeclaration)[0].edge_event(), &Node::internal(RuleKind::Id, vec![Node::ident("b")]));
  }

  #[test]
  fn change_constraint_cmp_counts_four_per_clock_atom() {
    let tree = sample(
      "system:sys\nclock:1:x\nclock:1:y\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{provided:x<=5&&x<y}\n",
    );
    let mutants = change_constraint_cmp(&tree);
    assert_eq!(mutants.len(), 8);
  }

  #[test]
  fn increase_constraint_constant_builds_arithmetic_int_term() {
    let tree =
      sample("system:sys\nclock:1:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{provided:x<=5}\n");
    let mutants = increase_constraint_constant(&tree, 2);
    assert_eq!(mutants.len(), 1);
    let edges = mutants[0].find_kind(RuleKind::EdgeDeclaration);
    let attrs = edges[0].edge_attributes().unwrap();
    let guard = query::find_attr(attrs, RuleKind::ProvidedAttribute).unwrap();
    let atomic = &guard.children()[2].children()[0];
    let constraint = query::constraint_of(atomic).unwrap();
    let (_, _, rhs) = query::constraint_parts(constraint).unwrap();
    assert!(rhs.is_kind(RuleKind::IntTerm));
    assert_eq!(rhs.children().len(), 3);
    assert_eq!(rhs.children()[1].children()[0].as_token_text(), Some("+"));
  }

  #[test]
  fn invert_reset_adds_then_removes_zero_reset() {
    let tree =
      sample("system:sys\nclock:1:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n");
    let mutants = invert_reset(&tree);
    assert_eq!(mutants.len(), 1);
    let edges = mutants[0].find_kind(RuleKind::EdgeDeclaration);
    let attrs = edges[0].edge_attributes().unwrap();
    assert!(query::find_attr(attrs, RuleKind::DoAttribute).is_some());

    let with_reset = sample(
      "system:sys\nclock:1:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{do:x=0}\n",
    );
    let mutants = invert_reset(&with_reset);
    assert_eq!(mutants.len(), 1);
    let edges = mutants[0].find_kind(RuleKind::EdgeDeclaration);
    let attrs = edges[0].edge_attributes().unwrap();
    let do_attr = query::find_attr(attrs, RuleKind::DoAttribute).unwrap();
    assert!(do_attr.children().iter().any(|c| c.is_kind(RuleKind::Nop)));
  }

  #[test]
  fn invert_committed_location_toggles_both_ways() {
    let tree = sample(
      "system:sys\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1{committed:}\nedge:P:L0:L1:a\n",
    );
    let mutants = invert_committed_location(&tree);
    assert_eq!(mutants.len(), 2);
    let without_committed = mutants
      .iter()
      .find(|m| {
        let l1 = &m.find_kind(RuleKind::LocationDeclaration)[1];
        l1.location_attributes().is_none()
      });
    assert!(without_committed.is_some());
  }

  #[test]
  fn negate_guard_splits_equality_into_two_mutants() {
    let tree =
      sample("system:sys\nclock:1:x\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a{provided:x==5}\n");
    let mutants = negate_guard(&tree);
    assert_eq!(mutants.len(), 2);
    for mutant in &mutants {
      assert_eq!(mutant.find_kind(RuleKind::EdgeDeclaration).len(), 1);
    }
  }
}
