//! Semantic AST queries (C3): clock/predicate disambiguation, the clock
//! identifier normal form (§3.2), and enumeration of the atomic
//! expressions and attributes mutation operators iterate over.
//!
//! None of these functions mutate their argument; they only ever hand out
//! borrowed references into the tree the caller already owns.

use std::collections::HashSet;

use super::node::{Cmp, Node};
use super::kind::RuleKind;

/// A clock in its canonical, indexed form: the `i`-th clock declared by a
/// `clock:N:name` declaration (§3.2). `N == 1` clocks may also appear in
/// source text in the un-indexed form `name`; both forms denote the same
/// [`ClockId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClockId {
  pub name: String,
  pub index: u64,
  /// The declared array size `N`; needed to know whether the un-indexed
  /// shorthand is legal for this clock.
  pub count: u64,
}

impl ClockId {
  /// The canonical `int_or_clock_id(name, '[', int_term(index), ']')`
  /// node for this clock.
  pub fn canonical_node(&self) -> Node {
    Node::internal(RuleKind::IntOrClockId, vec![
      Node::ident(self.name.as_str()),
      Node::sym("["),
      Node::internal(RuleKind::IntTerm, vec![Node::int_lit(self.index as i64)]),
      Node::sym("]"),
    ])
  }

  /// The un-indexed shorthand node, valid only when `count == 1`.
  pub fn shorthand_node(&self) -> Node {
    Node::internal(RuleKind::Id, vec![Node::ident(self.name.as_str())])
  }

  /// All textually-valid nodes denoting this clock: the canonical indexed
  /// form, plus the un-indexed shorthand when `count == 1`.
  pub fn equivalent_nodes(&self) -> Vec<Node> {
    let mut out = vec![self.canonical_node()];
    if self.count == 1 && self.index == 0 {
      out.push(self.shorthand_node());
    }
    out
  }
}

/// The bare identifier text an `id` node wraps (`None` for anything else).
pub fn ident_text(node: &Node) -> Option<&str> {
  match node {
    Node::Internal { kind: RuleKind::Id, children } => children.first()?.as_token_text(),
    _ => None,
  }
}

/// Every clock declared anywhere in `tree`, in declaration and then
/// index order (`get_all_clocks` of §3.2).
pub fn get_all_clocks(tree: &Node) -> Vec<ClockId> {
  let mut out = Vec::new();
  for decl in tree.find_kind(RuleKind::ClockDeclaration) {
    let count = decl.clock_decl_size().as_int_lit().unwrap_or(0).max(0) as u64;
    let name = ident_text(decl.clock_decl_id()).unwrap_or_default().to_string();
    for index in 0..count {
      out.push(ClockId { name: name.clone(), index, count });
    }
  }
  out
}

/// `true` iff `node` is a clock reference (`id` or `int_or_clock_id`)
/// denoting `clock`.
pub fn node_is_clock(node: &Node, clock: &ClockId) -> bool {
  clock.equivalent_nodes().iter().any(|n| n == node)
}

/// `true` iff any descendant of `node` is a clock reference.
pub fn is_clock_valued(node: &Node) -> bool {
  node.walk().any(|n| n.is_kind(RuleKind::Id) || n.is_kind(RuleKind::IntOrClockId))
}

/// The arbiter of §3.3: an expression is a clock expression iff its
/// subtree contains the identifier child of at least one
/// `clock_declaration`.
pub fn is_clock_expr(tree: &Node, expr: &Node) -> bool {
  let clock_ids: HashSet<&str> = tree
    .find_kind(RuleKind::ClockDeclaration)
    .into_iter()
    .filter_map(|d| ident_text(d.clock_decl_id()))
    .collect();
  if clock_ids.is_empty() {
    return false;
  }
  expr.walk().any(|n| match n {
    Node::Internal { kind: RuleKind::Id, children } =>
      children.first().and_then(|c| c.as_token_text()).is_some_and(|t| clock_ids.contains(t)),
    Node::Internal { kind: RuleKind::IntOrClockId, children } =>
      children.first().and_then(|c| c.as_token_text()).is_some_and(|t| clock_ids.contains(t)),
    _ => false,
  })
}

/// All `atomic_expr` descendants of `node` (a guard's or invariant's
/// `expr`), in document order.
pub fn atomic_exprs_in(node: &Node) -> Vec<&Node> {
  node.find_kind(RuleKind::AtomicExpr)
}

/// All clock-constraint atomic expressions within `node`, per
/// [`is_clock_expr`].
pub fn clock_atomic_exprs_in<'a>(tree: &Node, node: &'a Node) -> Vec<&'a Node> {
  atomic_exprs_in(node).into_iter().filter(|e| is_clock_expr(tree, e)).collect()
}

/// The inner `clock_expr`/`predicate_expr` node an `atomic_expr` wraps.
pub fn constraint_of(atomic_expr: &Node) -> Option<&Node> {
  atomic_expr.children().first().filter(|c| {
    c.is_kind(RuleKind::ClockExpr) || c.is_kind(RuleKind::PredicateExpr)
  })
}

/// The `(lhs, cmp, rhs)` triple of a `clock_expr`/`predicate_expr` node.
pub fn constraint_parts(constraint: &Node) -> Option<(&Node, Cmp, &Node)> {
  let children = constraint.children();
  if children.len() != 3 {
    return None;
  }
  let cmp = children[1].as_cmp()?;
  Some((&children[0], cmp, &children[2]))
}

/// `true` iff `operand` is a diagonal term (`x - y`): an `int_term` with
/// more than one child, i.e. a binary operation rather than a bare
/// literal or clock reference.
pub fn is_diagonal_operand(operand: &Node) -> bool {
  matches!(operand, Node::Internal { kind: RuleKind::IntTerm, children } if children.len() > 1)
}

/// Every clock-reference position inside one operand (the operand itself
/// if it is a bare clock reference, or both sides of a diagonal `x - y`).
pub fn clock_refs_in_operand(operand: &Node) -> Vec<&Node> {
  if is_diagonal_operand(operand) {
    operand.children().iter().filter(|c| is_clock_valued(c)).collect()
  } else if is_clock_valued(operand) {
    vec![operand]
  } else {
    Vec::new()
  }
}

/// The operand of a clock constraint that does not contain a clock
/// identifier -- the constant side of `x ◇ k` or `k ◇ x`.
pub fn constant_operand(constraint: &Node) -> Option<&Node> {
  let (lhs, _, rhs) = constraint_parts(constraint)?;
  if !is_clock_valued(lhs) {
    Some(lhs)
  } else if !is_clock_valued(rhs) {
    Some(rhs)
  } else {
    None
  }
}

/// Find an existing attribute of `kind` as a direct child of an
/// `attributes` node.
pub fn find_attr(attrs: &Node, kind: RuleKind) -> Option<&Node> {
  attrs.children().iter().find(|c| c.is_kind(kind))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_clock(name: &str, count: u64) -> Node {
    Node::internal(RuleKind::ClockDeclaration, vec![
      Node::keyword("clock"),
      Node::sym(":"),
      Node::int_lit(count as i64),
      Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident(name)]),
    ])
  }

  #[test]
  fn get_all_clocks_expands_array() {
    let tree = Node::internal(RuleKind::SystemDeclaration, vec![sample_clock("x", 2)]);
    let clocks = get_all_clocks(&tree);
    assert_eq!(clocks, vec![
      ClockId { name: "x".into(), index: 0, count: 2 },
      ClockId { name: "x".into(), index: 1, count: 2 },
    ]);
  }

  #[test]
  fn shorthand_only_for_single_clock() {
    let one = ClockId { name: "x".into(), index: 0, count: 1 };
    assert_eq!(one.equivalent_nodes().len(), 2);
    let many = ClockId { name: "x".into(), index: 0, count: 2 };
    assert_eq!(many.equivalent_nodes().len(), 1);
  }

  #[test]
  fn is_clock_expr_detects_shorthand_reference() {
    let tree = Node::internal(RuleKind::SystemDeclaration, vec![sample_clock("x", 1)]);
    let expr = Node::internal(RuleKind::ClockExpr, vec![
      Node::internal(RuleKind::Id, vec![Node::ident("x")]),
      Node::cmp(Cmp::Leq),
      Node::internal(RuleKind::IntTerm, vec![Node::int_lit(5)]),
    ]);
    assert!(is_clock_expr(&tree, &expr));
    let non_clock = Node::internal(RuleKind::PredicateExpr, vec![
      Node::internal(RuleKind::Id, vec![Node::ident("y")]),
      Node::cmp(Cmp::Leq),
      Node::internal(RuleKind::IntTerm, vec![Node::int_lit(5)]),
    ]);
    assert!(!is_clock_expr(&tree, &non_clock));
  }
}
