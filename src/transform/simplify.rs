//! `SimplifyExpressions`: distributes chained comparisons.
//!
//! Any `predicate_expr`/`clock_expr` with two `<=`/`<` comparators
//! (`a ≤₁ b ≤₂ c`) is split into two `atomic_expr`s joined by `&&`
//! (`a ≤₁ b && b ≤₂ c`). Applied once, globally, right after parsing;
//! idempotent, since its output never contains a chained comparison.

use crate::ast::{Node, RuleKind};

fn is_complex_constraint(node: &Node) -> bool {
  matches!(node, Node::Internal { kind: RuleKind::ClockExpr | RuleKind::PredicateExpr, children } if children.len() == 5)
}

/// Split one chained `atomic_expr` child into the two simple ones it
/// distributes to; leaves any other child untouched.
fn split_child(child: Node) -> Vec<Node> {
  let Node::Internal { kind: RuleKind::AtomicExpr, children } = &child else {
    return vec![child];
  };
  let Some(constraint) = children.first() else { return vec![child] };
  if !is_complex_constraint(constraint) {
    return vec![child];
  }
  let Node::Internal { kind, children: cc } = constraint else { unreachable!() };
  let first = Node::internal(RuleKind::AtomicExpr, vec![Node::internal(*kind, vec![
    cc[0].clone(),
    cc[1].clone(),
    cc[2].clone(),
  ])]);
  let second = Node::internal(RuleKind::AtomicExpr, vec![Node::internal(*kind, vec![
    cc[2].clone(),
    cc[3].clone(),
    cc[4].clone(),
  ])]);
  vec![first, Node::sym("&&"), second]
}

fn simplify_node(node: &Node) -> Node {
  match node {
    Node::Leaf { .. } => node.clone(),
    Node::Internal { kind: RuleKind::Expr, children } => {
      let simplified: Vec<Node> = children.iter().map(simplify_node).collect();
      let expanded = simplified.into_iter().flat_map(split_child).collect();
      Node::internal(RuleKind::Expr, expanded)
    },
    Node::Internal { kind, children } =>
      Node::internal(*kind, children.iter().map(simplify_node).collect()),
  }
}

/// Apply `SimplifyExpressions` to every `expr` node in `tree`.
pub fn simplify(tree: &Node) -> Node {
  simplify_node(tree)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::Cmp;

  fn chained_guard() -> Node {
    // x <= 5 <= y  =>  provided attribute's expr
    Node::internal(RuleKind::Expr, vec![Node::internal(RuleKind::AtomicExpr, vec![
      Node::internal(RuleKind::ClockExpr, vec![
        Node::internal(RuleKind::Id, vec![Node::ident("x")]),
        Node::cmp(Cmp::Leq),
        Node::internal(RuleKind::IntTerm, vec![Node::int_lit(5)]),
        Node::cmp(Cmp::Leq),
        Node::internal(RuleKind::Id, vec![Node::ident("y")]),
      ]),
    ])])
  }

  #[test]
  fn splits_chained_comparison() {
    let out = simplify(&chained_guard());
    assert_eq!(out.children().len(), 3);
    assert_eq!(out.children()[1], Node::sym("&&"));
  }

  #[test]
  fn is_idempotent() {
    let once = simplify(&chained_guard());
    let twice = simplify(&once);
    assert_eq!(once, twice);
  }

  #[test]
  fn simple_expr_untouched() {
    let simple = Node::internal(RuleKind::Expr, vec![Node::internal(RuleKind::AtomicExpr, vec![
      Node::internal(RuleKind::ClockExpr, vec![
        Node::internal(RuleKind::Id, vec![Node::ident("x")]),
        Node::cmp(Cmp::Leq),
        Node::internal(RuleKind::IntTerm, vec![Node::int_lit(5)]),
      ]),
    ])]);
    assert_eq!(simplify(&simple), simple);
  }
}
