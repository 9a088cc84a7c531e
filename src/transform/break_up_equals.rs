//! `BreakUpEquals`: rewrites `a == b` to `a <= b && a >= b` wherever it
//! occurs inside an `expr` node. Required before `negate_guard`, since
//! `!=` is not permitted inside clock constraints: a negated `a == b`
//! must become `a < b || a > b`, which -- after De Morgan, inside a
//! conjunctive guard -- needs `==` pre-split into the two inequalities.

use crate::ast::{Cmp, Node, RuleKind};

fn is_equality_constraint(node: &Node) -> bool {
  matches!(node, Node::Internal { kind: RuleKind::ClockExpr | RuleKind::PredicateExpr, children }
    if children.len() == 3 && children[1].as_cmp() == Some(Cmp::Eq))
}

fn split_child(child: Node) -> Vec<Node> {
  let Node::Internal { kind: RuleKind::AtomicExpr, children } = &child else {
    return vec![child];
  };
  let Some(constraint) = children.first() else { return vec![child] };
  if !is_equality_constraint(constraint) {
    return vec![child];
  }
  let Node::Internal { kind, children: cc } = constraint else { unreachable!() };
  let leq = Node::internal(RuleKind::AtomicExpr, vec![Node::internal(*kind, vec![
    cc[0].clone(),
    Node::cmp(Cmp::Leq),
    cc[2].clone(),
  ])]);
  let geq = Node::internal(RuleKind::AtomicExpr, vec![Node::internal(*kind, vec![
    cc[0].clone(),
    Node::cmp(Cmp::Geq),
    cc[2].clone(),
  ])]);
  vec![leq, Node::sym("&&"), geq]
}

fn break_up_node(node: &Node) -> Node {
  match node {
    Node::Leaf { .. } => node.clone(),
    Node::Internal { kind: RuleKind::Expr, children } => {
      let rewritten: Vec<Node> = children.iter().map(break_up_node).collect();
      let expanded = rewritten.into_iter().flat_map(split_child).collect();
      Node::internal(RuleKind::Expr, expanded)
    },
    Node::Internal { kind, children } =>
      Node::internal(*kind, children.iter().map(break_up_node).collect()),
  }
}

/// Apply `BreakUpEquals` to every `expr` node in `tree`.
pub fn break_up_equals(tree: &Node) -> Node {
  break_up_node(tree)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn equality_guard() -> Node {
    Node::internal(RuleKind::Expr, vec![Node::internal(RuleKind::AtomicExpr, vec![
      Node::internal(RuleKind::ClockExpr, vec![
        Node::internal(RuleKind::Id, vec![Node::ident("x")]),
        Node::cmp(Cmp::Eq),
        Node::internal(RuleKind::IntTerm, vec![Node::int_lit(5)]),
      ]),
    ])])
  }

  #[test]
  fn splits_equality_into_conjunction() {
    let out = break_up_equals(&equality_guard());
    assert_eq!(out.children().len(), 3);
    let lhs = crate::ast::query::constraint_of(&out.children()[0]).unwrap();
    assert_eq!(crate::ast::query::constraint_parts(lhs).unwrap().1, Cmp::Leq);
    let rhs = crate::ast::query::constraint_of(&out.children()[2]).unwrap();
    assert_eq!(crate::ast::query::constraint_parts(rhs).unwrap().1, Cmp::Geq);
  }

  #[test]
  fn is_idempotent() {
    let once = break_up_equals(&equality_guard());
    let twice = break_up_equals(&once);
    assert_eq!(once, twice);
  }
}
