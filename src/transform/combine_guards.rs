//! `CombineGuards`: folds every `provided_attribute` on one
//! `edge_declaration` into a single `provided_attribute` whose inner
//! `expr` is the `&&`-conjunction of the originals, removing the surplus
//! attributes and their separating colons. Applied only inside
//! `negate_guard` (§4.2), never as a global pass.

use crate::ast::{attrs as attr_list, Node, RuleKind};

/// Fold the `edge`'s guards into one, if it carries more than one
/// `provided_attribute`. A no-op for edges with zero or one guard.
pub fn combine_guards(edge: &Node) -> Node {
  debug_assert!(edge.is_kind(RuleKind::EdgeDeclaration));
  let Some(attrs) = edge.edge_attributes() else { return edge.clone() };
  let items = attr_list::items(attrs);
  let provided_count = items.iter().filter(|i| i.is_kind(RuleKind::ProvidedAttribute)).count();
  if provided_count <= 1 {
    return edge.clone();
  }

  let mut combined_expr_children = Vec::new();
  let mut new_items = Vec::with_capacity(items.len() - provided_count + 1);
  let mut combined_slot = None;
  for item in &items {
    if !item.is_kind(RuleKind::ProvidedAttribute) {
      new_items.push(item.clone());
      continue;
    }
    let inner_expr = &item.children()[2];
    if !combined_expr_children.is_empty() {
      combined_expr_children.push(Node::sym("&&"));
    }
    combined_expr_children.extend(inner_expr.children().iter().cloned());
    // reserve the position of the first guard for the combined attribute.
    combined_slot.get_or_insert_with(|| {
      new_items.push(Node::keyword("provided"));
      new_items.len() - 1
    });
  }
  let combined = Node::internal(RuleKind::ProvidedAttribute, vec![
    Node::keyword("provided"),
    Node::sym(":"),
    Node::internal(RuleKind::Expr, combined_expr_children),
  ]);
  new_items[combined_slot.expect("provided_count > 1 implies at least one guard")] = combined;

  let mut children = edge.children().to_vec();
  children[9] = attr_list::rebuild(new_items);
  Node::internal(RuleKind::EdgeDeclaration, children)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::Cmp;

  fn guard(cmp: Cmp, k: i64) -> Node {
    Node::internal(RuleKind::ProvidedAttribute, vec![
      Node::keyword("provided"),
      Node::sym(":"),
      Node::internal(RuleKind::Expr, vec![Node::internal(RuleKind::AtomicExpr, vec![
        Node::internal(RuleKind::ClockExpr, vec![
          Node::internal(RuleKind::Id, vec![Node::ident("x")]),
          Node::cmp(cmp),
          Node::internal(RuleKind::IntTerm, vec![Node::int_lit(k)]),
        ]),
      ])]),
    ])
  }

  fn edge_with_guards(guards: Vec<Node>) -> Node {
    let attrs = attr_list::rebuild(guards);
    Node::internal(RuleKind::EdgeDeclaration, vec![
      Node::keyword("edge"), Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident("P")]), Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident("L0")]), Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident("L1")]), Node::sym(":"),
      Node::internal(RuleKind::Id, vec![Node::ident("a")]),
      attrs,
    ])
  }

  #[test]
  fn folds_two_guards_into_one() {
    let edge = edge_with_guards(vec![guard(Cmp::Leq, 5), guard(Cmp::Geq, 2)]);
    let out = combine_guards(&edge);
    let attrs = out.edge_attributes().unwrap();
    let provided: Vec<_> =
      attrs.children().iter().filter(|c| c.is_kind(RuleKind::ProvidedAttribute)).collect();
    assert_eq!(provided.len(), 1);
    assert_eq!(provided[0].children()[2].children().len(), 3);
  }

  #[test]
  fn single_guard_is_untouched() {
    let edge = edge_with_guards(vec![guard(Cmp::Leq, 5)]);
    assert_eq!(combine_guards(&edge), edge);
  }
}
