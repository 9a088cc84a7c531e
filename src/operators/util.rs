//! Shared plumbing for the mutation operators (C5): occurrence bookkeeping
//! for [`crate::edit`] and the "splice one whole declaration back into the
//! root" pattern most operators are built on.
//!
//! An operator never calls [`crate::edit::exchange`]/[`crate::edit::remove`]
//! on a node nested inside a guard or invariant -- those primitives replace
//! at *every* node satisfying the occurrence count during their descent
//! (§4.1), so two structurally-identical guards on different edges would
//! both be hit by one call. Instead an operator builds the whole modified
//! declaration (edge/location/sync) via direct child-vector surgery on a
//! clone, then splices that whole declaration into the tree with one
//! `exchange`/`remove` call whose occurrence is counted among sibling
//! declarations of the same kind only.

use crate::ast::Node;
use crate::edit;

/// The 1-based occurrence of `items[idx]` among the structurally-equal
/// elements at or before it -- the `k` `exchange`/`remove` need to reach
/// that specific sibling.
pub(super) fn occurrence_among(items: &[&Node], idx: usize) -> usize {
  items[..=idx].iter().filter(|n| **n == items[idx]).count()
}

/// Replace `old` with `new` in `tree` at the given occurrence. Panics if
/// `old` is absent: callers always derive `old` from a node just found in
/// `tree` itself.
pub(super) fn splice(tree: &Node, old: &Node, new: &Node, occurrence: usize) -> Node {
  edit::exchange(tree, old, new, occurrence)
    .expect("declaration located via find_kind must occur in the tree it was found in")
}

/// Remove `old` from `tree` at the given occurrence.
pub(super) fn splice_remove(tree: &Node, old: &Node, occurrence: usize) -> Node {
  edit::remove(tree, old, occurrence)
    .expect("declaration located via find_kind must occur in the tree it was found in")
}

/// Append `decl` as a new top-level declaration (process/location/edge/
/// sync are all direct children of `system_declaration`).
pub(super) fn append_declaration(tree: &Node, decl: Node) -> Node {
  let mut children = tree.children().to_vec();
  children.push(decl);
  Node::internal(tree.kind().expect("system_declaration is an internal node"), children)
}

/// Insert `new_node` immediately after the `occurrence`-th structurally-
/// equal match of `after` among `tree`'s direct children.
pub(super) fn insert_after(tree: &Node, after: &Node, new_node: &Node, occurrence: usize) -> Node {
  let Node::Internal { kind, children } = tree else { return tree.clone() };
  let mut out = Vec::with_capacity(children.len() + 1);
  let mut seen = 0;
  for child in children {
    out.push(child.clone());
    if child == after {
      seen += 1;
      if seen == occurrence {
        out.push(new_node.clone());
      }
    }
  }
  Node::internal(*kind, out)
}

/// Replace the `occurrence`-th attribute item structurally equal to
/// `old_item` within `attrs` with `new_item`.
pub(super) fn replace_attr(attrs: &Node, old_item: &Node, new_item: &Node) -> Node {
  let items = crate::ast::attrs::items(attrs);
  let idx = items.iter().position(|i| i == old_item).expect("attribute item must be present");
  let refs: Vec<&Node> = items.iter().collect();
  let occurrence = occurrence_among(&refs, idx);
  splice(attrs, old_item, new_item, occurrence)
}

/// Insert or replace one attribute item, handling the three shapes
/// `invert_reset`/`invert_committed_location`/`invert_urgent_location`
/// all need: an existing attribute block with the item present, an
/// existing block without it, and no attribute block at all.
pub(super) fn upsert_attr(attrs: Option<&Node>, old_item: Option<&Node>, new_item: Node) -> Node {
  match (attrs, old_item) {
    (Some(attrs), Some(old)) => replace_attr(attrs, old, &new_item),
    (Some(attrs), None) => crate::ast::attrs::append(Some(attrs), new_item),
    (None, _) => crate::ast::attrs::rebuild(vec![new_item]),
  }
}

/// Rebuild an `edge_declaration` with its (possibly absent) attribute
/// block replaced wholesale. Always starts from the nine fixed fields so
/// an empty `attrs` correctly drops the slot instead of leaving stale
/// children behind.
pub(super) fn with_edge_attrs(edge: &Node, attrs: Option<Node>) -> Node {
  let mut children = edge.children()[..9].to_vec();
  if let Some(a) = attrs {
    children.push(a);
  }
  Node::internal(crate::ast::RuleKind::EdgeDeclaration, children)
}

/// Rebuild a `location_declaration` with its attribute block replaced
/// wholesale.
pub(super) fn with_location_attrs(location: &Node, attrs: Option<Node>) -> Node {
  let mut children = location.children()[..5].to_vec();
  if let Some(a) = attrs {
    children.push(a);
  }
  Node::internal(crate::ast::RuleKind::LocationDeclaration, children)
}
