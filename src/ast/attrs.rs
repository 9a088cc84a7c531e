//! Shared surgery on `attributes` nodes (`{ item (: item)* }`), used by
//! [`crate::transform::combine_guards`] and several mutation operators
//! that add, remove or replace one attribute in the block.

use super::kind::RuleKind;
use super::node::Node;

/// The attribute items of an `attributes` node, in order, with the
/// braces and interleaving colons stripped.
pub fn items(attrs: &Node) -> Vec<Node> {
  let children = attrs.children();
  if children.len() <= 2 {
    return Vec::new();
  }
  children[1..children.len() - 1].iter().step_by(2).cloned().collect()
}

/// Build an `attributes` node from a list of items, re-inserting the
/// braces and colons.
pub fn rebuild(items: Vec<Node>) -> Node {
  let mut children = vec![Node::sym("{")];
  for (i, item) in items.into_iter().enumerate() {
    if i > 0 {
      children.push(Node::sym(":"));
    }
    children.push(item);
  }
  children.push(Node::sym("}"));
  Node::internal(RuleKind::Attributes, children)
}

/// Insert `item` at the head of `attrs` (or of an empty block if `attrs`
/// is `None`).
pub fn prepend(attrs: Option<&Node>, item: Node) -> Node {
  let mut list = attrs.map(items).unwrap_or_default();
  list.insert(0, item);
  rebuild(list)
}

/// Append `item` at the tail of `attrs` (or of an empty block if `attrs`
/// is `None`).
pub fn append(attrs: Option<&Node>, item: Node) -> Node {
  let mut list = attrs.map(items).unwrap_or_default();
  list.push(item);
  rebuild(list)
}

/// Remove the first item of the given kind from `attrs`. Panics if
/// absent; callers must check first (mirrors the positional contracts'
/// "must be preserved" invariant -- callers always know the item is
/// there).
pub fn remove_kind(attrs: &Node, kind: RuleKind) -> Node {
  let list = items(attrs);
  let mut removed_one = false;
  let filtered = list
    .into_iter()
    .filter(|i| {
      if !removed_one && i.is_kind(kind) {
        removed_one = true;
        false
      } else {
        true
      }
    })
    .collect();
  rebuild(filtered)
}
