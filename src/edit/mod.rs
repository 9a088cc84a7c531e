//! Tree edit primitives (C2): immutable node exchange and removal keyed
//! on structural equality and an explicit occurrence index (§4.1).
//!
//! Both operations are pure: they take the subject tree by reference and
//! return a freshly-built value; the argument is never touched. Every
//! mutation operator in [`crate::operators`] is built on top of these two
//! functions plus [`contains`].

use crate::ast::Node;
use crate::error::NodeNotFoundError;

/// Structural-equality membership test: `true` iff `node` occurs
/// anywhere in `tree` (including `tree` itself).
pub fn contains(tree: &Node, node: &Node) -> bool {
  tree.walk().any(|n| n == node)
}

/// Replace the `occurrence`-th structurally-equal sibling matching `old`
/// with `new`, at the shallowest node where `old` occurs `occurrence`
/// times among direct children; does not descend into that node's other
/// children. `occurrence` is 1-based, matching the spec's convention.
///
/// Errors if `old` does not occur anywhere in `tree`.
pub fn exchange(tree: &Node, old: &Node, new: &Node, occurrence: usize) -> Result<Node, NodeNotFoundError> {
  if !contains(tree, old) {
    return Err(NodeNotFoundError { action: "exchanged", occurrence });
  }
  Ok(exchange_helper(tree.clone(), old, new, occurrence))
}

/// [`exchange`] with the default occurrence index of 1.
pub fn exchange_first(tree: &Node, old: &Node, new: &Node) -> Result<Node, NodeNotFoundError> {
  exchange(tree, old, new, 1)
}

fn exchange_helper(tree: Node, old: &Node, new: &Node, occurrence: usize) -> Node {
  match tree {
    Node::Leaf { .. } => tree,
    Node::Internal { kind, mut children } => {
      let count = children.iter().filter(|c| *c == old).count();
      if occurrence <= count {
        let mut seen = 0;
        for child in children.iter_mut() {
          if &*child == old {
            seen += 1;
            if seen == occurrence {
              *child = new.clone();
              break;
            }
          }
        }
        Node::Internal { kind, children }
      } else {
        let children =
          children.into_iter().map(|c| exchange_helper(c, old, new, occurrence)).collect();
        Node::Internal { kind, children }
      }
    },
  }
}

/// Delete the `occurrence`-th structurally-equal sibling matching `node`,
/// with the same shallowest-match semantics as [`exchange`].
///
/// Errors if `node` does not occur anywhere in `tree`.
pub fn remove(tree: &Node, node: &Node, occurrence: usize) -> Result<Node, NodeNotFoundError> {
  if !contains(tree, node) {
    return Err(NodeNotFoundError { action: "removed", occurrence });
  }
  Ok(remove_helper(tree.clone(), node, occurrence))
}

/// [`remove`] with the default occurrence index of 1.
pub fn remove_first(tree: &Node, node: &Node) -> Result<Node, NodeNotFoundError> {
  remove(tree, node, 1)
}

fn remove_helper(tree: Node, node: &Node, occurrence: usize) -> Node {
  match tree {
    Node::Leaf { .. } => tree,
    Node::Internal { kind, mut children } => {
      let count = children.iter().filter(|c| c == node).count();
      if occurrence <= count {
        let mut seen = 0;
        let mut idx = None;
        for (i, child) in children.iter().enumerate() {
          if child == node {
            seen += 1;
            if seen == occurrence {
              idx = Some(i);
              break;
            }
          }
        }
        if let Some(i) = idx {
          children.remove(i);
        }
        Node::Internal { kind, children }
      } else {
        let children = children.into_iter().map(|c| remove_helper(c, node, occurrence)).collect();
        Node::Internal { kind, children }
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::RuleKind;

  fn leaf_tree() -> Node {
    Node::internal(RuleKind::Expr, vec![
      Node::ident("a"),
      Node::sym("&&"),
      Node::ident("b"),
    ])
  }

  #[test]
  fn exchange_replaces_matching_child() {
    let tree = leaf_tree();
    let out = exchange_first(&tree, &Node::ident("a"), &Node::ident("c")).unwrap();
    assert_eq!(out.children()[0], Node::ident("c"));
    // purity: original untouched
    assert_eq!(tree.children()[0], Node::ident("a"));
  }

  #[test]
  fn exchange_errors_when_absent() {
    let tree = leaf_tree();
    assert!(exchange_first(&tree, &Node::ident("z"), &Node::ident("c")).is_err());
  }

  #[test]
  fn exchange_occurrence_picks_nth_match() {
    let tree = Node::internal(RuleKind::SyncConstraints, vec![
      Node::ident("p"),
      Node::sym("@"),
      Node::ident("p"),
    ]);
    let out = exchange(&tree, &Node::ident("p"), &Node::ident("q"), 2).unwrap();
    assert_eq!(out.children()[0], Node::ident("p"));
    assert_eq!(out.children()[2], Node::ident("q"));
  }

  #[test]
  fn remove_deletes_matching_child() {
    let tree = leaf_tree();
    let out = remove_first(&tree, &Node::sym("&&")).unwrap();
    assert_eq!(out.children().len(), 2);
    assert_eq!(tree.children().len(), 3);
  }

  #[test]
  fn exchange_does_not_descend_past_a_satisfied_node() {
    // nested occurrence of `a` one level down must not be touched when
    // the outer node already satisfies the occurrence count.
    let inner = Node::internal(RuleKind::Expr, vec![Node::ident("a")]);
    let tree = Node::internal(RuleKind::Expr, vec![Node::ident("a"), inner.clone()]);
    let out = exchange_first(&tree, &Node::ident("a"), &Node::ident("z")).unwrap();
    assert_eq!(out.children()[0], Node::ident("z"));
    assert_eq!(out.children()[1], inner);
  }
}
