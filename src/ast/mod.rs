//! The typed AST model (C1): node kinds drawn from the TChecker grammar,
//! structural equality, and the positional-contract accessors of §3.1.
//!
//! Deep-copy is simply [`Clone`]: nothing here keeps hidden shared state,
//! so cloning a subtree always yields an independent value, matching the
//! "deep copy" wording used throughout the spec.

pub mod attrs;
mod kind;
mod node;
pub mod query;

pub use kind::{RuleKind, TokenKind};
pub use node::{Cmp, Node};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn structural_equality_ignores_identity() {
    let a = Node::internal(RuleKind::Id, vec![Node::ident("x")]);
    let b = Node::internal(RuleKind::Id, vec![Node::ident("x")]);
    assert_eq!(a, b);
    assert!(!std::ptr::eq(&a, &b));
  }

  #[test]
  fn structural_equality_distinguishes_kind_and_text() {
    let a = Node::ident("x");
    let b = Node::leaf(TokenKind::Keyword, "x");
    assert_ne!(a, b);
    assert_ne!(Node::ident("x"), Node::ident("y"));
  }
}
