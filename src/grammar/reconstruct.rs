//! `reconstruct(AST) -> text`, the concrete realization of the other half
//! of the `parse`/`reconstruct` black box named in `spec.md` §6.
//!
//! Every leaf already carries its literal text (§3.1), so reconstruction
//! is simply an in-order concatenation of leaves; the only structural
//! decision is where a separating space is required so that two adjacent
//! word-like tokens (`Ident`/`IntLit`/`Keyword`) do not fuse into one.

use crate::ast::Node;

pub fn reconstruct(tree: &Node) -> String {
  let mut out = String::new();
  collect(tree, &mut out);
  out
}

fn collect(node: &Node, out: &mut String) {
  match node {
    Node::Leaf { text, .. } => push_token(out, text),
    Node::Internal { children, .. } => children.iter().for_each(|c| collect(c, out)),
  }
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

fn push_token(out: &mut String, text: &str) {
  let needs_space = match (out.chars().last(), text.chars().next()) {
    (Some(last), Some(first)) => is_word_char(last) && is_word_char(first),
    _ => false,
  };
  if needs_space {
    out.push(' ');
  }
  out.push_str(text);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::parser::parse;

  #[test]
  fn round_trips_a_simple_system() {
    let text = "system:sys\nevent:a\nprocess:P\nlocation:P:L0{initial:}\nlocation:P:L1\nedge:P:L0:L1:a\n";
    let tree = parse(text).unwrap();
    let out = reconstruct(&tree);
    let reparsed = parse(&out).unwrap();
    assert_eq!(tree, reparsed);
  }

  #[test]
  fn inserts_space_only_between_word_tokens() {
    let mut out = String::new();
    push_token(&mut out, "x");
    push_token(&mut out, "5");
    assert_eq!(out, "x 5");
    let mut out2 = String::new();
    push_token(&mut out2, "x");
    push_token(&mut out2, "<=");
    assert_eq!(out2, "x<=");
  }
}
